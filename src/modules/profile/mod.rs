pub mod controller;
pub mod service;

pub use controller::ProfileEditor;
pub use service::ProfileService;
