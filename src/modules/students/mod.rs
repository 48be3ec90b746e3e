pub mod controller;
pub mod service;

pub use controller::{StudentProfileView, StudentRoster};
pub use service::StudentService;
