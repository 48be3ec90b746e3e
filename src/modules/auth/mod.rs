pub mod controller;
pub mod service;

pub use controller::{LoginForm, RegistrationForm, RegistrationValues};
pub use service::AuthService;
