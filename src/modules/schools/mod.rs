pub mod controller;
pub mod service;

pub use controller::{SchoolRegistrationWizard, WizardStep};
pub use service::{RegisteredSchool, SchoolService};
