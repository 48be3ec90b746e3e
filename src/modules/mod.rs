pub mod auth;
pub mod profile;
pub mod schools;
pub mod students;

pub use self::auth::{LoginForm, RegistrationForm};
pub use self::profile::ProfileEditor;
pub use self::schools::SchoolRegistrationWizard;
pub use self::students::{StudentProfileView, StudentRoster};
