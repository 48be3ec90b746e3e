//! # Edulink Models
//!
//! Domain models and form schemas for the Edulink client.
//!
//! This crate provides the data structures shared by the form controllers, the local profile
//! store and the auth/persistence gateway, including the validation schemas for every form.
//!
//! # Modules
//!
//! - [`auth`]: Sign-in form, sessions, sign-up metadata
//! - [`profile`]: Locally persisted user profile and its migration
//! - [`registration`]: Role-tagged account registration input
//! - [`roles`]: Account roles
//! - [`schools`]: School registration input and the pending-registration marker
//! - [`students`]: Student roster rows, registered student IDs and the student reference table
//!
//! # Example
//!
//! ```ignore
//! use edulink_core::validate_with;
//! use edulink_models::registration::RegistrationInput;
//! use edulink_models::students::RegisteredStudentIds;
//!
//! let input: RegistrationInput = serde_json::from_str(body)?;
//! validate_with(&input, &RegisteredStudentIds::default())?;
//! ```

pub mod auth;
pub mod profile;
pub mod registration;
pub mod roles;
pub mod schools;
pub mod students;

// Re-export commonly used types at crate root for convenience
pub use auth::{GatewayUser, LoginRequest, Session, SignUpMetadata};
pub use profile::{PROFILE_SCHEMA_VERSION, StoredProfile, UserProfile};
pub use registration::{
    AccountFields, ParentRegistration, RegistrationInput, StudentRegistration,
    TeacherRegistration,
};
pub use roles::{RegistrationRole, Role};
pub use schools::{
    Language, PendingSchoolRegistration, RegistrationStage, SchoolRegistrationInput,
};
pub use students::{
    AcademicRecord, MedicalInformation, RegisteredStudentIds, Student, StudentDirectory,
};
