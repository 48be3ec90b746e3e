//! Account registration input.
//!
//! The form's `role` discriminant selects one of three variants, each owning the common account
//! fields plus its role-specific fields. Shape checks are declared with `validator` attributes per
//! variant; the password confirmation and the parent → child link are refinements (see
//! [`Refine`]) that only run once every shape check passed.

use std::fmt;

use edulink_core::validation::{FieldErrors, Refine};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::auth::SignUpMetadata;
use crate::roles::{RegistrationRole, Role};
use crate::students::RegisteredStudentIds;

pub const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";
pub const UNKNOWN_CHILD_STUDENT_ID: &str = "No registered student found with this ID";

/// Fields every role fills in.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountFields {
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "edulink_core::password::validate_password_complexity")
    )]
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for AccountFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountFields")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRegistration {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: AccountFields,
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "Grade level is required"))]
    pub grade_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherRegistration {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: AccountFields,
    /// Comma-separated free text, e.g. "Math, Physics".
    #[validate(length(min = 1, message = "At least one subject is required"))]
    pub subjects: String,
}

impl TeacherRegistration {
    pub fn subject_list(&self) -> Vec<&str> {
        self.subjects
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentRegistration {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: AccountFields,
    #[validate(length(min = 2, message = "Child's name must be at least 2 characters"))]
    pub child_name: String,
    #[validate(length(min = 1, message = "Child's student ID is required"))]
    pub child_student_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RegistrationInput {
    Student(StudentRegistration),
    Teacher(TeacherRegistration),
    Parent(ParentRegistration),
}

impl RegistrationInput {
    pub fn role(&self) -> RegistrationRole {
        match self {
            Self::Student(_) => RegistrationRole::Student,
            Self::Teacher(_) => RegistrationRole::Teacher,
            Self::Parent(_) => RegistrationRole::Parent,
        }
    }

    pub fn account(&self) -> &AccountFields {
        match self {
            Self::Student(s) => &s.account,
            Self::Teacher(t) => &t.account,
            Self::Parent(p) => &p.account,
        }
    }

    /// Attributes stored with the new account: role plus the role-specific fields.
    pub fn sign_up_metadata(&self) -> SignUpMetadata {
        let account = self.account();
        let metadata = SignUpMetadata::new(Role::from(self.role()))
            .with("first_name", account.first_name.trim())
            .with("last_name", account.last_name.trim());

        match self {
            Self::Student(s) => metadata
                .with("student_id", s.student_id.trim())
                .with("grade_level", s.grade_level.trim()),
            Self::Teacher(t) => metadata.with("subjects", t.subject_list().join(", ")),
            Self::Parent(p) => metadata
                .with("child_name", p.child_name.trim())
                .with("child_student_id", p.child_student_id.trim()),
        }
    }
}

impl Validate for RegistrationInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Student(s) => s.validate(),
            Self::Teacher(t) => t.validate(),
            Self::Parent(p) => p.validate(),
        }
    }
}

impl Refine for RegistrationInput {
    type Context = RegisteredStudentIds;

    fn refine(&self, registered: &RegisteredStudentIds) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let account = self.account();
        if account.password != account.confirm_password {
            errors.add("confirmPassword", PASSWORDS_DONT_MATCH);
        }

        if let Self::Parent(parent) = self
            && !registered.contains(&parent.child_student_id)
        {
            errors.add("childStudentId", UNKNOWN_CHILD_STUDENT_ID);
        }

        errors
    }
}
