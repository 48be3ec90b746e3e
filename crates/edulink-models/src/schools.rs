//! School registration: the wizard's input schema, the records written to the backend, and the
//! marker kept while a registration is only partially applied.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use edulink_core::validation::{FieldErrors, Refine};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

use crate::auth::SignUpMetadata;
use crate::registration::PASSWORDS_DONT_MATCH;
use crate::roles::Role;

pub const SCHOOLS_TABLE: &str = "schools";
pub const SCHOOL_ADMINS_TABLE: &str = "school_admins";

/// Interface language of a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ar,
    Fr,
    #[default]
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Self::Ar, Self::Fr, Self::En];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::Fr => "fr",
            Self::En => "en",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ar => "العربية",
            Self::Fr => "Français",
            Self::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Self::Ar),
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            _ => Err("Language must be one of: ar, fr, en".to_string()),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolRegistrationInput {
    #[validate(length(min = 1, message = "School name is required"))]
    pub school_name: String,
    #[validate(
        length(min = 3, max = 63, message = "Subdomain must be between 3 and 63 characters"),
        custom(function = "edulink_core::subdomain::validate_subdomain_charset")
    )]
    pub subdomain: String,
    #[validate(length(min = 1, message = "Administrator first name is required"))]
    pub admin_first_name: String,
    #[validate(length(min = 1, message = "Administrator last name is required"))]
    pub admin_last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 10, message = "Phone number is required"))]
    pub phone: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "edulink_core::password::validate_password_complexity")
    )]
    pub password: String,
    #[validate(length(min = 8, message = "Confirm password is required"))]
    pub confirm_password: String,
    pub language: Language,
}

impl fmt::Debug for SchoolRegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchoolRegistrationInput")
            .field("school_name", &self.school_name)
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl SchoolRegistrationInput {
    pub fn admin_metadata(&self) -> SignUpMetadata {
        SignUpMetadata::new(Role::Admin)
            .with("first_name", self.admin_first_name.trim())
            .with("last_name", self.admin_last_name.trim())
            .with("subdomain", self.subdomain.as_str())
    }

    /// Row inserted into the `schools` table.
    pub fn school_record(&self) -> Value {
        json!({
            "name": self.school_name.trim(),
            "subdomain": self.subdomain,
            "email": self.email,
            "phone": self.phone.trim(),
            "language": self.language,
        })
    }

    /// Row inserted into the `school_admins` table linking the new account to the school.
    pub fn admin_link_record(user_id: &str, school_id: &str) -> Value {
        json!({
            "user_id": user_id,
            "school_id": school_id,
            "role": Role::Admin,
        })
    }
}

impl Refine for SchoolRegistrationInput {
    type Context = ();

    fn refine(&self, _: &()) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.password != self.confirm_password {
            errors.add("confirmPassword", PASSWORDS_DONT_MATCH);
        }
        errors
    }
}

/// How far a school registration got before it stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RegistrationStage {
    /// The administrator account exists; the school row does not.
    AccountCreated { user_id: String },
    /// The school row exists; the administrator link does not.
    SchoolCreated { user_id: String, school_id: String },
}

impl RegistrationStage {
    pub fn user_id(&self) -> &str {
        match self {
            Self::AccountCreated { user_id } | Self::SchoolCreated { user_id, .. } => user_id,
        }
    }

    pub fn school_id(&self) -> Option<&str> {
        match self {
            Self::AccountCreated { .. } => None,
            Self::SchoolCreated { school_id, .. } => Some(school_id),
        }
    }
}

/// Marker persisted locally while a school registration is incomplete, so a retry can resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSchoolRegistration {
    pub email: String,
    pub subdomain: String,
    pub stage: RegistrationStage,
    pub updated_at: DateTime<Utc>,
}

impl PendingSchoolRegistration {
    pub fn new(input: &SchoolRegistrationInput, stage: RegistrationStage) -> Self {
        Self {
            email: input.email.clone(),
            subdomain: input.subdomain.clone(),
            stage,
            updated_at: Utc::now(),
        }
    }

    /// True when the pending marker belongs to the registration being submitted.
    pub fn matches(&self, input: &SchoolRegistrationInput) -> bool {
        self.email.eq_ignore_ascii_case(input.email.trim()) && self.subdomain == input.subdomain
    }
}
