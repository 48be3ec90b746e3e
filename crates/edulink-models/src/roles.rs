//! Account roles.
//!
//! [`Role`] covers every account kind the backend knows about. Only the first three can be
//! chosen on the registration form; administrators are created by school registration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Parent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "parent" => Ok(Self::Parent),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Roles selectable on the account registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationRole {
    #[default]
    Student,
    Teacher,
    Parent,
}

impl RegistrationRole {
    pub const ALL: [RegistrationRole; 3] = [Self::Student, Self::Teacher, Self::Parent];

    /// Form fields (camelCase) that only exist for this role.
    pub fn specific_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Student => &["studentId", "gradeLevel"],
            Self::Teacher => &["subjects"],
            Self::Parent => &["childName", "childStudentId"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Parent => "Parent",
        }
    }
}

impl From<RegistrationRole> for Role {
    fn from(role: RegistrationRole) -> Self {
        match role {
            RegistrationRole::Student => Role::Student,
            RegistrationRole::Teacher => Role::Teacher,
            RegistrationRole::Parent => Role::Parent,
        }
    }
}

impl fmt::Display for RegistrationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Role::from(*self).as_str())
    }
}

impl FromStr for RegistrationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Role>()? {
            Role::Student => Ok(Self::Student),
            Role::Teacher => Ok(Self::Teacher),
            Role::Parent => Ok(Self::Parent),
            Role::Admin => {
                Err("Administrator accounts are created through school registration".to_string())
            }
        }
    }
}
