//! Authentication models: the sign-in form, sessions returned by the auth service, and the
//! metadata bag attached to new accounts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::roles::Role;

#[derive(Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub remember_me: bool,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("remember_me", &self.remember_me)
            .finish_non_exhaustive()
    }
}

/// Opaque key/value attributes stored with a new account (role and role-specific fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignUpMetadata(BTreeMap<String, String>);

impl SignUpMetadata {
    pub fn new(role: Role) -> Self {
        let mut metadata = Self::default();
        metadata.insert("role", role.as_str());
        metadata
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn role(&self) -> Option<Role> {
        self.get("role").and_then(|r| r.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An account as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: BTreeMap<String, serde_json::Value>,
}

impl GatewayUser {
    pub fn role(&self) -> Option<Role> {
        self.user_metadata
            .get("role")
            .and_then(|r| r.as_str())
            .and_then(|r| r.parse().ok())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: GatewayUser,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
            remember_me: false,
        };
        assert!(valid.validate().is_ok());

        let invalid = LoginRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            remember_me: true,
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "Sup3rSecret".to_string(),
            remember_me: true,
        };
        assert!(!format!("{:?}", request).contains("Sup3rSecret"));
    }

    #[test]
    fn test_metadata_carries_role() {
        let metadata = SignUpMetadata::new(Role::Teacher).with("subjects", "Math");
        assert_eq!(metadata.role(), Some(Role::Teacher));
        assert_eq!(metadata.get("subjects"), Some("Math"));

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["role"], "teacher");
    }

    #[test]
    fn test_session_deserializes_without_refresh_token() {
        let session: Session = serde_json::from_str(
            r#"{"access_token":"tok","user":{"id":"u1","email":"a@b.co"}}"#,
        )
        .unwrap();
        assert_eq!(session.user.id, "u1");
        assert!(session.refresh_token.is_none());
        assert!(session.user.role().is_none());
        assert!(!format!("{:?}", session).contains("\"tok\""));
    }
}
