//! The locally persisted user profile.
//!
//! Records are read leniently through [`StoredProfile`] (every field optional, blanks treated as
//! absent, unknown keys kept) and brought to the current shape by [`StoredProfile::migrate`].
//! The profile is a denormalized snapshot: common account fields plus whichever role-specific
//! fields the account had at registration.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use edulink_core::serde::deserialize_blank_as_none;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registration::RegistrationInput;
use crate::roles::Role;
use crate::students::StudentDirectory;

pub const PROFILE_SCHEMA_VERSION: u32 = 1;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Free text once stored; the editor accepts any value.
    pub role: String,
    pub join_date: NaiveDate,
    pub last_login: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_student_id: Option<String>,
    pub schema_version: u32,
    /// Keys this client does not know about, preserved on save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserProfile {
    /// Profile written right after a successful registration.
    pub fn from_registration(input: &RegistrationInput, today: NaiveDate) -> Self {
        let account = input.account();
        let mut profile = Self {
            name: String::new(),
            first_name: account.first_name.trim().to_string(),
            last_name: account.last_name.trim().to_string(),
            email: account.email.trim().to_string(),
            role: Role::from(input.role()).to_string(),
            join_date: today,
            last_login: today,
            student_id: None,
            grade_level: None,
            subjects: None,
            child_name: None,
            child_student_id: None,
            schema_version: PROFILE_SCHEMA_VERSION,
            extra: BTreeMap::new(),
        };

        match input {
            RegistrationInput::Student(s) => {
                profile.student_id = Some(s.student_id.trim().to_string());
                profile.grade_level = Some(s.grade_level.trim().to_string());
            }
            RegistrationInput::Teacher(t) => {
                profile.subjects = Some(t.subject_list().join(", "));
            }
            RegistrationInput::Parent(p) => {
                profile.child_name = Some(p.child_name.trim().to_string());
                profile.child_student_id = Some(p.child_student_id.trim().to_string());
            }
        }

        profile.refresh_name();
        profile
    }

    /// `name` is always `"{first_name} {last_name}"` after an edit.
    pub fn refresh_name(&mut self) {
        self.name = format!("{} {}", self.first_name, self.last_name);
    }

    pub fn role_kind(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// For parents, replaces `child_name` with the reference-table name of `child_student_id`.
    /// Returns whether the name changed.
    pub fn enrich_child_name(&mut self) -> bool {
        if self.role_kind() != Some(Role::Parent) {
            return false;
        }

        let Some(name) = self
            .child_student_id
            .as_deref()
            .and_then(StudentDirectory::child_name)
        else {
            return false;
        };

        if self.child_name.as_deref() == Some(name) {
            return false;
        }
        self.child_name = Some(name.to_string());
        true
    }
}

/// Lenient view of whatever is in storage under the profile key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub join_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub last_login: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub grade_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub subjects: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub child_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub child_student_id: Option<String>,
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StoredProfile {
    pub fn needs_migration(&self) -> bool {
        self.schema_version != Some(PROFILE_SCHEMA_VERSION)
    }

    /// Fills in derived and defaulted fields.
    ///
    /// - `first_name` / `last_name` missing: split `name` at the first whitespace.
    /// - `name` missing: joined from first and last name.
    /// - `join_date` / `last_login` missing or unreadable: `today`.
    pub fn migrate(self, today: NaiveDate) -> UserProfile {
        let (derived_first, derived_last) = match self.name.as_deref() {
            Some(name) => split_name(name),
            None => (String::new(), String::new()),
        };

        let first_name = self.first_name.unwrap_or(derived_first);
        let last_name = self.last_name.unwrap_or(derived_last);
        let name = self
            .name
            .unwrap_or_else(|| format!("{} {}", first_name, last_name).trim().to_string());

        UserProfile {
            name,
            first_name,
            last_name,
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            join_date: parse_date(self.join_date.as_deref()).unwrap_or(today),
            last_login: parse_date(self.last_login.as_deref()).unwrap_or(today),
            student_id: self.student_id,
            grade_level: self.grade_level,
            subjects: self.subjects,
            child_name: self.child_name,
            child_student_id: self.child_student_id,
            schema_version: PROFILE_SCHEMA_VERSION,
            extra: self.extra,
        }
    }
}

fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{AccountFields, ParentRegistration, TeacherRegistration};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn stored(json: &str) -> StoredProfile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_migrate_derives_names_from_full_name() {
        let profile =
            stored(r#"{"name":"Ada Lovelace","email":"ada@example.com","role":"student"}"#)
                .migrate(today());

        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.join_date, today());
        assert_eq!(profile.last_login, today());
        assert_eq!(profile.schema_version, PROFILE_SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_keeps_existing_values() {
        let profile = stored(
            r#"{"name":"Ada King","firstName":"Ada","lastName":"Lovelace",
                "joinDate":"2024-09-01","lastLogin":"2025-01-02T08:30:00Z","theme":"dark"}"#,
        )
        .migrate(today());

        assert_eq!(profile.name, "Ada King");
        assert_eq!(profile.last_name, "Lovelace");
        assert_eq!(profile.join_date, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(profile.last_login, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(profile.extra["theme"], "dark");
    }

    #[test]
    fn test_migrate_handles_single_word_and_missing_name() {
        let profile = stored(r#"{"name":"Cher"}"#).migrate(today());
        assert_eq!(profile.first_name, "Cher");
        assert_eq!(profile.last_name, "");

        let profile = stored(r#"{"firstName":"Grace","lastName":"Hopper"}"#).migrate(today());
        assert_eq!(profile.name, "Grace Hopper");

        let profile = stored(r#"{"joinDate":"not a date","firstName":" "}"#).migrate(today());
        assert_eq!(profile.join_date, today());
        assert_eq!(profile.first_name, "");
    }

    #[test]
    fn test_needs_migration() {
        assert!(stored(r#"{"name":"Ada"}"#).needs_migration());
        assert!(!stored(r#"{"name":"Ada","schemaVersion":1}"#).needs_migration());
    }

    #[test]
    fn test_enrich_child_name_only_for_parents() {
        let mut parent = stored(
            r#"{"name":"Ada Lovelace","role":"parent","childStudentId":"STU002","childName":"Lee"}"#,
        )
        .migrate(today());
        assert!(parent.enrich_child_name());
        assert_eq!(parent.child_name.as_deref(), Some("Liam Carter"));
        assert!(!parent.enrich_child_name());

        let mut unknown = stored(r#"{"role":"parent","childStudentId":"S100","childName":"Byron"}"#)
            .migrate(today());
        assert!(!unknown.enrich_child_name());
        assert_eq!(unknown.child_name.as_deref(), Some("Byron"));

        let mut teacher =
            stored(r#"{"role":"teacher","childStudentId":"STU002"}"#).migrate(today());
        assert!(!teacher.enrich_child_name());
        assert!(teacher.child_name.is_none());
    }

    #[test]
    fn test_from_registration() {
        let account = AccountFields {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Abc12345".to_string(),
            confirm_password: "Abc12345".to_string(),
        };

        let parent = RegistrationInput::Parent(ParentRegistration {
            account: account.clone(),
            child_name: "Byron".to_string(),
            child_student_id: "S100".to_string(),
        });
        let profile = UserProfile::from_registration(&parent, today());
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.role, "parent");
        assert_eq!(profile.child_student_id.as_deref(), Some("S100"));
        assert!(profile.student_id.is_none());

        let teacher = RegistrationInput::Teacher(TeacherRegistration {
            account,
            subjects: "Math,Art".to_string(),
        });
        let profile = UserProfile::from_registration(&teacher, today());
        assert_eq!(profile.subjects.as_deref(), Some("Math, Art"));
    }

    #[test]
    fn test_serialization_is_camel_case_and_skips_absent_fields() {
        let profile = stored(r#"{"name":"Ada Lovelace","role":"student","studentId":"S1"}"#)
            .migrate(today());
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["joinDate"], "2026-10-17");
        assert_eq!(json["studentId"], "S1");
        assert!(json.get("childName").is_none());
    }
}
