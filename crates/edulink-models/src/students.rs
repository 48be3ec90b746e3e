//! Students: the roster rows read from the backend, and the identifiers known to this client.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use edulink_core::serde::{
    deserialize_blank_as_none, deserialize_optional_string_or_number,
    deserialize_string_or_number,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STUDENTS_TABLE: &str = "students";

/// A row of the `students` table with its nested records.
///
/// Decoding is lenient: only `id` is required, everything else defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub academic_records: Vec<AcademicRecord>,
    #[serde(default)]
    pub medical_info: Option<MedicalInformation>,
}

impl Student {
    pub fn from_row(row: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(row)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// The record with the latest enrollment date.
    pub fn current_record(&self) -> Option<&AcademicRecord> {
        self.academic_records
            .iter()
            .max_by_key(|record| record.enrollment_date)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub enrollment_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub major: Option<String>,
    /// Kept as text so `"3.50"` is shown as stored.
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalInformation {
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub medical_conditions: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_number: String,
}

/// Student IDs that completed registration on this device.
///
/// Append-only. Parents can only link to a child whose ID appears here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisteredStudentIds(BTreeSet<String>);

impl RegisteredStudentIds {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id.trim())
    }

    /// Returns `false` when the ID was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        self.0.insert(id.trim().to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RegisteredStudentIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ids = Self::default();
        for id in iter {
            ids.insert(id.as_ref());
        }
        ids
    }
}

/// Reference table of enrolled students, used to show a parent's child by name.
pub struct StudentDirectory;

impl StudentDirectory {
    const ENTRIES: &'static [(&'static str, &'static str)] = &[
        ("STU001", "Emma Thompson"),
        ("STU002", "Liam Carter"),
        ("STU003", "Sofia Haddad"),
        ("STU004", "Noah Benali"),
        ("STU005", "Yasmine El Amrani"),
        ("STU006", "Lucas Martin"),
    ];

    pub fn child_name(student_id: &str) -> Option<&'static str> {
        let id = student_id.trim();
        Self::ENTRIES
            .iter()
            .find(|(entry_id, _)| entry_id.eq_ignore_ascii_case(id))
            .map(|(_, name)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_row_with_nested_records() {
        let student = Student::from_row(json!({
            "id": 12,
            "first_name": "Emma",
            "last_name": "Thompson",
            "email": "emma@cedar.edu",
            "date_of_birth": "2010-04-02",
            "gender": "female",
            "address": "",
            "academic_records": [
                { "grade_level": "9", "enrollment_date": "2024-09-01", "gpa": "3.20" },
                { "grade_level": "10", "enrollment_date": "2025-09-01", "gpa": 3.6 }
            ],
            "medical_info": {
                "allergies": "Peanuts",
                "emergency_contact_name": "Sara Thompson",
                "emergency_contact_number": "0612345678"
            },
            "created_at": "2025-09-01T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(student.id, "12");
        assert_eq!(student.full_name(), "Emma Thompson");
        assert_eq!(student.date_of_birth, NaiveDate::from_ymd_opt(2010, 4, 2));
        assert!(student.address.is_none());
        assert_eq!(student.current_record().unwrap().grade_level, "10");
        assert_eq!(student.current_record().unwrap().gpa.as_deref(), Some("3.6"));
        assert_eq!(student.medical_info.unwrap().allergies, "Peanuts");
    }

    #[test]
    fn test_minimal_student_row() {
        let student = Student::from_row(json!({ "id": "s-1", "first_name": "Liam" })).unwrap();
        assert_eq!(student.to_string(), "Liam");
        assert!(student.current_record().is_none());
        assert!(student.medical_info.is_none());

        assert!(Student::from_row(json!({ "first_name": "Liam" })).is_err());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut ids = RegisteredStudentIds::default();
        assert!(ids.insert("S100"));
        assert!(!ids.insert("S100"));
        assert!(!ids.insert(" S100 "));
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("S100"));
    }

    #[test]
    fn test_serializes_as_json_array() {
        let ids: RegisteredStudentIds = ["S2", "S1"].into_iter().collect();
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["S1","S2"]"#);

        let parsed: RegisteredStudentIds = serde_json::from_str(r#"["S9"]"#).unwrap();
        assert!(parsed.contains("S9"));
    }

    #[test]
    fn test_directory_lookup() {
        assert_eq!(StudentDirectory::child_name("STU003"), Some("Sofia Haddad"));
        assert_eq!(StudentDirectory::child_name("stu003"), Some("Sofia Haddad"));
        assert_eq!(StudentDirectory::child_name("S100"), None);
    }
}
