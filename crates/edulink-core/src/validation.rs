//! Field error collection and the shape-then-refine validation pipeline.
//!
//! Schemas derive [`validator::Validate`] for their per-field shape checks (length, email
//! format, character rules) and implement [`Refine`] for cross-field rules. [`validate_with`]
//! runs every shape check, and runs the refinements only when all of them passed. Errors are
//! keyed by the camelCase field name the user sees in the form.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Human-readable messages keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Drops any messages recorded for the given fields.
    pub fn clear_fields(&mut self, fields: &[&str]) {
        for field in fields {
            self.0.remove(*field);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Converts `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn collect(&mut self, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let field = to_camel_case(&field.to_string());
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        let message = error
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field));
                        self.add(field.clone(), message);
                    }
                }
                // Nested structs are flattened into the parent form, so their
                // fields are reported without a prefix.
                ValidationErrorsKind::Struct(nested) => self.collect(nested),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        let mut inner = FieldErrors::default();
                        inner.collect(nested);
                        for (child, messages) in inner.0 {
                            let path = format!("{}[{}].{}", field, index, child);
                            self.0.entry(path).or_default().extend(messages);
                        }
                    }
                }
            }
        }
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut collected = FieldErrors::default();
        collected.collect(errors);
        collected
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from(&errors)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for FieldErrors {}

/// Cross-field rules evaluated after the per-field shape checks pass.
pub trait Refine: Validate {
    /// External data the refinements consult (e.g. the set of registered student IDs).
    type Context: ?Sized;

    fn refine(&self, ctx: &Self::Context) -> FieldErrors;
}

/// Runs all shape checks, then (only if they all passed) the refinements.
pub fn validate_with<T>(value: &T, ctx: &T::Context) -> Result<(), FieldErrors>
where
    T: Refine + ?Sized,
{
    if let Err(errors) = value.validate() {
        return Err(FieldErrors::from(&errors));
    }

    value.refine(ctx).into_result()
}

/// `child_student_id` -> `childStudentId`
pub fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
