use edulink_core::AppError;
use edulink_core::validation::{FieldErrors, Refine, validate_with};
use tracing::debug;
use validator::Validate;

fn format_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| format!("{}: {}", field, message))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn reject(errors: FieldErrors) -> AppError {
    debug!(fields = errors.fields().count(), errors = %format_errors(&errors), "Form rejected");
    AppError::validation(errors)
}

/// A form value that passed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validated<T>(pub T);

impl<T: Validate> Validated<T> {
    /// Shape checks only.
    pub fn new(value: T) -> Result<Self, AppError> {
        value
            .validate()
            .map_err(|errors| reject(FieldErrors::from(&errors)))?;
        Ok(Self(value))
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Refine> Validated<T> {
    /// Shape checks, then the refinements against `ctx`.
    pub fn with_context(value: T, ctx: &T::Context) -> Result<Self, AppError> {
        validate_with(&value, ctx).map_err(reject)?;
        Ok(Self(value))
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}
