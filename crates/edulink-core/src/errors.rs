//! Application error type.
//!
//! Every flow in the client resolves failures to an [`AppError`]: a kind used to decide how the
//! failure is presented, and an [`anyhow::Error`] carrying the cause. Field-level validation
//! failures travel inside the error as a [`FieldErrors`] value and can be recovered with
//! [`AppError::field_errors`].

use std::fmt;

use anyhow::Error;

use crate::validation::FieldErrors;

/// Broad category of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any remote call was made.
    Validation,
    /// Malformed request that is not tied to a single field (e.g. submitting a wizard early).
    BadRequest,
    /// Credentials were refused by the auth service.
    Unauthorized,
    /// The auth/persistence gateway failed or returned an error.
    Remote,
    /// Local durable storage could not be read or written.
    Storage,
    Internal,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::new(ErrorKind::Validation, errors)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::BadRequest, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Unauthorized, err)
    }

    pub fn remote<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Remote, err)
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Storage, err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Internal, err)
    }

    /// Per-field errors, when this error came out of the validator.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.error.downcast_ref::<FieldErrors>()
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
