//! # Edulink Core
//!
//! Core types, errors, and validation rules for the Edulink client.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type shared by every flow
//! - [`password`]: Password complexity rule
//! - [`subdomain`]: School subdomain character rule
//! - [`validation`]: Per-field error collection and the shape-then-refine pipeline
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use edulink_core::errors::AppError;
//! use edulink_core::password::meets_complexity;
//!
//! assert!(meets_complexity("Abc12345"));
//!
//! let error = AppError::storage(anyhow::anyhow!("disk full"));
//! ```

pub mod errors;
pub mod password;
pub mod serde;
pub mod subdomain;
pub mod validation;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use password::meets_complexity;
pub use validation::{FieldErrors, Refine, validate_with};
