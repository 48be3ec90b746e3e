//! School subdomain rule: lowercase ASCII letters, digits and hyphens, 3 to 63 characters.
//!
//! The length bound is declared on the schema with `length(min, max)`; this module supplies the
//! character rule so the two failures produce distinct messages.

use std::borrow::Cow;

use validator::ValidationError;

pub const SUBDOMAIN_MIN_LENGTH: u64 = 3;
pub const SUBDOMAIN_MAX_LENGTH: u64 = 63;

pub const SUBDOMAIN_LENGTH_MESSAGE: &str = "Subdomain must be between 3 and 63 characters";
pub const SUBDOMAIN_CHARSET_MESSAGE: &str =
    "Subdomain may only contain lowercase letters, numbers, and hyphens";

pub fn is_subdomain_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

pub fn validate_subdomain_charset(subdomain: &str) -> Result<(), ValidationError> {
    if subdomain.chars().all(is_subdomain_char) {
        return Ok(());
    }

    Err(ValidationError::new("subdomain_charset")
        .with_message(Cow::Borrowed(SUBDOMAIN_CHARSET_MESSAGE)))
}

/// Full check (length and characters) for callers outside a schema.
pub fn is_valid_subdomain(subdomain: &str) -> bool {
    let len = subdomain.chars().count() as u64;
    (SUBDOMAIN_MIN_LENGTH..=SUBDOMAIN_MAX_LENGTH).contains(&len)
        && validate_subdomain_charset(subdomain).is_ok()
}
