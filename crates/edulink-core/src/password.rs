//! Password complexity rule shared by every account-creating form.

use std::borrow::Cow;

use validator::ValidationError;

pub const PASSWORD_MIN_LENGTH: u64 = 8;

pub const PASSWORD_LENGTH_MESSAGE: &str = "Password must be at least 8 characters";
pub const PASSWORD_COMPLEXITY_MESSAGE: &str =
    "Password must contain at least one uppercase letter, one lowercase letter, and one number";

/// True when the password contains at least one ASCII lowercase letter, one ASCII uppercase
/// letter and one ASCII digit, anywhere in the string. Length is checked separately.
pub fn meets_complexity(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;

    for c in password.chars() {
        lower |= c.is_ascii_lowercase();
        upper |= c.is_ascii_uppercase();
        digit |= c.is_ascii_digit();
    }

    lower && upper && digit
}

/// `validator` custom rule wrapping [`meets_complexity`].
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    if meets_complexity(password) {
        return Ok(());
    }

    Err(ValidationError::new("password_complexity")
        .with_message(Cow::Borrowed(PASSWORD_COMPLEXITY_MESSAGE)))
}
