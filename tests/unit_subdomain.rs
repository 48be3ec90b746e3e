use edulink::edulink_core::subdomain::{
    SUBDOMAIN_CHARSET_MESSAGE, is_valid_subdomain, validate_subdomain_charset,
};

#[test]
fn test_valid_subdomains() {
    assert!(is_valid_subdomain("my-school1"));
    assert!(is_valid_subdomain("abc"));
    assert!(is_valid_subdomain(&"a".repeat(63)));
}

#[test]
fn test_subdomain_length_bounds() {
    assert!(!is_valid_subdomain("ab"));
    assert!(!is_valid_subdomain(&"a".repeat(64)));
    assert!(!is_valid_subdomain(""));
}

#[test]
fn test_subdomain_rejects_uppercase_and_symbols() {
    assert!(!is_valid_subdomain("My-School"));
    assert!(!is_valid_subdomain("my school"));
    assert!(!is_valid_subdomain("my_school"));
    assert!(!is_valid_subdomain("école"));
}

#[test]
fn test_charset_error_message() {
    let error = validate_subdomain_charset("My School!").unwrap_err();
    assert_eq!(error.message.as_deref(), Some(SUBDOMAIN_CHARSET_MESSAGE));
}
