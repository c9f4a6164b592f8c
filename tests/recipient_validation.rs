use temple_receipts::notify::email::validate_email;
use temple_receipts::notify::whatsapp::normalize_phone;

#[test]
fn ten_digit_numbers_get_the_country_code() {
    assert_eq!(normalize_phone("9876543210").unwrap(), "+919876543210");
}

#[test]
fn formatting_noise_is_stripped() {
    assert_eq!(normalize_phone("98765 43210").unwrap(), "+919876543210");
    assert_eq!(normalize_phone("+91-98765-43210").unwrap(), "+919876543210");
    assert_eq!(normalize_phone("(91) 9876543210").unwrap(), "+919876543210");
}

#[test]
fn already_prefixed_numbers_pass_through() {
    assert_eq!(normalize_phone("919876543210").unwrap(), "+919876543210");
    assert_eq!(normalize_phone("+919876543210").unwrap(), "+919876543210");
}

#[test]
fn bad_phone_numbers_fail_fast() {
    assert!(normalize_phone("").is_err());
    assert!(normalize_phone("12345").is_err());
    assert!(normalize_phone("abcdefghij").is_err());
    // 91 prefix but wrong total length
    assert!(normalize_phone("91987654321").is_err());
    // 11 digits without a recognizable prefix
    assert!(normalize_phone("19876543210").is_err());
}

#[test]
fn plausible_email_addresses_are_accepted() {
    assert_eq!(validate_email("ramesh@example.com").unwrap(), "ramesh@example.com");
    assert_eq!(validate_email("  ramesh@example.com  ").unwrap(), "ramesh@example.com");
    assert!(validate_email("a.b+tag@sub.example.co.in").is_ok());
}

#[test]
fn malformed_email_addresses_are_rejected() {
    assert!(validate_email("").is_err());
    assert!(validate_email("ramesh").is_err());
    assert!(validate_email("ramesh@").is_err());
    assert!(validate_email("@example.com").is_err());
    assert!(validate_email("ramesh@example").is_err());
    assert!(validate_email("ra mesh@example.com").is_err());
    assert!(validate_email("ramesh@exa@mple.com").is_err());
}
