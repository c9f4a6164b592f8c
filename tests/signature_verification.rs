use temple_receipts::service::verifier::{sign, HmacSha256Verifier, SignatureVerifier};

#[test]
fn a_correctly_signed_payment_verifies() {
    let verifier = HmacSha256Verifier {
        key_secret: "test_secret".to_string(),
    };
    let signature = sign("test_secret", "order_abc", "pay_xyz");

    assert!(verifier.verify("order_abc", "pay_xyz", &signature));
}

#[test]
fn a_tampered_reference_fails_verification() {
    let verifier = HmacSha256Verifier {
        key_secret: "test_secret".to_string(),
    };
    let signature = sign("test_secret", "order_abc", "pay_xyz");

    assert!(!verifier.verify("order_abc", "pay_other", &signature));
    assert!(!verifier.verify("order_other", "pay_xyz", &signature));
}

#[test]
fn a_signature_from_a_different_secret_fails() {
    let verifier = HmacSha256Verifier {
        key_secret: "test_secret".to_string(),
    };
    let signature = sign("another_secret", "order_abc", "pay_xyz");

    assert!(!verifier.verify("order_abc", "pay_xyz", &signature));
}

#[test]
fn garbage_signatures_are_rejected_not_fatal() {
    let verifier = HmacSha256Verifier {
        key_secret: "test_secret".to_string(),
    };

    assert!(!verifier.verify("order_abc", "pay_xyz", ""));
    assert!(!verifier.verify("order_abc", "pay_xyz", "not-hex!"));
    assert!(!verifier.verify("order_abc", "pay_xyz", "deadbeef"));
}
