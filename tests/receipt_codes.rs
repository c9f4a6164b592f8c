use chrono::NaiveDate;
use temple_receipts::domain::receipt::{date_bucket, Receipt, ReceiptCategory};

#[test]
fn formats_code_with_prefix_date_and_padded_sequence() {
    let receipt = Receipt {
        category: ReceiptCategory::Donation,
        date_bucket: "161024".to_string(),
        sequence: 1,
    };
    assert_eq!(receipt.code(), "DN-161024-0001");
}

#[test]
fn pads_sequence_to_four_digits() {
    let mut receipt = Receipt {
        category: ReceiptCategory::Donation,
        date_bucket: "161024".to_string(),
        sequence: 42,
    };
    assert_eq!(receipt.code(), "DN-161024-0042");

    receipt.sequence = 12345;
    assert_eq!(receipt.code(), "DN-161024-12345");
}

#[test]
fn each_category_has_a_fixed_prefix() {
    assert_eq!(ReceiptCategory::Donation.prefix(), "DN");
    assert_eq!(ReceiptCategory::CeremonyBooking.prefix(), "PB");
    assert_eq!(ReceiptCategory::Consultation.prefix(), "AC");
    assert_eq!(ReceiptCategory::RemedialRite.prefix(), "PARI");
}

#[test]
fn date_bucket_is_ddmmyy() {
    let date = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
    assert_eq!(date_bucket(date), "161024");

    let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert_eq!(date_bucket(new_year), "010125");
}

#[test]
fn category_names_round_trip() {
    for category in [
        ReceiptCategory::Donation,
        ReceiptCategory::CeremonyBooking,
        ReceiptCategory::Consultation,
        ReceiptCategory::RemedialRite,
    ] {
        assert_eq!(ReceiptCategory::parse(category.as_str()), Some(category));
    }
    assert_eq!(ReceiptCategory::parse("PLEDGE"), None);
}
