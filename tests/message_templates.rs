use chrono::{TimeZone, Utc};
use temple_receipts::domain::event::{BirthDetails, ServiceDetails};
use temple_receipts::domain::record::{RecordStatus, StoredRecord};
use temple_receipts::notify::templates;
use temple_receipts::notify::OrgProfile;
use uuid::Uuid;

fn org() -> OrgProfile {
    OrgProfile {
        name: "Shri Raghavendra Swamy Brundavana Sannidhi".to_string(),
        subtitle: "Service to Humanity is Service to God".to_string(),
        contact_phone: "+918310408797".to_string(),
    }
}

fn record(receipt: &str, details: ServiceDetails) -> StoredRecord {
    StoredRecord {
        record_id: Uuid::new_v4(),
        receipt_number: receipt.to_string(),
        category: details.category(),
        payer_name: "Ramesh Kumar".to_string(),
        payer_phone: "+919876543210".to_string(),
        payer_email: Some("ramesh@example.com".to_string()),
        amount_minor: 110_000,
        order_ref: "order_abc".to_string(),
        payment_ref: "pay_xyz".to_string(),
        status: RecordStatus::Success,
        details,
        certificate_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 10, 16, 9, 30, 0).unwrap(),
    }
}

#[test]
fn donation_receipt_carries_code_amount_and_purpose() {
    let record = record(
        "DN-161024-0001",
        ServiceDetails::Donation {
            donation_type: "Annadana".to_string(),
            donation_purpose: "Food offering".to_string(),
        },
    );
    let body = templates::receipt_message(&record, &org());

    assert!(body.contains("DN-161024-0001"));
    assert!(body.contains("₹1100"));
    assert!(body.contains("Annadana"));
    assert!(body.contains("Ramesh Kumar"));
    assert!(body.contains("16/10/2024"));
}

#[test]
fn ceremony_booking_receipt_lists_the_booking_details() {
    let record = record(
        "PB-161024-0007",
        ServiceDetails::CeremonyBooking {
            ceremony_name: "Satyanarayana Pooja".to_string(),
            preferred_date: chrono::NaiveDate::from_ymd_opt(2024, 11, 2),
            preferred_time: Some("Morning".to_string()),
            nakshatra: Some("Rohini".to_string()),
            gotra: Some("Kashyapa".to_string()),
        },
    );
    let body = templates::receipt_message(&record, &org());

    assert!(body.contains("PB-161024-0007"));
    assert!(body.contains("Satyanarayana Pooja"));
    assert!(body.contains("02/11/2024"));
    assert!(body.contains("Rohini"));
    assert!(body.contains("Kashyapa"));
}

#[test]
fn consultation_receipt_includes_birth_details_and_concerns() {
    let record = record(
        "AC-161024-0002",
        ServiceDetails::Consultation {
            consultation_type: "Jataka Consultation".to_string(),
            preferred_date: None,
            preferred_time: None,
            birth_details: Some(BirthDetails {
                date_of_birth: "1990-04-12".to_string(),
                time_of_birth: "06:45".to_string(),
                place_of_birth: "Bangalore".to_string(),
            }),
            concerns: vec!["career".to_string(), "health".to_string()],
        },
    );
    let body = templates::receipt_message(&record, &org());

    assert!(body.contains("AC-161024-0002"));
    assert!(body.contains("Jataka Consultation"));
    assert!(body.contains("1990-04-12"));
    assert!(body.contains("career, health"));
}

#[test]
fn remedial_rite_receipt_names_the_rite() {
    let record = record(
        "PARI-161024-0001",
        ServiceDetails::RemedialRite {
            rite_name: "Navagraha Shanti".to_string(),
        },
    );
    let body = templates::receipt_message(&record, &org());

    assert!(body.contains("PARI-161024-0001"));
    assert!(body.contains("Navagraha Shanti"));
    assert!(body.contains("₹1100"));
}

#[test]
fn admin_copy_includes_payer_contact_and_refs() {
    let record = record(
        "DN-161024-0001",
        ServiceDetails::Donation {
            donation_type: "General Donation".to_string(),
            donation_purpose: "Temple maintenance".to_string(),
        },
    );
    let body = templates::admin_message(&record, &org());

    assert!(body.contains("New Donation Received"));
    assert!(body.contains("+919876543210"));
    assert!(body.contains("DN-161024-0001"));
    assert!(body.contains("pay_xyz"));
}

#[test]
fn email_subject_and_body_match_the_category() {
    let record = record(
        "PB-161024-0007",
        ServiceDetails::CeremonyBooking {
            ceremony_name: "Ganapathi Homam".to_string(),
            preferred_date: None,
            preferred_time: None,
            nakshatra: None,
            gotra: None,
        },
    );

    assert_eq!(
        templates::receipt_subject(&record),
        "Pooja Booking Confirmation - PB-161024-0007"
    );

    let html = templates::receipt_email_html(&record, &org());
    assert!(html.contains("PB-161024-0007"));
    assert!(html.contains("Ganapathi Homam"));
    assert!(html.contains("₹1100"));
}

#[test]
fn fractional_amounts_keep_their_paise() {
    let mut record = record(
        "DN-161024-0003",
        ServiceDetails::Donation {
            donation_type: "General Donation".to_string(),
            donation_purpose: "Temple maintenance".to_string(),
        },
    );
    record.amount_minor = 110_050;

    let body = templates::receipt_message(&record, &org());
    assert!(body.contains("₹1100.50"));
}
