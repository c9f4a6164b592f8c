use crate::domain::event::ServiceDetails;
use crate::domain::record::{display_amount, StoredRecord};
use crate::notify::OrgProfile;

pub fn receipt_subject(record: &StoredRecord) -> String {
    let label = match record.details {
        ServiceDetails::Donation { .. } => "Donation Receipt",
        ServiceDetails::CeremonyBooking { .. } => "Pooja Booking Confirmation",
        ServiceDetails::Consultation { .. } => "Consultation Booking Confirmation",
        ServiceDetails::RemedialRite { .. } => "Parihara Pooja Confirmation",
    };
    format!("{} - {}", label, record.receipt_number)
}

/// WhatsApp body for the payer. Each category carries its own wording and
/// detail lines; all of them include the receipt number and amount.
pub fn receipt_message(record: &StoredRecord, org: &OrgProfile) -> String {
    let amount = display_amount(record.amount_minor);
    let date = record.created_at.format("%d/%m/%Y");

    match &record.details {
        ServiceDetails::Donation {
            donation_type,
            donation_purpose,
        } => format!(
            "🙏 *Donation Receipt* 🙏\n\n\
             Dear {name},\n\n\
             Thank you for your generous contribution to {org}!\n\n\
             🧾 *Receipt Details:*\n\
             • Receipt Number: {receipt}\n\
             • Amount: ₹{amount}\n\
             • Donation Type: {donation_type}\n\
             • Purpose: {donation_purpose}\n\
             • Date: {date}\n\n\
             🙏 *May Sri Raghavendra Swamy bless you and your family!*\n\n\
             For any queries, please contact: {contact}\n\n\
             ---\n*{org}*",
            name = record.payer_name,
            org = org.name,
            receipt = record.receipt_number,
            contact = org.contact_phone,
        ),
        ServiceDetails::CeremonyBooking {
            ceremony_name,
            preferred_date,
            preferred_time,
            nakshatra,
            gotra,
        } => {
            let mut lines = format!(
                "Dear {name},\n\n\
                 Your pooja booking at {org} is confirmed.\n\n\
                 📿 *Booking Details:*\n\
                 • Receipt Number: {receipt}\n\
                 • Pooja: {ceremony_name}\n\
                 • Amount: ₹{amount}\n\
                 • Booked On: {date}\n",
                name = record.payer_name,
                org = org.name,
                receipt = record.receipt_number,
            );
            if let Some(d) = preferred_date {
                lines.push_str(&format!("• Preferred Date: {}\n", d.format("%d/%m/%Y")));
            }
            if let Some(t) = preferred_time {
                lines.push_str(&format!("• Preferred Time: {t}\n"));
            }
            if let Some(n) = nakshatra {
                lines.push_str(&format!("• Nakshatra: {n}\n"));
            }
            if let Some(g) = gotra {
                lines.push_str(&format!("• Gotra: {g}\n"));
            }
            lines.push_str(&format!(
                "\nOur priests will contact you to confirm the schedule.\n\n\
                 🙏 May Sri Raghavendra Swamy bless you and fulfill your prayers!\n\n\
                 ---\n*{}*",
                org.name
            ));
            lines
        }
        ServiceDetails::Consultation {
            consultation_type,
            preferred_date,
            preferred_time,
            birth_details,
            concerns,
        } => {
            let mut lines = format!(
                "🔮 *Astrology Consultation Booking Confirmation* 🔮\n\n\
                 Dear {name},\n\n\
                 📋 *Consultation Details:*\n\
                 • Receipt Number: {receipt}\n\
                 • Consultation: {consultation_type}\n\
                 • Amount: ₹{amount}\n\
                 • Booked On: {date}\n",
                name = record.payer_name,
                receipt = record.receipt_number,
            );
            if let Some(d) = preferred_date {
                lines.push_str(&format!("• Preferred Date: {}\n", d.format("%d/%m/%Y")));
            }
            if let Some(t) = preferred_time {
                lines.push_str(&format!("• Preferred Time: {t}\n"));
            }
            if let Some(b) = birth_details {
                lines.push_str(&format!(
                    "• Birth Details: {} at {}, {}\n",
                    b.date_of_birth, b.time_of_birth, b.place_of_birth
                ));
            }
            if !concerns.is_empty() {
                lines.push_str(&format!("• Concerns: {}\n", concerns.join(", ")));
            }
            lines.push_str(&format!(
                "\nOur astrologer will reach out before the consultation.\n\n\
                 🙏 *May the divine wisdom of the cosmos illuminate your path!*\n\n\
                 ---\n*{}*",
                org.name
            ));
            lines
        }
        ServiceDetails::RemedialRite { rite_name } => format!(
            "🙏 *Parihara Pooja Booking Confirmation* 🙏\n\n\
             Dear {name},\n\n\
             🔱 *Parihara Details:*\n\
             • Receipt Number: {receipt}\n\
             • Parihara: {rite_name}\n\
             • Amount: ₹{amount}\n\
             • Date: {date}\n\n\
             🙏 *May Sri Raghavendra Swamy's blessings remove all obstacles from your life!*\n\n\
             ---\n*{org}*",
            name = record.payer_name,
            receipt = record.receipt_number,
            org = org.name,
        ),
    }
}

/// Admin copy on the primary channel after the payer sends settle.
pub fn admin_message(record: &StoredRecord, org: &OrgProfile) -> String {
    let amount = display_amount(record.amount_minor);
    let date = record.created_at.format("%d/%m/%Y");

    let heading = match record.details {
        ServiceDetails::Donation { .. } => "🙏 *New Donation Received* 🙏",
        ServiceDetails::CeremonyBooking { .. } => "New Pooja Booking Received",
        ServiceDetails::Consultation { .. } => "🔮 *New Astrology Consultation Booking* 🔮",
        ServiceDetails::RemedialRite { .. } => "🔮 *New Parihara Pooja Booking Received* 🔮",
    };

    format!(
        "{heading}\n\n\
         📝 *Payer Details:*\n\
         • Name: {name}\n\
         • Phone: {phone}\n\
         • Service: {service}\n\
         • Amount: ₹{amount}\n\n\
         🧾 *Transaction Details:*\n\
         • Receipt Number: {receipt}\n\
         • Payment Ref: {payment_ref}\n\
         • Date: {date}\n\n\
         📍 *{org}*",
        name = record.payer_name,
        phone = record.payer_phone,
        service = record.details.service_name(),
        receipt = record.receipt_number,
        payment_ref = record.payment_ref,
        org = org.name,
    )
}

pub fn receipt_email_html(record: &StoredRecord, org: &OrgProfile) -> String {
    let amount = display_amount(record.amount_minor);
    let date = record.created_at.format("%d/%m/%Y");

    format!(
        "<div style=\"font-family: Georgia, serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #8B4513; text-align: center;\">{org}</h2>\
         <p style=\"text-align: center; font-style: italic;\">{subtitle}</p>\
         <hr/>\
         <p>Dear {name},</p>\
         <p>Thank you for your payment towards <strong>{service}</strong>.</p>\
         <table style=\"width: 100%; border-collapse: collapse;\">\
         <tr><td style=\"padding: 4px 8px;\">Receipt Number</td>\
         <td style=\"padding: 4px 8px;\"><strong>{receipt}</strong></td></tr>\
         <tr><td style=\"padding: 4px 8px;\">Amount</td>\
         <td style=\"padding: 4px 8px;\">₹{amount}</td></tr>\
         <tr><td style=\"padding: 4px 8px;\">Date</td>\
         <td style=\"padding: 4px 8px;\">{date}</td></tr>\
         </table>\
         <p>🙏 May Sri Raghavendra Swamy bless you and your family!</p>\
         <p style=\"color: #666; font-size: 12px;\">For queries contact {contact}.</p>\
         </div>",
        org = org.name,
        subtitle = org.subtitle,
        name = record.payer_name,
        service = record.details.service_name(),
        receipt = record.receipt_number,
        contact = org.contact_phone,
    )
}

pub fn delivery_failure_alert(
    recipient: &str,
    status: &str,
    error_code: Option<&str>,
    error_message: Option<&str>,
) -> String {
    format!(
        "⚠️ *WhatsApp Delivery Failure*\n\n\
         ❌ *Message failed to deliver:*\n\
         • To: {recipient}\n\
         • Status: {status}\n\
         • Error: {error}\n\
         • Code: {code}\n\n\
         Please check the recipient's number and message content.",
        error = error_message.unwrap_or("Unknown error"),
        code = error_code.unwrap_or("N/A"),
    )
}

pub fn all_channels_failed_alert(receipt_number: &str, payer_name: &str) -> String {
    format!(
        "⚠️ *Notification Failure*\n\n\
         All delivery channels failed for receipt {receipt_number} ({payer_name}).\n\
         The payment is recorded; please reach the payer manually."
    )
}

pub fn signature_failure_alert(order_ref: &str) -> String {
    format!(
        "🚨 *Payment Signature Verification Failed*\n\n\
         Order ref: {order_ref}\n\
         This may indicate a tampered callback. No record was created."
    )
}
