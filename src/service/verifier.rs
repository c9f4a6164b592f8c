use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Seam for the payment-gateway signature check so the orchestrator can be
/// exercised without real gateway credentials.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, order_ref: &str, payment_ref: &str, signature: &str) -> bool;
}

/// HMAC-SHA256 over `<order_ref>|<payment_ref>`, hex-encoded, the scheme the
/// payment gateway signs its confirmation callbacks with.
pub struct HmacSha256Verifier {
    pub key_secret: String,
}

impl SignatureVerifier for HmacSha256Verifier {
    fn verify(&self, order_ref: &str, payment_ref: &str, signature: &str) -> bool {
        let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(self.key_secret.as_bytes()) else {
            return false;
        };
        mac.update(format!("{order_ref}|{payment_ref}").as_bytes());

        let Ok(provided) = hex::decode(signature) else {
            return false;
        };

        mac.verify_slice(&provided).is_ok()
    }
}

pub fn sign(key_secret: &str, order_ref: &str, payment_ref: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key_secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("hmac accepts any key length"));
    mac.update(format!("{order_ref}|{payment_ref}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
