use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Checkout form. The card fields are only checked for presence; they are never stored,
/// logged or sent anywhere.
#[derive(Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvv: String,
}

impl PaymentRequest {
    pub fn is_complete(&self) -> bool {
        [&self.email, &self.card_number, &self.expiry, &self.cvv]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("email", &self.email)
            .field("card_number", &"<redacted>")
            .field("expiry", &"<redacted>")
            .field("cvv", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Local reference only. No payment processor is involved.
    pub receipt_id: Uuid,
    pub identifier: String,
    pub is_paid: bool,
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentLinkResponse {
    pub payment_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, card: &str, expiry: &str, cvv: &str) -> PaymentRequest {
        PaymentRequest {
            email: email.into(),
            card_number: card.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    #[test]
    fn every_field_is_required() {
        assert!(form("a@b.com", "4242424242424242", "12/30", "123").is_complete());
        assert!(!form("", "4242424242424242", "12/30", "123").is_complete());
        assert!(!form("a@b.com", "4242424242424242", " ", "123").is_complete());
        assert!(!form("a@b.com", "4242424242424242", "12/30", "").is_complete());
    }

    #[test]
    fn debug_output_hides_card_details() {
        let rendered = format!("{:?}", form("a@b.com", "4242424242424242", "12/30", "987"));
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("4242"));
        assert!(!rendered.contains("987"));
    }
}
