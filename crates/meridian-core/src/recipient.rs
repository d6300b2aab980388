//! # Sale Recipient
//!
//! Delivery/recipient identity per product line. May be auto-filled once
//! from the draft's customer, after which it is edited independently —
//! there is no live sync back to the customer reference.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::FieldIssue;
use crate::types::CustomerRef;
use crate::validation::{validate_email, validate_name, validate_phone};

// =============================================================================
// Recipient
// =============================================================================

/// Who receives one product line.
///
/// Stored as typed, possibly-incomplete form state; all five fields are
/// required (plus a basic email format check) before the line is
/// submission-ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Recipient {
    /// One-shot copy from the sale's customer reference.
    pub fn from_customer(customer: &CustomerRef) -> Self {
        Recipient {
            firstname: customer.firstname.clone(),
            lastname: customer.lastname.clone(),
            address: customer.address.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
        }
    }

    /// Collects one issue per incomplete or malformed field.
    pub fn issues(&self, prefix: &str) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        let names = [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("address", &self.address),
        ];
        for (field, value) in names {
            if let Err(e) = validate_name(field, value) {
                issues.push(FieldIssue::at(prefix, e));
            }
        }
        if let Err(e) = validate_phone("phone", &self.phone) {
            issues.push(FieldIssue::at(prefix, e));
        }
        if let Err(e) = validate_email("email", &self.email) {
            issues.push(FieldIssue::at(prefix, e));
        }

        issues
    }

    /// True iff all five fields are present and well-formed.
    pub fn is_complete(&self) -> bool {
        self.issues("").is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerRef {
        CustomerRef {
            id: "cus-1".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Obi".to_string(),
            phone: "+2348012345678".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Marina Rd, Lagos".to_string(),
        }
    }

    #[test]
    fn test_autofill_copies_customer_fields() {
        let recipient = Recipient::from_customer(&customer());
        assert_eq!(recipient.firstname, "Ada");
        assert_eq!(recipient.lastname, "Obi");
        assert_eq!(recipient.address, "12 Marina Rd, Lagos");
        assert!(recipient.is_complete());
    }

    #[test]
    fn test_autofill_then_edit_is_independent() {
        let source = customer();
        let mut recipient = Recipient::from_customer(&source);

        recipient.firstname = "Chinedu".to_string();
        // Editing the recipient does not touch the customer snapshot
        assert_eq!(source.firstname, "Ada");
        assert!(recipient.is_complete());
    }

    #[test]
    fn test_incomplete_recipient_reports_each_field() {
        let recipient = Recipient {
            firstname: "Ada".to_string(),
            lastname: String::new(),
            address: String::new(),
            phone: "0801".to_string(),
            email: "not-an-email".to_string(),
        };

        let issues = recipient.issues("saleItems[0].saleRecipient");
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"saleItems[0].saleRecipient.lastname"));
        assert!(fields.contains(&"saleItems[0].saleRecipient.address"));
        assert!(fields.contains(&"saleItems[0].saleRecipient.phone"));
        assert!(fields.contains(&"saleItems[0].saleRecipient.email"));
        assert!(!fields.contains(&"saleItems[0].saleRecipient.firstname"));
        assert!(!recipient.is_complete());
    }

    #[test]
    fn test_default_recipient_is_incomplete() {
        assert!(!Recipient::default().is_complete());
    }
}
