//! # Domain Types
//!
//! Core domain types used throughout the sale composition engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CustomerRef    │   │  PaymentMode    │   │    Percent      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  ONE_OFF        │   │  bps (u32)      │       │
//! │  │  names/contact  │   │  INSTALLMENT    │   │  2550 = 25.5%   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌───────────────────────┐   ┌───────────────────────┐                 │
//! │  │ IdentificationDetails │   │ NextOfKin / Guarantor │                 │
//! │  │ document id + dates   │   │ sale-level contacts   │                 │
//! │  └───────────────────────┘   └───────────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The dossier types (identification, next of kin, guarantor) are stored as
//! typed, possibly-incomplete values; their field rules are checked by
//! [`crate::validation`] at submission time, never on write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Payment Mode
// =============================================================================

/// How a product line is paid for.
///
/// Which modes are selectable for a given product comes from the Catalog
/// Provider's `available_payment_modes`; the engine rejects a mode the
/// catalog does not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Paid in full at submission.
    OneOff,
    /// Paid over a number of monthly installments.
    Installment,
}

impl PaymentMode {
    /// Checks whether this mode is installment-based.
    #[inline]
    pub const fn is_installment(&self) -> bool {
        matches!(self, PaymentMode::Installment)
    }
}

// =============================================================================
// Sale Category
// =============================================================================

/// The category of a sale draft.
///
/// Single-valued today; the submission contract still carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleCategory {
    Product,
}

impl Default for SaleCategory {
    fn default() -> Self {
        SaleCategory::Product
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 2550 bps = 25.5%. Used for the
/// installment starting price, which may carry fractional percentages
/// without touching floating point until the payload is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a plain percentage value (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value as a percentage number (wire/display form).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Customer Reference
// =============================================================================

/// An immutable snapshot of the customer selected for the draft.
///
/// Captured at selection time and replaced wholesale on re-selection; the
/// engine never edits individual fields. Also the source for the one-shot
/// recipient auto-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    /// Backend customer id, emitted as `customerId` in the payload.
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl CustomerRef {
    /// Full display name for the console header.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

// =============================================================================
// Identification Details
// =============================================================================

/// A government-issued identification document.
///
/// Required at sale level for installment sales, and nested inside
/// [`GuarantorDetails`]. Field rules (dates, presence) are enforced by
/// [`crate::validation::identification_issues`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationDetails {
    /// Document kind, e.g. "DRIVERS_LICENSE", "NATIONAL_ID".
    pub id_type: String,
    pub id_number: String,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    /// Must be strictly after `issue_date`.
    #[ts(as = "String")]
    pub expiration_date: NaiveDate,
}

// =============================================================================
// Next of Kin
// =============================================================================

/// Next-of-kin contact details, required at sale level for installment
/// sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NextOfKinDetails {
    pub firstname: String,
    pub lastname: String,
    /// Relationship to the customer, e.g. "SPOUSE", "SIBLING".
    pub relationship: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

// =============================================================================
// Guarantor
// =============================================================================

/// Guarantor details, required at sale level for installment sales.
/// Carries its own nested identification document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuarantorDetails {
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Must not be in the future.
    #[ts(as = "String")]
    pub date_of_birth: NaiveDate,
    pub identification: IdentificationDetails,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_mode_wire_values() {
        assert_eq!(
            serde_json::to_value(PaymentMode::OneOff).unwrap(),
            serde_json::json!("ONE_OFF")
        );
        assert_eq!(
            serde_json::to_value(PaymentMode::Installment).unwrap(),
            serde_json::json!("INSTALLMENT")
        );
    }

    #[test]
    fn test_payment_mode_is_installment() {
        assert!(PaymentMode::Installment.is_installment());
        assert!(!PaymentMode::OneOff.is_installment());
    }

    #[test]
    fn test_sale_category_wire_value() {
        assert_eq!(
            serde_json::to_value(SaleCategory::default()).unwrap(),
            serde_json::json!("PRODUCT")
        );
    }

    #[test]
    fn test_percent_from_bps() {
        let pct = Percent::from_bps(2550);
        assert_eq!(pct.bps(), 2550);
        assert!((pct.percentage() - 25.5).abs() < 0.001);
    }

    #[test]
    fn test_percent_from_percentage() {
        let pct = Percent::from_percentage(25.5);
        assert_eq!(pct.bps(), 2550);
        assert!(!pct.is_zero());
        assert!(Percent::from_bps(0).is_zero());
    }

    #[test]
    fn test_customer_display_name() {
        let customer = CustomerRef {
            id: "cus-1".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Obi".to_string(),
            phone: "+2348012345678".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Marina Rd, Lagos".to_string(),
        };
        assert_eq!(customer.display_name(), "Ada Obi");
    }

    #[test]
    fn test_identification_serializes_camel_case() {
        let details = IdentificationDetails {
            id_type: "NATIONAL_ID".to_string(),
            id_number: "A1234567".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["idType"], "NATIONAL_ID");
        assert_eq!(json["issueDate"], "2020-01-15");
        assert_eq!(json["expirationDate"], "2030-01-15");
    }
}
