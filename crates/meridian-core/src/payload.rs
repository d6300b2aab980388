//! # Sale Payload
//!
//! The final, externally-submitted representation of a completed sale
//! draft. These shapes are the submission contract: field names, casing,
//! and optional-key omission must match what the Order Submission Service
//! expects, byte for byte.
//!
//! Payload values are produced exclusively by `SaleDraft::build_payload`
//! (and `SaleLine::to_sale_item`), which validate first; the structs here
//! are plain data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::FieldIssue;
use crate::money::Money;
use crate::recipient::Recipient;
use crate::types::{
    GuarantorDetails, IdentificationDetails, NextOfKinDetails, PaymentMode, SaleCategory,
};

// =============================================================================
// Sale Item Payload
// =============================================================================

/// One submitted product line.
///
/// Installment fields are present only for INSTALLMENT lines; `discount`
/// and `miscellaneousPrices` are omitted entirely when absent/empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemPayload {
    pub product_id: String,
    /// Total committed devices across the line's batches.
    pub quantity: u32,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_duration: Option<u32>,
    /// Percentage number (e.g. 25.5), not basis points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_starting_price: Option<f64>,
    /// Flattened committed device ids, in batch order.
    pub devices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miscellaneous_prices: Option<BTreeMap<String, Money>>,
    pub sale_recipient: Recipient,
}

// =============================================================================
// Sale Payload
// =============================================================================

/// The complete submission body.
///
/// The dossier keys (`bvn`, `identificationDetails`, `nextOfKinDetails`,
/// `guarantorDetails`) appear only when the sale carries at least one
/// installment line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub category: SaleCategory,
    pub customer_id: String,
    pub apply_margin: bool,
    pub sale_items: Vec<SaleItemPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bvn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification_details: Option<IdentificationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_of_kin_details: Option<NextOfKinDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guarantor_details: Option<GuarantorDetails>,
}

// =============================================================================
// Order Submission Trait
// =============================================================================

/// The downstream service that accepts a finished payload.
///
/// The engine never calls this itself — `build_payload` is pure — but the
/// seam fixes the contract: either an acknowledgment or a field-level issue
/// list, which the console renders exactly like local validation issues.
pub trait OrderSubmission {
    /// Submits the payload. Returns the backend's field-level issues on
    /// rejection.
    fn submit(&self, payload: &SalePayload) -> Result<(), Vec<FieldIssue>>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_off_item_omits_installment_keys() {
        let item = SaleItemPayload {
            product_id: "prod-1".to_string(),
            quantity: 2,
            payment_mode: PaymentMode::OneOff,
            discount: None,
            installment_duration: None,
            installment_starting_price: None,
            devices: vec!["d1".to_string(), "d2".to_string()],
            miscellaneous_prices: None,
            sale_recipient: Recipient {
                firstname: "Ada".to_string(),
                lastname: "Obi".to_string(),
                address: "12 Marina Rd".to_string(),
                phone: "+2348012345678".to_string(),
                email: "ada@example.com".to_string(),
            },
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "productId": "prod-1",
                "quantity": 2,
                "paymentMode": "ONE_OFF",
                "devices": ["d1", "d2"],
                "saleRecipient": {
                    "firstname": "Ada",
                    "lastname": "Obi",
                    "address": "12 Marina Rd",
                    "phone": "+2348012345678",
                    "email": "ada@example.com"
                }
            })
        );
    }

    #[test]
    fn test_installment_item_carries_terms_and_costs() {
        let item = SaleItemPayload {
            product_id: "prod-1".to_string(),
            quantity: 1,
            payment_mode: PaymentMode::Installment,
            discount: Some(Money::from_minor(1500)),
            installment_duration: Some(6),
            installment_starting_price: Some(25.5),
            devices: vec!["d1".to_string()],
            miscellaneous_prices: Some(BTreeMap::from([(
                "Delivery".to_string(),
                Money::from_minor(2000),
            )])),
            sale_recipient: Recipient::default(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["paymentMode"], "INSTALLMENT");
        assert_eq!(value["discount"], 1500);
        assert_eq!(value["installmentDuration"], 6);
        assert_eq!(value["installmentStartingPrice"], 25.5);
        assert_eq!(value["miscellaneousPrices"]["Delivery"], 2000);
    }

    #[test]
    fn test_payload_omits_absent_dossier_keys() {
        let payload = SalePayload {
            category: SaleCategory::Product,
            customer_id: "cus-1".to_string(),
            apply_margin: false,
            sale_items: Vec::new(),
            bvn: None,
            identification_details: None,
            next_of_kin_details: None,
            guarantor_details: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["applyMargin", "category", "customerId", "saleItems"]);
        assert_eq!(value["category"], "PRODUCT");
    }
}
