//! # Sale Line
//!
//! One selected product within a sale draft, aggregating the per-line
//! sub-state: payment parameters, miscellaneous costs, device linkage, and
//! recipient. Removing the line removes all of it — the line owns its
//! sub-state outright, so the cascade is just a drop.
//!
//! ## Readiness
//! A line is submission-ready iff
//! - payment parameters are present (valid for their mode by construction),
//! - every required batch is fully linked, and
//! - the recipient is complete.
//!
//! The cost ledger is optional and never blocks readiness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::ProductSnapshot;
use crate::costs::CostLedger;
use crate::error::{DraftError, DraftResult, FieldIssue, ValidationError, ValidationResult};
use crate::linkage::DeviceLinkage;
use crate::money::Money;
use crate::params::{ParameterSet, PaymentTerms};
use crate::payload::SaleItemPayload;
use crate::recipient::Recipient;
use crate::types::CustomerRef;

// =============================================================================
// Sale Line
// =============================================================================

/// A product line and its composition sub-state.
///
/// The catalog snapshot is frozen at add time (the draft displays
/// consistent data even if the catalog moves) and replaced only through
/// `refresh`, which reconciles the linkage against the new requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    snapshot: ProductSnapshot,
    parameters: Option<ParameterSet>,
    costs: CostLedger,
    linkage: DeviceLinkage,
    recipient: Option<Recipient>,
    /// Display-only: set once any cost mutation succeeds.
    has_misc_info: bool,
    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl SaleLine {
    /// Creates a line with empty sub-state from a catalog snapshot.
    pub fn new(snapshot: ProductSnapshot) -> Self {
        let linkage = DeviceLinkage::from_snapshot(&snapshot);
        SaleLine {
            snapshot,
            parameters: None,
            costs: CostLedger::new(),
            linkage,
            recipient: None,
            has_misc_info: false,
            added_at: Utc::now(),
        }
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.snapshot.product_id
    }

    pub fn snapshot(&self) -> &ProductSnapshot {
        &self.snapshot
    }

    pub fn parameters(&self) -> Option<&ParameterSet> {
        self.parameters.as_ref()
    }

    pub fn costs(&self) -> &CostLedger {
        &self.costs
    }

    pub fn linkage(&self) -> &DeviceLinkage {
        &self.linkage
    }

    pub(crate) fn linkage_mut(&mut self) -> &mut DeviceLinkage {
        &mut self.linkage
    }

    pub fn recipient(&self) -> Option<&Recipient> {
        self.recipient.as_ref()
    }

    #[inline]
    pub fn has_misc_info(&self) -> bool {
        self.has_misc_info
    }

    #[inline]
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// The line's sale quantity: total committed devices across batches.
    pub fn quantity(&self) -> u32 {
        self.linkage.total_committed()
    }

    /// True iff any line of the draft pays in installments — per-line form.
    pub fn is_installment(&self) -> bool {
        self.parameters
            .as_ref()
            .is_some_and(ParameterSet::is_installment)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Validates and stores payment terms for this line.
    ///
    /// Fails with `PaymentModeUnavailable` when the catalog does not offer
    /// the requested mode for this product.
    pub fn set_parameters(&mut self, terms: PaymentTerms) -> DraftResult<()> {
        if !self.snapshot.supports_mode(terms.payment_mode) {
            return Err(DraftError::PaymentModeUnavailable {
                product_id: self.snapshot.product_id.clone(),
                mode: terms.payment_mode,
            });
        }

        self.parameters = Some(ParameterSet::from_terms(terms)?);
        Ok(())
    }

    pub fn clear_parameters(&mut self) {
        self.parameters = None;
    }

    // =========================================================================
    // Costs
    // =========================================================================

    /// Inserts or overwrites a miscellaneous cost entry.
    pub fn set_cost(&mut self, name: &str, amount: Money) -> ValidationResult<()> {
        self.costs.set_cost(name, amount)?;
        self.has_misc_info = true;
        Ok(())
    }

    /// Removes a cost entry. Returns whether an entry was removed.
    pub fn remove_cost(&mut self, name: &str) -> bool {
        let removed = self.costs.remove_cost(name);
        if removed {
            self.has_misc_info = true;
        }
        removed
    }

    // =========================================================================
    // Recipient
    // =========================================================================

    /// Stores recipient form state as-is; completeness is checked at
    /// readiness time, not on write.
    pub fn set_recipient(&mut self, recipient: Recipient) {
        self.recipient = Some(recipient);
    }

    /// Copies the customer's contact fields into the recipient. One-shot:
    /// later edits to the recipient are independent of the customer.
    pub fn autofill_recipient(&mut self, customer: &CustomerRef) {
        self.recipient = Some(Recipient::from_customer(customer));
    }

    // =========================================================================
    // Catalog refresh
    // =========================================================================

    /// Adopts a refreshed catalog snapshot for the same product.
    ///
    /// The linkage is reconciled against the new batch requirements, and
    /// stored parameters are cleared if their mode is no longer offered.
    pub fn refresh(&mut self, snapshot: ProductSnapshot) -> ValidationResult<()> {
        if snapshot.product_id != self.snapshot.product_id {
            return Err(ValidationError::InvalidFormat {
                field: "productId".to_string(),
                reason: "snapshot does not match the product line".to_string(),
            });
        }

        self.linkage.reconcile(&snapshot);
        if let Some(params) = &self.parameters {
            if !snapshot.supports_mode(params.payment_mode()) {
                self.parameters = None;
            }
        }
        self.snapshot = snapshot;
        Ok(())
    }

    // =========================================================================
    // Readiness & projection
    // =========================================================================

    /// Collects every issue blocking this line from submission, with field
    /// paths rooted at `prefix` (e.g. `saleItems[2]`).
    pub fn readiness_issues(&self, prefix: &str) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if self.parameters.is_none() {
            issues.push(FieldIssue::new(
                format!("{}.paymentMode", prefix),
                "Payment parameters are required",
            ));
        }

        for batch in self.linkage.incomplete_batches() {
            issues.push(FieldIssue::new(
                format!("{}.devices", prefix),
                format!(
                    "Batch {} requires {} devices, {} linked",
                    batch.name(),
                    batch.required_quantity(),
                    batch.committed_count()
                ),
            ));
        }

        match &self.recipient {
            None => issues.push(FieldIssue::new(
                format!("{}.saleRecipient", prefix),
                "Sale recipient is required",
            )),
            Some(recipient) => {
                issues.extend(recipient.issues(&format!("{}.saleRecipient", prefix)));
            }
        }

        issues
    }

    /// True iff parameters, linkage, and recipient are all complete.
    pub fn is_ready_for_submission(&self) -> bool {
        self.readiness_issues("saleItem").is_empty()
    }

    /// Projects the line into its submission shape. Pure — no side effects.
    ///
    /// Fails with `NotReady` (carrying the blocking issues) when called on
    /// an incomplete line.
    pub fn to_sale_item(&self) -> DraftResult<SaleItemPayload> {
        let issues = self.readiness_issues("saleItem");
        let (Some(params), Some(recipient), true) =
            (&self.parameters, &self.recipient, issues.is_empty())
        else {
            return Err(DraftError::NotReady { issues });
        };

        Ok(SaleItemPayload {
            product_id: self.snapshot.product_id.clone(),
            quantity: self.quantity(),
            payment_mode: params.payment_mode(),
            discount: params.discount(),
            installment_duration: params.installment_duration(),
            installment_starting_price: params
                .installment_starting_price()
                .map(|p| p.percentage()),
            devices: self.linkage.committed_devices(),
            miscellaneous_prices: if self.costs.is_empty() {
                None
            } else {
                Some(self.costs.entries().clone())
            },
            sale_recipient: recipient.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
