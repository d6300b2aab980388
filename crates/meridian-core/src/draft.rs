//! # Sale Draft Controller
//!
//! The top-level draft for one composition session: customer, product
//! lines, margin flag, and the sale-level installment dossier. Every
//! mutation of the engine goes through this type, which is what lets it
//! enforce the one invariant no single line can see — a device id may be
//! linked (tentative or committed) to at most one batch across the whole
//! draft.
//!
//! ## Composition Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sale Draft Operations                              │
//! │                                                                         │
//! │  Console Action            Draft Method              State Change       │
//! │  ──────────────            ────────────              ────────────       │
//! │  Pick customer ──────────► select_customer() ──────► customer = Some    │
//! │  Add product ────────────► add_product() ──────────► lines.push(line)   │
//! │  Set terms ──────────────► set_parameters() ───────► line.parameters    │
//! │  Pick devices ───────────► toggle/commit_batch() ──► line.linkage       │
//! │  Fill recipient ─────────► set_recipient() ────────► line.recipient     │
//! │  Submit ─────────────────► build_payload() ────────► (read only)        │
//! │  Cancel / acknowledged ──► discard() ──────────────► empty draft        │
//! │                                                                         │
//! │  Every successful mutation bumps revision(); completeness is always    │
//! │  re-derived by pulling the query methods, never pushed.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no ambient global store: each composition session owns exactly
//! one `SaleDraft` value, so concurrent or test-isolated drafts are just
//! separate instances.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::ProductSnapshot;
use crate::error::{DraftError, DraftResult, FieldIssue};
use crate::line::SaleLine;
use crate::linkage::{BatchLinkage, ToggleOutcome};
use crate::money::Money;
use crate::params::PaymentTerms;
use crate::payload::{SaleItemPayload, SalePayload};
use crate::recipient::Recipient;
use crate::types::{
    CustomerRef, GuarantorDetails, IdentificationDetails, NextOfKinDetails, SaleCategory,
};
use crate::validation::{
    guarantor_issues, identification_issues, next_of_kin_issues, validate_bvn,
};
use crate::MAX_PRODUCT_LINES;

// =============================================================================
// Installment Dossier
// =============================================================================

/// The nationally-required sale-level details for installment sales: BVN,
/// identification, next of kin, and guarantor.
///
/// Stored as raw form state (setters never reject); the group becomes
/// mandatory — and is validated — the moment any line pays in installments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentDossier {
    pub bvn: Option<String>,
    pub identification: Option<IdentificationDetails>,
    pub next_of_kin: Option<NextOfKinDetails>,
    pub guarantor: Option<GuarantorDetails>,
}

impl InstallmentDossier {
    /// True iff nothing has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.bvn.is_none()
            && self.identification.is_none()
            && self.next_of_kin.is_none()
            && self.guarantor.is_none()
    }

    pub fn clear(&mut self) {
        *self = InstallmentDossier::default();
    }

    /// Collects every issue across the four sections, with payload-rooted
    /// field paths. A missing section yields one issue for the section key.
    pub fn issues(&self, today: NaiveDate) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        match &self.bvn {
            None => issues.push(FieldIssue::new("bvn", "bvn is required")),
            Some(bvn) => {
                if let Err(e) = validate_bvn(bvn) {
                    issues.push(e.into());
                }
            }
        }

        match &self.identification {
            None => issues.push(FieldIssue::new(
                "identificationDetails",
                "Identification details are required for installment payments",
            )),
            Some(details) => {
                issues.extend(identification_issues(details, "identificationDetails", today));
            }
        }

        match &self.next_of_kin {
            None => issues.push(FieldIssue::new(
                "nextOfKinDetails",
                "Next of kin details are required for installment payments",
            )),
            Some(details) => {
                issues.extend(next_of_kin_issues(details, "nextOfKinDetails"));
            }
        }

        match &self.guarantor {
            None => issues.push(FieldIssue::new(
                "guarantorDetails",
                "Guarantor details are required for installment payments",
            )),
            Some(details) => {
                issues.extend(guarantor_issues(details, "guarantorDetails", today));
            }
        }

        issues
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// The in-memory draft of one multi-product sale.
///
/// ## Invariants
/// - Lines are ordered and unique by product id (at most
///   `MAX_PRODUCT_LINES`)
/// - A device id is linked to at most one (line, batch) pair draft-wide
/// - Every operation is a single synchronous transition: a failed call
///   leaves the draft exactly as it was
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    /// Session identity for log correlation; never part of the payload.
    id: String,
    category: SaleCategory,
    customer: Option<CustomerRef>,
    lines: Vec<SaleLine>,
    apply_margin: bool,
    dossier: InstallmentDossier,
    /// Monotone change counter: bumped on every successful mutation so the
    /// console can cheaply re-derive after each call.
    revision: u64,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl SaleDraft {
    /// Creates an empty draft for a new composition session.
    pub fn new() -> Self {
        SaleDraft {
            id: Uuid::new_v4().to_string(),
            category: SaleCategory::default(),
            customer: None,
            lines: Vec::new(),
            apply_margin: false,
            dossier: InstallmentDossier::default(),
            revision: 0,
            created_at: Utc::now(),
        }
    }

    #[inline]
    fn touch(&mut self) {
        self.revision += 1;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn category(&self) -> SaleCategory {
        self.category
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&SaleLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    #[inline]
    pub fn apply_margin(&self) -> bool {
        self.apply_margin
    }

    pub fn dossier(&self) -> &InstallmentDossier {
        &self.dossier
    }

    /// The change counter. Bumped on every successful mutation; callers
    /// re-derive completeness whenever it moves.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn line_entry_mut(&mut self, product_id: &str) -> DraftResult<&mut SaleLine> {
        self.lines
            .iter_mut()
            .find(|l| l.product_id() == product_id)
            .ok_or_else(|| DraftError::LineNotFound {
                product_id: product_id.to_string(),
            })
    }

    fn batch_entry_mut(
        &mut self,
        product_id: &str,
        batch_id: &str,
    ) -> DraftResult<&mut BatchLinkage> {
        let line = self.line_entry_mut(product_id)?;
        line.linkage_mut()
            .batch_mut(batch_id)
            .ok_or_else(|| DraftError::BatchNotFound {
                product_id: product_id.to_string(),
                batch_id: batch_id.to_string(),
            })
    }

    // =========================================================================
    // Customer
    // =========================================================================

    /// Selects (or replaces wholesale) the draft's customer.
    pub fn select_customer(&mut self, customer: CustomerRef) {
        debug!(draft = %self.id, customer = %customer.id, "customer selected");
        self.customer = Some(customer);
        self.touch();
    }

    pub fn remove_customer(&mut self) {
        self.customer = None;
        self.touch();
    }

    // =========================================================================
    // Product lines
    // =========================================================================

    /// Appends a product line with empty sub-state.
    ///
    /// Fails with `DuplicateLine` if the product is already in the draft.
    pub fn add_product(&mut self, snapshot: ProductSnapshot) -> DraftResult<()> {
        if self.lines.len() >= MAX_PRODUCT_LINES {
            return Err(DraftError::TooManyLines {
                max: MAX_PRODUCT_LINES,
            });
        }
        if self.line(&snapshot.product_id).is_some() {
            return Err(DraftError::DuplicateLine {
                product_id: snapshot.product_id.clone(),
            });
        }

        debug!(draft = %self.id, product_id = %snapshot.product_id, "product line added");
        self.lines.push(SaleLine::new(snapshot));
        self.touch();
        Ok(())
    }

    /// Removes a product line in full, cascading through its parameters,
    /// costs, linkage (all devices released), and recipient.
    pub fn remove_product(&mut self, product_id: &str) -> DraftResult<()> {
        let pos = self
            .lines
            .iter()
            .position(|l| l.product_id() == product_id)
            .ok_or_else(|| DraftError::LineNotFound {
                product_id: product_id.to_string(),
            })?;

        let line = self.lines.remove(pos);
        debug!(
            draft = %self.id,
            product_id = %product_id,
            released_devices = line.quantity(),
            "product line removed"
        );
        self.touch();
        Ok(())
    }

    /// Pushes a refreshed catalog snapshot into a line; linkage and
    /// parameters are re-derived against it (the catalog is authoritative).
    pub fn refresh_catalog(&mut self, product_id: &str, snapshot: ProductSnapshot) -> DraftResult<()> {
        let line = self.line_entry_mut(product_id)?;
        line.refresh(snapshot)?;
        debug!(draft = %self.id, product_id = %product_id, "catalog snapshot refreshed");
        self.touch();
        Ok(())
    }

    pub fn set_apply_margin(&mut self, apply_margin: bool) {
        self.apply_margin = apply_margin;
        self.touch();
    }

    // =========================================================================
    // Payment parameters
    // =========================================================================

    /// Validates and stores payment terms for a line.
    pub fn set_parameters(&mut self, product_id: &str, terms: PaymentTerms) -> DraftResult<()> {
        let line = self.line_entry_mut(product_id)?;
        line.set_parameters(terms)?;
        debug!(draft = %self.id, product_id = %product_id, "payment parameters set");
        self.touch();
        Ok(())
    }

    pub fn clear_parameters(&mut self, product_id: &str) -> DraftResult<()> {
        let line = self.line_entry_mut(product_id)?;
        line.clear_parameters();
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Miscellaneous costs
    // =========================================================================

    /// Inserts or overwrites a named cost on a line.
    pub fn set_cost(&mut self, product_id: &str, name: &str, amount: Money) -> DraftResult<()> {
        let line = self.line_entry_mut(product_id)?;
        line.set_cost(name, amount)?;
        self.touch();
        Ok(())
    }

    /// Removes a named cost from a line. Returns whether an entry existed.
    pub fn remove_cost(&mut self, product_id: &str, name: &str) -> DraftResult<bool> {
        let line = self.line_entry_mut(product_id)?;
        let removed = line.remove_cost(name);
        if removed {
            self.touch();
        }
        Ok(removed)
    }

    // =========================================================================
    // Device linkage
    // =========================================================================

    /// Where a device is currently linked, if anywhere: the owning
    /// (product id, batch id) pair, tentative or committed.
    pub fn device_owner(&self, device_id: &str) -> Option<(String, String)> {
        self.lines.iter().find_map(|line| {
            line.linkage()
                .batch_holding(device_id)
                .map(|batch_id| (line.product_id().to_string(), batch_id.to_string()))
        })
    }

    /// Opens a picker edit session for a batch, seeding the tentative
    /// selection from the committed set.
    pub fn begin_tentative_selection(
        &mut self,
        product_id: &str,
        batch_id: &str,
    ) -> DraftResult<()> {
        let batch = self.batch_entry_mut(product_id, batch_id)?;
        batch.begin_session();
        self.touch();
        Ok(())
    }

    /// Abandons a picker edit session, dropping the tentative selection.
    pub fn cancel_tentative_selection(
        &mut self,
        product_id: &str,
        batch_id: &str,
    ) -> DraftResult<()> {
        let batch = self.batch_entry_mut(product_id, batch_id)?;
        batch.cancel_session();
        self.touch();
        Ok(())
    }

    /// Toggles a device in a batch's tentative selection.
    ///
    /// ## Behavior
    /// - Rejected with `DoubleBooked` when the device is linked (tentative
    ///   or committed) to any other batch of any line
    /// - `Saturated` when the batch is at capacity and the device is not
    ///   already selected; the selection is unchanged and revision does not
    ///   move
    pub fn toggle_tentative_device(
        &mut self,
        product_id: &str,
        batch_id: &str,
        device_id: &str,
    ) -> DraftResult<ToggleOutcome> {
        if let Some((owner_product, owner_batch)) = self.device_owner(device_id) {
            if owner_product != product_id || owner_batch != batch_id {
                return Err(DraftError::DoubleBooked {
                    device_id: device_id.to_string(),
                });
            }
        }

        let draft_id = self.id.clone();
        let batch = self.batch_entry_mut(product_id, batch_id)?;
        let outcome = batch.toggle(device_id);

        if outcome != ToggleOutcome::Saturated {
            debug!(
                draft = %draft_id,
                product_id = %product_id,
                batch_id = %batch_id,
                device_id = %device_id,
                ?outcome,
                "tentative device toggled"
            );
            self.touch();
        }
        Ok(outcome)
    }

    /// Promotes a batch's tentative selection to committed.
    ///
    /// Fails with `IncompleteLinkage` unless the selection size equals the
    /// batch's required quantity exactly.
    pub fn commit_batch(&mut self, product_id: &str, batch_id: &str) -> DraftResult<()> {
        let draft_id = self.id.clone();
        let batch = self.batch_entry_mut(product_id, batch_id)?;
        batch.commit()?;
        let committed = batch.committed_count();

        debug!(
            draft = %draft_id,
            product_id = %product_id,
            batch_id = %batch_id,
            committed,
            "batch committed"
        );
        self.touch();
        Ok(())
    }

    /// Unlinks one device from a batch (tentative and committed sets).
    /// Idempotent; returns whether anything was removed.
    pub fn remove_device(
        &mut self,
        product_id: &str,
        batch_id: &str,
        device_id: &str,
    ) -> DraftResult<bool> {
        let batch = self.batch_entry_mut(product_id, batch_id)?;
        let removed = batch.remove_device(device_id);
        if removed {
            self.touch();
        }
        Ok(removed)
    }

    /// Unlinks every device from a batch and ends any open session.
    pub fn remove_all_for_batch(&mut self, product_id: &str, batch_id: &str) -> DraftResult<()> {
        let batch = self.batch_entry_mut(product_id, batch_id)?;
        batch.clear();
        self.touch();
        Ok(())
    }

    /// True iff every batch of the line is fully linked.
    pub fn is_product_line_device_complete(&self, product_id: &str) -> bool {
        self.line(product_id)
            .is_some_and(|l| l.linkage().is_complete())
    }

    // =========================================================================
    // Recipient
    // =========================================================================

    /// Stores recipient form state for a line (checked at readiness, not
    /// on write).
    pub fn set_recipient(&mut self, product_id: &str, recipient: Recipient) -> DraftResult<()> {
        let line = self.line_entry_mut(product_id)?;
        line.set_recipient(recipient);
        self.touch();
        Ok(())
    }

    /// One-shot copy of the selected customer into a line's recipient.
    pub fn autofill_recipient(&mut self, product_id: &str) -> DraftResult<()> {
        let customer = self.customer.clone().ok_or(DraftError::NoCustomer)?;
        let line = self.line_entry_mut(product_id)?;
        line.autofill_recipient(&customer);
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Installment dossier
    // =========================================================================

    pub fn set_bvn(&mut self, bvn: impl Into<String>) {
        self.dossier.bvn = Some(bvn.into());
        self.touch();
    }

    pub fn set_identification(&mut self, details: IdentificationDetails) {
        self.dossier.identification = Some(details);
        self.touch();
    }

    pub fn set_next_of_kin(&mut self, details: NextOfKinDetails) {
        self.dossier.next_of_kin = Some(details);
        self.touch();
    }

    pub fn set_guarantor(&mut self, details: GuarantorDetails) {
        self.dossier.guarantor = Some(details);
        self.touch();
    }

    pub fn clear_installment_dossier(&mut self) {
        self.dossier.clear();
        self.touch();
    }

    // =========================================================================
    // Readiness & submission
    // =========================================================================

    /// True iff at least one line pays in installments — the trigger for
    /// the sale-level dossier requirement.
    pub fn has_any_installment_line(&self) -> bool {
        self.lines.iter().any(SaleLine::is_installment)
    }

    /// True iff a given line is individually ready: valid parameters, all
    /// batches fully linked, recipient complete.
    pub fn is_line_ready_for_submission(&self, product_id: &str) -> bool {
        self.line(product_id)
            .is_some_and(SaleLine::is_ready_for_submission)
    }

    /// Collects every issue currently blocking submission, across customer,
    /// lines, and (when required) the installment dossier.
    pub fn submission_issues(&self) -> Vec<FieldIssue> {
        self.submission_issues_at(Utc::now().date_naive())
    }

    fn submission_issues_at(&self, today: NaiveDate) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if self.customer.is_none() {
            issues.push(FieldIssue::new("customerId", "A customer must be selected"));
        }
        if self.lines.is_empty() {
            issues.push(FieldIssue::new(
                "saleItems",
                "At least one product is required",
            ));
        }
        for (index, line) in self.lines.iter().enumerate() {
            issues.extend(line.readiness_issues(&format!("saleItems[{}]", index)));
        }
        if self.has_any_installment_line() {
            issues.extend(self.dossier.issues(today));
        }

        issues
    }

    /// True iff `build_payload` would succeed right now.
    pub fn is_draft_ready_for_submission(&self) -> bool {
        self.submission_issues().is_empty()
    }

    /// Assembles the submission payload. Pure: never mutates draft state,
    /// so a rejected submission can be corrected and rebuilt.
    ///
    /// Fails with `NotReady` carrying the aggregated field issues.
    pub fn build_payload(&self) -> DraftResult<SalePayload> {
        let issues = self.submission_issues();
        if !issues.is_empty() {
            return Err(DraftError::NotReady { issues });
        }
        let customer = self.customer.as_ref().ok_or(DraftError::NoCustomer)?;

        let sale_items = self
            .lines
            .iter()
            .map(SaleLine::to_sale_item)
            .collect::<DraftResult<Vec<SaleItemPayload>>>()?;

        let installment = self.has_any_installment_line();
        let payload = SalePayload {
            category: self.category,
            customer_id: customer.id.clone(),
            apply_margin: self.apply_margin,
            sale_items,
            bvn: installment.then(|| self.dossier.bvn.clone()).flatten(),
            identification_details: installment
                .then(|| self.dossier.identification.clone())
                .flatten(),
            next_of_kin_details: installment
                .then(|| self.dossier.next_of_kin.clone())
                .flatten(),
            guarantor_details: installment.then(|| self.dossier.guarantor.clone()).flatten(),
        };

        info!(
            draft = %self.id,
            items = payload.sale_items.len(),
            installment,
            "sale payload assembled"
        );
        Ok(payload)
    }

    /// Clears the draft back to empty — used on cancel and after the
    /// submission service acknowledges the payload. All tentative and
    /// committed state is dropped; nothing was externally committed until
    /// the payload was accepted, so there is nothing to compensate.
    pub fn discard(&mut self) {
        debug!(draft = %self.id, "draft discarded");
        self.customer = None;
        self.lines.clear();
        self.apply_margin = false;
        self.dossier.clear();
        self.created_at = Utc::now();
        self.touch();
    }
}

impl Default for SaleDraft {
    fn default() -> Self {
        SaleDraft::new()
    }
}

// =============================================================================
// Draft Summary
// =============================================================================

/// Read-model for the console header: cheap to derive after any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub line_count: usize,
    /// Total committed devices across all lines.
    pub device_count: u32,
    pub has_customer: bool,
    pub requires_installment_dossier: bool,
    pub ready_for_submission: bool,
    pub revision: u64,
}

impl From<&SaleDraft> for DraftSummary {
    fn from(draft: &SaleDraft) -> Self {
        DraftSummary {
            line_count: draft.lines().len(),
            device_count: draft.lines().iter().map(SaleLine::quantity).sum(),
            has_customer: draft.customer().is_some(),
            requires_installment_dossier: draft.has_any_installment_line(),
            ready_for_submission: draft.is_draft_ready_for_submission(),
            revision: draft.revision(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
