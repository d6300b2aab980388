//! # Device Linkage Tracker
//!
//! Maps one product line to its required inventory batches and tracks
//! device-to-batch assignment through a tentative-then-committed flow.
//!
//! ## Per-Batch State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            committed count vs required quantity                         │
//! │                                                                         │
//! │            commit / remove                commit                        │
//! │   ┌──────────┐ ──────────► ┌────────────────┐ ──────► ┌─────────────┐  │
//! │   │ Unlinked │             │ PartiallyLinked│         │ FullyLinked │  │
//! │   └──────────┘ ◄────────── └────────────────┘ ◄────── └─────────────┘  │
//! │                  remove                       remove                    │
//! │                                                                         │
//! │   No terminal state: device removal walks a batch back at any time.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tentative vs Committed
//! - `begin_session` seeds the tentative set from the committed set
//!   (edit-in-place semantics for the picker modal)
//! - `toggle` adds/removes within the tentative set, refusing to grow past
//!   the required quantity (saturation is a reported no-op, not an error)
//! - `commit` promotes the tentative set only when its size matches the
//!   required quantity exactly, then ends the session
//! - `cancel_session` drops the tentative set without touching committed
//!
//! The cross-line "a device belongs to at most one batch" invariant is
//! enforced one level up, in `SaleDraft`, which can see every line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{InventoryBatchSpec, ProductSnapshot};
use crate::error::{DraftError, DraftResult};

// =============================================================================
// Link State
// =============================================================================

/// Fulfillment state of one batch, derived from its committed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// No devices committed.
    Unlinked,
    /// Some, but fewer than required.
    PartiallyLinked,
    /// Committed count equals the required quantity.
    FullyLinked,
}

// =============================================================================
// Toggle Outcome
// =============================================================================

/// Result of toggling a device in a tentative selection.
///
/// `Saturated` means the batch was already at its required quantity and the
/// device was not part of the selection; the console renders the remaining
/// rows as disabled rather than showing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    Saturated,
}

// =============================================================================
// Batch Linkage
// =============================================================================

/// Tentative and committed device assignment for one inventory batch.
///
/// Device ids are kept in insertion order so payload output and any
/// truncation on catalog refresh stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchLinkage {
    batch_id: String,
    name: String,
    required_quantity: u32,
    committed: Vec<String>,
    /// Present only while a picker edit session is open.
    tentative: Option<Vec<String>>,
}

impl BatchLinkage {
    /// Creates an empty linkage for a catalog batch spec.
    pub fn from_spec(spec: &InventoryBatchSpec) -> Self {
        BatchLinkage {
            batch_id: spec.id.clone(),
            name: spec.name.clone(),
            required_quantity: spec.required_quantity,
            committed: Vec::new(),
            tentative: None,
        }
    }

    #[inline]
    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn required_quantity(&self) -> u32 {
        self.required_quantity
    }

    /// Committed device ids, in the order they were linked.
    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    #[inline]
    pub fn committed_count(&self) -> u32 {
        self.committed.len() as u32
    }

    /// Derives the fulfillment state from the committed count.
    pub fn state(&self) -> LinkState {
        let committed = self.committed_count();
        if committed == self.required_quantity {
            LinkState::FullyLinked
        } else if committed == 0 {
            LinkState::Unlinked
        } else {
            LinkState::PartiallyLinked
        }
    }

    /// Whether a picker edit session is open for this batch.
    #[inline]
    pub fn has_session(&self) -> bool {
        self.tentative.is_some()
    }

    /// The tentative selection, if a session is open.
    pub fn tentative(&self) -> Option<&[String]> {
        self.tentative.as_deref()
    }

    /// Opens an edit session, seeding the tentative set from the committed
    /// set. Re-opening an already open session re-seeds it.
    pub fn begin_session(&mut self) {
        self.tentative = Some(self.committed.clone());
    }

    /// Drops the tentative set without touching the committed set.
    pub fn cancel_session(&mut self) {
        self.tentative = None;
    }

    /// Toggles a device in the tentative selection.
    ///
    /// ## Behavior
    /// - Present → removed
    /// - Absent and below required quantity → added
    /// - Absent and at required quantity → `Saturated`, selection unchanged
    ///
    /// Toggling with no open session implicitly begins one, so a stray
    /// toggle can never corrupt the committed set.
    pub fn toggle(&mut self, device_id: &str) -> ToggleOutcome {
        let required = self.required_quantity as usize;
        let tentative = self
            .tentative
            .get_or_insert_with(|| self.committed.clone());

        if let Some(pos) = tentative.iter().position(|d| d == device_id) {
            tentative.remove(pos);
            ToggleOutcome::Removed
        } else if tentative.len() < required {
            tentative.push(device_id.to_string());
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Saturated
        }
    }

    /// Promotes the tentative selection to committed.
    ///
    /// Fails unless the selection size matches the required quantity
    /// exactly. With no open session the committed set itself is the
    /// selection, so committing an already-full batch is an idempotent
    /// success. Ends the session on success.
    pub fn commit(&mut self) -> DraftResult<()> {
        let selected = self
            .tentative
            .clone()
            .unwrap_or_else(|| self.committed.clone());

        if selected.len() as u32 != self.required_quantity {
            return Err(DraftError::IncompleteLinkage {
                batch_id: self.batch_id.clone(),
                required: self.required_quantity,
                selected: selected.len() as u32,
            });
        }

        self.committed = selected;
        self.tentative = None;
        Ok(())
    }

    /// Removes a device from both the tentative and committed sets.
    /// Idempotent; returns whether anything was removed.
    pub fn remove_device(&mut self, device_id: &str) -> bool {
        let before = self.committed.len();
        self.committed.retain(|d| d != device_id);
        let mut removed = self.committed.len() != before;

        if let Some(tentative) = self.tentative.as_mut() {
            let before = tentative.len();
            tentative.retain(|d| d != device_id);
            removed |= tentative.len() != before;
        }

        removed
    }

    /// Unlinks every device from the batch (both sets) and ends any session.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.tentative = None;
    }

    /// True iff the device is in the tentative or committed set.
    pub fn contains(&self, device_id: &str) -> bool {
        self.committed.iter().any(|d| d == device_id)
            || self
                .tentative
                .as_ref()
                .is_some_and(|t| t.iter().any(|d| d == device_id))
    }

    /// Adopts a refreshed catalog spec for the same batch id.
    ///
    /// A shrunken required quantity truncates both sets in insertion order
    /// (the excess devices are released).
    fn adopt_spec(&mut self, spec: &InventoryBatchSpec) {
        self.name = spec.name.clone();
        self.required_quantity = spec.required_quantity;
        self.committed.truncate(spec.required_quantity as usize);
        if let Some(tentative) = self.tentative.as_mut() {
            tentative.truncate(spec.required_quantity as usize);
        }
    }
}

// =============================================================================
// Device Linkage (per product line)
// =============================================================================

/// All batch linkages of one product line, in catalog display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLinkage {
    batches: Vec<BatchLinkage>,
}

impl DeviceLinkage {
    /// Creates empty linkages for every batch the snapshot requires.
    pub fn from_snapshot(snapshot: &ProductSnapshot) -> Self {
        DeviceLinkage {
            batches: snapshot
                .inventory_batches
                .iter()
                .map(BatchLinkage::from_spec)
                .collect(),
        }
    }

    pub fn batches(&self) -> &[BatchLinkage] {
        &self.batches
    }

    pub fn batch(&self, batch_id: &str) -> Option<&BatchLinkage> {
        self.batches.iter().find(|b| b.batch_id == batch_id)
    }

    pub fn batch_mut(&mut self, batch_id: &str) -> Option<&mut BatchLinkage> {
        self.batches.iter_mut().find(|b| b.batch_id == batch_id)
    }

    /// True iff every batch is fully linked.
    pub fn is_complete(&self) -> bool {
        self.batches
            .iter()
            .all(|b| b.state() == LinkState::FullyLinked)
    }

    /// Batches that still need devices, for readiness reporting.
    pub fn incomplete_batches(&self) -> impl Iterator<Item = &BatchLinkage> {
        self.batches
            .iter()
            .filter(|b| b.state() != LinkState::FullyLinked)
    }

    /// Flattened committed device ids across all batches, in batch order.
    pub fn committed_devices(&self) -> Vec<String> {
        self.batches
            .iter()
            .flat_map(|b| b.committed.iter().cloned())
            .collect()
    }

    /// Total committed devices — the line's sale quantity.
    pub fn total_committed(&self) -> u32 {
        self.batches.iter().map(BatchLinkage::committed_count).sum()
    }

    /// True iff the device appears in any batch, tentative or committed.
    pub fn contains(&self, device_id: &str) -> bool {
        self.batches.iter().any(|b| b.contains(device_id))
    }

    /// The batch id holding the device, if any.
    pub fn batch_holding(&self, device_id: &str) -> Option<&str> {
        self.batches
            .iter()
            .find(|b| b.contains(device_id))
            .map(|b| b.batch_id.as_str())
    }

    /// Reconciles the linkage against a refreshed catalog snapshot.
    ///
    /// ## Behavior
    /// - Batches absent from the new snapshot are dropped (devices released)
    /// - Surviving batches adopt the new name/quantity, truncating any
    ///   excess devices in insertion order
    /// - New batches start unlinked
    /// - Result follows the snapshot's batch order
    pub fn reconcile(&mut self, snapshot: &ProductSnapshot) {
        let mut next = Vec::with_capacity(snapshot.inventory_batches.len());
        for spec in &snapshot.inventory_batches {
            match self.batches.iter().position(|b| b.batch_id == spec.id) {
                Some(pos) => {
                    let mut existing = self.batches.remove(pos);
                    existing.adopt_spec(spec);
                    next.push(existing);
                }
                None => next.push(BatchLinkage::from_spec(spec)),
            }
        }
        self.batches = next;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
