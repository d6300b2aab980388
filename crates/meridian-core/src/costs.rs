//! # Cost Ledger
//!
//! Named miscellaneous cost entries per product line (delivery, setup,
//! accessories). The ledger is optional: it never blocks a line from
//! submission, and an empty ledger is simply omitted from the payload.
//!
//! ## Invariants
//! - Entry names are unique per line (inserting an existing name overwrites)
//! - Every stored entry has a non-empty name and a non-negative amount;
//!   invalid input is rejected at the mutation boundary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationResult;
use crate::money::Money;
use crate::validation::{validate_amount, validate_name};

// =============================================================================
// Cost Ledger
// =============================================================================

/// The miscellaneous cost entries of one product line, keyed by cost name.
///
/// A `BTreeMap` keeps iteration and serialization order stable, so the
/// emitted `miscellaneousPrices` object is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostLedger {
    entries: BTreeMap<String, Money>,
}

impl CostLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a cost entry.
    ///
    /// ## Rules
    /// - Name must be non-empty (and within the crate name-length cap)
    /// - Amount must be ≥ 0
    ///
    /// A rejected entry leaves the ledger untouched; the error attaches to
    /// the offending row in the console, nothing more.
    pub fn set_cost(&mut self, name: &str, amount: Money) -> ValidationResult<()> {
        validate_name("costName", name)?;
        validate_amount("costAmount", amount)?;

        self.entries.insert(name.trim().to_string(), amount);
        Ok(())
    }

    /// Removes a cost entry by name. Returns whether an entry was removed.
    pub fn remove_cost(&mut self, name: &str) -> bool {
        self.entries.remove(name.trim()).is_some()
    }

    /// True iff the ledger is empty or every entry is well-formed.
    ///
    /// Entries are validated on insert, so this re-derivation only exists
    /// for callers that want to re-check after deserializing external state.
    pub fn is_complete(&self) -> bool {
        self.entries
            .iter()
            .all(|(name, amount)| !name.trim().is_empty() && !amount.is_negative())
    }

    /// The entries as a name → amount map.
    pub fn entries(&self) -> &BTreeMap<String, Money> {
        &self.entries
    }

    /// Sum of all entries.
    pub fn total(&self) -> Money {
        self.entries.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_overwrite_cost() {
        let mut ledger = CostLedger::new();

        ledger.set_cost("Delivery", Money::from_minor(2000)).unwrap();
        ledger.set_cost("Setup", Money::from_minor(5000)).unwrap();
        assert_eq!(ledger.len(), 2);

        // Same name overwrites
        ledger.set_cost("Delivery", Money::from_minor(2500)).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.entries().get("Delivery"),
            Some(&Money::from_minor(2500))
        );
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let mut ledger = CostLedger::new();

        assert!(ledger.set_cost("", Money::from_minor(100)).is_err());
        assert!(ledger.set_cost("   ", Money::from_minor(100)).is_err());
        assert!(ledger.set_cost("Delivery", Money::from_minor(-1)).is_err());

        // Rejected mutations leave the ledger untouched
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_cost() {
        let mut ledger = CostLedger::new();
        ledger.set_cost("Delivery", Money::from_minor(2000)).unwrap();

        assert!(ledger.remove_cost("Delivery"));
        assert!(!ledger.remove_cost("Delivery"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_total_and_completeness() {
        let mut ledger = CostLedger::new();
        assert!(ledger.is_complete()); // empty ledger is complete

        ledger.set_cost("Delivery", Money::from_minor(2000)).unwrap();
        ledger.set_cost("Setup", Money::from_minor(500)).unwrap();
        assert_eq!(ledger.total(), Money::from_minor(2500));
        assert!(ledger.is_complete());
    }

    #[test]
    fn test_trimmed_names_share_a_key() {
        let mut ledger = CostLedger::new();
        ledger.set_cost(" Delivery ", Money::from_minor(2000)).unwrap();
        assert!(ledger.entries().contains_key("Delivery"));
        assert!(ledger.remove_cost("Delivery"));
    }
}
