//! # Catalog Provider
//!
//! The engine's read-only view of products and their inventory requirements.
//!
//! The catalog is authoritative: a [`ProductSnapshot`] is frozen into each
//! product line when it is added (so the draft displays consistent data even
//! if the backing catalog changes), and the draft re-derives linkage
//! completeness whenever a fresh snapshot is pushed in via
//! `SaleDraft::refresh_catalog`.
//!
//! Fetching catalog data is I/O and therefore lives outside this crate; the
//! [`CatalogProvider`] trait is the seam the console shell implements.
//! [`InMemoryCatalog`] is the test/demo implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::PaymentMode;

// =============================================================================
// Inventory Batch Spec
// =============================================================================

/// One inventory batch a product draws stock from, and how many devices
/// must be linked from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryBatchSpec {
    pub id: String,
    pub name: String,
    pub required_quantity: u32,
}

// =============================================================================
// Product Snapshot
// =============================================================================

/// Catalog data for one product, frozen at the time a line is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: String,
    pub name: String,
    /// Display tag shown on the line, e.g. "SHS-200W".
    pub tag: String,
    /// Unit price in minor units.
    pub price: Money,
    /// Payment modes the product may be sold under. A mode absent here is
    /// not selectable for the line.
    pub available_payment_modes: Vec<PaymentMode>,
    /// Batches devices must be linked from, in display order.
    pub inventory_batches: Vec<InventoryBatchSpec>,
}

impl ProductSnapshot {
    /// Checks whether the product may be sold under the given mode.
    pub fn supports_mode(&self, mode: PaymentMode) -> bool {
        self.available_payment_modes.contains(&mode)
    }

    /// Looks up a batch spec by id.
    pub fn batch(&self, batch_id: &str) -> Option<&InventoryBatchSpec> {
        self.inventory_batches.iter().find(|b| b.id == batch_id)
    }

    /// Total devices required across all batches.
    pub fn required_device_total(&self) -> u32 {
        self.inventory_batches
            .iter()
            .map(|b| b.required_quantity)
            .sum()
    }
}

// =============================================================================
// Catalog Provider Trait
// =============================================================================

/// Read-only, pull-based source of product snapshots.
///
/// Implemented over the REST backend by the console shell; the engine only
/// ever asks for one product at a time and treats the answer as
/// authoritative.
pub trait CatalogProvider {
    /// Returns the current snapshot for a product, if it exists.
    fn product(&self, product_id: &str) -> Option<ProductSnapshot>;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// A `CatalogProvider` backed by a plain map. Keeps the engine 100%
/// testable without mocks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<String, ProductSnapshot>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-loaded with the given products.
    pub fn with_products(products: impl IntoIterator<Item = ProductSnapshot>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Inserts or replaces a product snapshot.
    pub fn insert(&mut self, product: ProductSnapshot) {
        self.products.insert(product.product_id.clone(), product);
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn product(&self, product_id: &str) -> Option<ProductSnapshot> {
        self.products.get(product_id).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProductSnapshot {
        ProductSnapshot {
            product_id: "prod-1".to_string(),
            name: "Solar Home System".to_string(),
            tag: "SHS-200W".to_string(),
            price: Money::from_minor(150_000_00),
            available_payment_modes: vec![PaymentMode::OneOff, PaymentMode::Installment],
            inventory_batches: vec![
                InventoryBatchSpec {
                    id: "batch-a".to_string(),
                    name: "Lagos warehouse".to_string(),
                    required_quantity: 2,
                },
                InventoryBatchSpec {
                    id: "batch-b".to_string(),
                    name: "Abuja warehouse".to_string(),
                    required_quantity: 1,
                },
            ],
        }
    }

    #[test]
    fn test_supports_mode() {
        let product = snapshot();
        assert!(product.supports_mode(PaymentMode::Installment));

        let one_off_only = ProductSnapshot {
            available_payment_modes: vec![PaymentMode::OneOff],
            ..product
        };
        assert!(!one_off_only.supports_mode(PaymentMode::Installment));
    }

    #[test]
    fn test_batch_lookup_and_total() {
        let product = snapshot();
        assert_eq!(product.batch("batch-b").unwrap().required_quantity, 1);
        assert!(product.batch("batch-z").is_none());
        assert_eq!(product.required_device_total(), 3);
    }

    #[test]
    fn test_in_memory_catalog() {
        let catalog = InMemoryCatalog::with_products([snapshot()]);
        assert!(catalog.product("prod-1").is_some());
        assert!(catalog.product("prod-2").is_none());
    }
}
