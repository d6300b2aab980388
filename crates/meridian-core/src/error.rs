//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── ValidationError  - Single-field input failures                    │
//! │  ├── FieldIssue       - Serializable field-path + message record       │
//! │  └── DraftError       - Draft/linkage state failures                   │
//! │                                                                         │
//! │  Flow: ValidationError ──► DraftError ──► console (inline render)      │
//! │        submission check ──► DraftError::NotReady { Vec<FieldIssue> }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, batch id, counts)
//! 3. Errors are enum variants, never bare strings
//! 4. Nothing here is fatal: every failure leaves the draft in its
//!    last valid state

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::PaymentMode;

// =============================================================================
// Validation Error
// =============================================================================

/// Single-field input validation errors.
///
/// Each variant maps to exactly one offending field; the console renders the
/// message inline next to that control. `field_path()` yields the camelCase
/// path the frontend uses to locate it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Monetary value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email, non-numeric BVN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date lies in the future where only past/current dates are allowed.
    #[error("{field} must not be in the future")]
    FutureDate { field: String },

    /// Date must be strictly after another date field.
    #[error("{field} must be after {after}")]
    DateOrder { field: String, after: String },

    /// Installment mode selected without a usable duration.
    #[error("Installment duration is required for installment payments")]
    InstallmentDurationRequired,

    /// Installment mode selected without a usable starting price.
    #[error("Installment starting price is required for installment payments")]
    InstallmentStartingPriceRequired,
}

impl ValidationError {
    /// Returns the camelCase field path the error is attached to.
    pub fn field_path(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::FutureDate { field }
            | ValidationError::DateOrder { field, .. } => field,
            ValidationError::InstallmentDurationRequired => "installmentDuration",
            ValidationError::InstallmentStartingPriceRequired => "installmentStartingPrice",
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Issue
// =============================================================================

/// A serializable field-level issue: camelCase field path plus message.
///
/// Submission checks aggregate these (one per offending control) so the
/// console can render an error block and highlight each field. Paths are
/// rooted at the payload shape, e.g. `saleItems[2].installmentDuration` or
/// `guarantorDetails.identification.expirationDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    /// camelCase path of the offending field.
    pub field: String,
    /// Human-readable message for inline rendering.
    pub message: String,
}

impl FieldIssue {
    /// Creates an issue from a path and message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldIssue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an issue from a validation error, prefixing its field path.
    ///
    /// An empty prefix keeps the error's own path.
    pub fn at(prefix: &str, error: ValidationError) -> Self {
        let field = if prefix.is_empty() {
            error.field_path().to_string()
        } else {
            format!("{}.{}", prefix, error.field_path())
        };
        FieldIssue {
            field,
            message: error.to_string(),
        }
    }
}

impl From<ValidationError> for FieldIssue {
    fn from(error: ValidationError) -> Self {
        FieldIssue::at("", error)
    }
}

// =============================================================================
// Draft Error
// =============================================================================

/// Draft composition errors.
///
/// These represent rejected state transitions. The draft is untouched when
/// one is returned; the console recovers by correcting the input or simply
/// ignoring the attempt (e.g. a duplicate add).
#[derive(Debug, Error)]
pub enum DraftError {
    /// Product is already present in the draft (lines are unique by
    /// product id).
    #[error("Product {product_id} is already part of the draft")]
    DuplicateLine { product_id: String },

    /// Operation referenced a product that is not in the draft.
    #[error("Product {product_id} is not part of the draft")]
    LineNotFound { product_id: String },

    /// Operation referenced an inventory batch the catalog does not require
    /// for that product.
    #[error("Batch {batch_id} is not required for product {product_id}")]
    BatchNotFound {
        product_id: String,
        batch_id: String,
    },

    /// Commit attempted before the tentative selection matched the batch's
    /// required quantity exactly.
    #[error("Batch {batch_id} requires {required} devices, {selected} selected")]
    IncompleteLinkage {
        batch_id: String,
        required: u32,
        selected: u32,
    },

    /// Device is already linked (tentative or committed) to another batch.
    #[error("Device {device_id} is already linked to another batch")]
    DoubleBooked { device_id: String },

    /// Payment mode is not offered for this product.
    #[error("Payment mode {mode:?} is not available for product {product_id}")]
    PaymentModeUnavailable {
        product_id: String,
        mode: PaymentMode,
    },

    /// Draft has reached its maximum line count.
    #[error("Draft cannot have more than {max} product lines")]
    TooManyLines { max: usize },

    /// Operation needs a selected customer.
    #[error("No customer is selected on the draft")]
    NoCustomer,

    /// Submission payload requested while the draft is incomplete.
    /// Carries one issue per offending field.
    #[error("Draft is not ready for submission")]
    NotReady { issues: Vec<FieldIssue> },

    /// Field validation failed (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DraftError.
pub type DraftResult<T> = Result<T, DraftError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "bvn".to_string(),
        };
        assert_eq!(err.to_string(), "bvn is required");

        let err = ValidationError::InstallmentDurationRequired;
        assert_eq!(
            err.to_string(),
            "Installment duration is required for installment payments"
        );
    }

    #[test]
    fn test_field_path() {
        let err = ValidationError::FutureDate {
            field: "issueDate".to_string(),
        };
        assert_eq!(err.field_path(), "issueDate");

        assert_eq!(
            ValidationError::InstallmentStartingPriceRequired.field_path(),
            "installmentStartingPrice"
        );
    }

    #[test]
    fn test_field_issue_prefixing() {
        let err = ValidationError::DateOrder {
            field: "expirationDate".to_string(),
            after: "issueDate".to_string(),
        };
        let issue = FieldIssue::at("guarantorDetails.identification", err);
        assert_eq!(issue.field, "guarantorDetails.identification.expirationDate");
        assert_eq!(issue.message, "expirationDate must be after issueDate");
    }

    #[test]
    fn test_field_issue_without_prefix() {
        let issue: FieldIssue = ValidationError::Required {
            field: "bvn".to_string(),
        }
        .into();
        assert_eq!(issue.field, "bvn");
    }

    #[test]
    fn test_draft_error_messages() {
        let err = DraftError::IncompleteLinkage {
            batch_id: "batch-1".to_string(),
            required: 2,
            selected: 1,
        };
        assert_eq!(
            err.to_string(),
            "Batch batch-1 requires 2 devices, 1 selected"
        );

        let err = DraftError::DoubleBooked {
            device_id: "dev-9".to_string(),
        };
        assert_eq!(err.to_string(), "Device dev-9 is already linked to another batch");
    }

    #[test]
    fn test_validation_converts_to_draft_error() {
        let validation_err = ValidationError::Required {
            field: "firstname".to_string(),
        };
        let draft_err: DraftError = validation_err.into();
        assert!(matches!(draft_err, DraftError::Validation(_)));
    }
}
