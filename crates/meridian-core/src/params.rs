//! # Payment Parameter Set
//!
//! Payment-mode-specific terms for one product line.
//!
//! ## Mode Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE_OFF                          INSTALLMENT                           │
//! │  ─────────────────────────        ─────────────────────────────────     │
//! │  discount?  (≥ 0)                 discount?  (≥ 0)                      │
//! │  duration   cleared/absent        duration   required, ≥ 1 month       │
//! │  start %    cleared/absent        start %    required, 0 < p ≤ 100     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ParameterSet` can only be constructed through [`ParameterSet::from_terms`],
//! so a stored set is valid for its mode by construction — under ONE_OFF the
//! installment fields are cleared, never merely ignored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{PaymentMode, Percent};
use crate::validation::validate_amount;

// =============================================================================
// Payment Terms (raw input)
// =============================================================================

/// Raw payment terms as captured by the console form, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerms {
    pub payment_mode: PaymentMode,
    /// Months; meaningful only under INSTALLMENT.
    pub installment_duration: Option<u32>,
    /// Upfront share; meaningful only under INSTALLMENT.
    pub installment_starting_price: Option<Percent>,
    pub discount: Option<Money>,
}

impl PaymentTerms {
    /// One-off terms with an optional discount.
    pub fn one_off(discount: Option<Money>) -> Self {
        PaymentTerms {
            payment_mode: PaymentMode::OneOff,
            installment_duration: None,
            installment_starting_price: None,
            discount,
        }
    }

    /// Installment terms.
    pub fn installment(duration: u32, starting_price: Percent, discount: Option<Money>) -> Self {
        PaymentTerms {
            payment_mode: PaymentMode::Installment,
            installment_duration: Some(duration),
            installment_starting_price: Some(starting_price),
            discount,
        }
    }
}

// =============================================================================
// Parameter Set (validated)
// =============================================================================

/// Validated payment terms for one product line.
///
/// ## Invariants
/// - `installment_duration`/`installment_starting_price` are `Some` iff
///   `payment_mode == INSTALLMENT` (cleared under ONE_OFF)
/// - `installment_duration` ≥ 1; 0 < `installment_starting_price` ≤ 100
/// - `discount`, when present, is ≥ 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    payment_mode: PaymentMode,
    installment_duration: Option<u32>,
    installment_starting_price: Option<Percent>,
    discount: Option<Money>,
}

impl ParameterSet {
    /// Validates raw terms into a parameter set.
    ///
    /// ## Behavior
    /// - ONE_OFF: installment fields are dropped, discount is kept
    /// - INSTALLMENT: duration must be ≥ 1 and starting price in (0, 100];
    ///   a zero or missing duration is reported as "required" because the
    ///   console renders both identically on the duration control
    pub fn from_terms(terms: PaymentTerms) -> ValidationResult<Self> {
        if let Some(discount) = terms.discount {
            validate_amount("discount", discount)?;
        }

        match terms.payment_mode {
            PaymentMode::OneOff => Ok(ParameterSet {
                payment_mode: PaymentMode::OneOff,
                installment_duration: None,
                installment_starting_price: None,
                discount: terms.discount,
            }),
            PaymentMode::Installment => {
                let duration = match terms.installment_duration {
                    Some(d) if d >= 1 => d,
                    _ => return Err(ValidationError::InstallmentDurationRequired),
                };

                let starting_price = match terms.installment_starting_price {
                    Some(p) if !p.is_zero() => p,
                    _ => return Err(ValidationError::InstallmentStartingPriceRequired),
                };
                if starting_price.bps() > 10_000 {
                    return Err(ValidationError::OutOfRange {
                        field: "installmentStartingPrice".to_string(),
                        min: 0,
                        max: 100,
                    });
                }

                Ok(ParameterSet {
                    payment_mode: PaymentMode::Installment,
                    installment_duration: Some(duration),
                    installment_starting_price: Some(starting_price),
                    discount: terms.discount,
                })
            }
        }
    }

    #[inline]
    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    #[inline]
    pub fn installment_duration(&self) -> Option<u32> {
        self.installment_duration
    }

    #[inline]
    pub fn installment_starting_price(&self) -> Option<Percent> {
        self.installment_starting_price
    }

    #[inline]
    pub fn discount(&self) -> Option<Money> {
        self.discount
    }

    /// Checks whether this line pays in installments.
    #[inline]
    pub fn is_installment(&self) -> bool {
        self.payment_mode.is_installment()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
