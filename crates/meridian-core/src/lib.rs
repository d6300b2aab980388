//! # meridian-core: Sale Composition Engine
//!
//! This crate is the **heart** of the Meridian sales console. It holds the
//! in-memory draft of a multi-product sale as pure business logic with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian Sales Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console Frontend                             │   │
//! │  │  Customer picker ─► Product lines ─► Device picker ─► Submit   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   draft   │  │  linkage  │  │  params   │  │  payload  │  │   │
//! │  │   │ SaleDraft │  │  Batch    │  │ Payment   │  │   Sale    │  │   │
//! │  │   │ SaleLine  │  │  Linkage  │  │  Terms    │  │  Payload  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE STATE TRANSITIONS   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ trait seams                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   CatalogProvider  •  DeviceRegistry  •  OrderSubmission        │   │
//! │  │          (REST-backed implementations live in the shell)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`draft`] - The [`SaleDraft`] controller and installment dossier
//! - [`line`] - Per-product [`SaleLine`] aggregation and projection
//! - [`linkage`] - Device-to-batch assignment (tentative/committed)
//! - [`params`] - Payment terms (one-off vs installment)
//! - [`costs`] - Miscellaneous cost ledger
//! - [`recipient`] - Per-line sale recipient
//! - [`catalog`] / [`devices`] - Collaborator seams and in-memory fakes
//! - [`payload`] - The submission contract shapes
//! - [`money`] / [`types`] / [`validation`] / [`error`] - Shared foundation
//!
//! ## Design Principles
//!
//! 1. **Single-transition mutations**: every public operation is one
//!    synchronous state change with no observable intermediate state
//! 2. **No I/O**: catalog/device fetches and submission are trait seams
//! 3. **Integer money**: all monetary values are i64 minor units
//! 4. **Explicit errors**: all failures are typed and recoverable; the
//!    draft is never left mid-transition
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::{Money, PaymentTerms, SaleDraft};
//! use meridian_core::catalog::{InventoryBatchSpec, ProductSnapshot};
//! use meridian_core::types::{CustomerRef, PaymentMode};
//!
//! let mut draft = SaleDraft::new();
//! draft.select_customer(CustomerRef {
//!     id: "cus-1".into(),
//!     firstname: "Ada".into(),
//!     lastname: "Obi".into(),
//!     phone: "+2348012345678".into(),
//!     email: "ada@example.com".into(),
//!     address: "12 Marina Rd, Lagos".into(),
//! });
//!
//! draft.add_product(ProductSnapshot {
//!     product_id: "prod-1".into(),
//!     name: "Solar Home System".into(),
//!     tag: "SHS-200W".into(),
//!     price: Money::from_minor(150_000_00),
//!     available_payment_modes: vec![PaymentMode::OneOff],
//!     inventory_batches: vec![InventoryBatchSpec {
//!         id: "batch-a".into(),
//!         name: "Lagos warehouse".into(),
//!         required_quantity: 1,
//!     }],
//! })?;
//!
//! draft.set_parameters("prod-1", PaymentTerms::one_off(None))?;
//! draft.begin_tentative_selection("prod-1", "batch-a")?;
//! draft.toggle_tentative_device("prod-1", "batch-a", "dev-1")?;
//! draft.commit_batch("prod-1", "batch-a")?;
//! draft.autofill_recipient("prod-1")?;
//!
//! let payload = draft.build_payload()?;
//! assert_eq!(payload.sale_items[0].quantity, 1);
//! # Ok::<(), meridian_core::DraftError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod costs;
pub mod devices;
pub mod draft;
pub mod error;
pub mod line;
pub mod linkage;
pub mod money;
pub mod params;
pub mod payload;
pub mod recipient;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::SaleDraft` instead of
// `use meridian_core::draft::SaleDraft`

pub use catalog::{CatalogProvider, InMemoryCatalog, InventoryBatchSpec, ProductSnapshot};
pub use costs::CostLedger;
pub use devices::{DeviceQuery, DeviceRecord, DeviceRegistry, InMemoryDeviceRegistry};
pub use draft::{DraftSummary, InstallmentDossier, SaleDraft};
pub use error::{DraftError, DraftResult, FieldIssue, ValidationError};
pub use line::SaleLine;
pub use linkage::{BatchLinkage, DeviceLinkage, LinkState, ToggleOutcome};
pub use money::Money;
pub use params::{ParameterSet, PaymentTerms};
pub use payload::{OrderSubmission, SaleItemPayload, SalePayload};
pub use recipient::Recipient;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum product lines allowed in a single draft.
///
/// Prevents runaway drafts and keeps submission payloads a reasonable size.
/// Can be made configurable per tenant in future versions.
pub const MAX_PRODUCT_LINES: usize = 100;

/// Digit count of a Bank Verification Number.
pub const BVN_LENGTH: usize = 11;

/// Maximum length for free-text name fields (person names, cost labels).
pub const MAX_NAME_LENGTH: usize = 200;
