//! # Validation Module
//!
//! Field-level validation for the sale composition engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  On write (engine mutations)                                           │
//! │  ├── Cost ledger entries (name + amount)                               │
//! │  └── Payment parameters (mode-specific rules)                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  On read (readiness / submission)                                      │
//! │  ├── Recipient completeness                                            │
//! │  └── Installment dossier (BVN, identification, next of kin,            │
//! │      guarantor) — stored as typed drafts, validated here               │
//! │                                                                         │
//! │  The submission check aggregates everything into Vec<FieldIssue>.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Date rules take `today` as a parameter so they stay deterministic under
//! test; the draft controller passes the current date.

use chrono::NaiveDate;

use crate::error::{FieldIssue, ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{GuarantorDetails, IdentificationDetails, NextOfKinDetails};
use crate::{BVN_LENGTH, MAX_NAME_LENGTH};

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a free-text field is present.
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a name-like field (person names, cost labels).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most `MAX_NAME_LENGTH` characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    validate_required(field, value)?;

    if value.trim().len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with non-empty local and domain parts
/// - Domain contains a dot that is not its first or last character
/// - No whitespace anywhere
///
/// This is deliberately a basic format check; deliverability is the
/// backend's concern.
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let Some((local, domain)) = value.split_once('@') else {
        return Err(invalid("must contain an @"));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("must be a valid email address"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("must have a valid domain"));
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Optional leading `+`, then 7 to 15 digits
/// - Spaces and hyphens are ignored
pub fn validate_phone(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits, with an optional leading +".to_string(),
        });
    }

    if digits.len() < 7 || digits.len() > 15 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be between 7 and 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a Bank Verification Number.
///
/// ## Rules
/// - Exactly `BVN_LENGTH` (11) ASCII digits
pub fn validate_bvn(value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required("bvn", value)?;

    if value.len() != BVN_LENGTH || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "bvn".to_string(),
            reason: format!("must be a {}-digit number", BVN_LENGTH),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount that must not be negative (costs, discounts).
///
/// Zero is allowed.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that a date is not in the future.
pub fn validate_not_future(field: &str, date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if date > today {
        return Err(ValidationError::FutureDate {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates that `date` is strictly after `other` (e.g. an expiration date
/// against its issue date).
pub fn validate_date_after(
    field: &str,
    date: NaiveDate,
    other_field: &str,
    other: NaiveDate,
) -> ValidationResult<()> {
    if date <= other {
        return Err(ValidationError::DateOrder {
            field: field.to_string(),
            after: other_field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Dossier Composite Validators
// =============================================================================
// These run at readiness/submission time over the stored (possibly partial)
// dossier values and collect one FieldIssue per offending control.

/// Collects issues for an identification document.
///
/// ## Rules
/// - idType and idNumber present
/// - issueDate not in the future
/// - expirationDate strictly after issueDate
pub fn identification_issues(
    details: &IdentificationDetails,
    prefix: &str,
    today: NaiveDate,
) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if let Err(e) = validate_required("idType", &details.id_type) {
        issues.push(FieldIssue::at(prefix, e));
    }
    if let Err(e) = validate_required("idNumber", &details.id_number) {
        issues.push(FieldIssue::at(prefix, e));
    }
    if let Err(e) = validate_not_future("issueDate", details.issue_date, today) {
        issues.push(FieldIssue::at(prefix, e));
    }
    if let Err(e) = validate_date_after(
        "expirationDate",
        details.expiration_date,
        "issueDate",
        details.issue_date,
    ) {
        issues.push(FieldIssue::at(prefix, e));
    }

    issues
}

/// Collects issues for next-of-kin details.
pub fn next_of_kin_issues(details: &NextOfKinDetails, prefix: &str) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    let required = [
        ("firstname", &details.firstname),
        ("lastname", &details.lastname),
        ("relationship", &details.relationship),
        ("address", &details.address),
    ];
    for (field, value) in required {
        if let Err(e) = validate_name(field, value) {
            issues.push(FieldIssue::at(prefix, e));
        }
    }
    if let Err(e) = validate_phone("phone", &details.phone) {
        issues.push(FieldIssue::at(prefix, e));
    }
    if let Err(e) = validate_email("email", &details.email) {
        issues.push(FieldIssue::at(prefix, e));
    }

    issues
}

/// Collects issues for guarantor details, including the nested
/// identification document.
pub fn guarantor_issues(
    details: &GuarantorDetails,
    prefix: &str,
    today: NaiveDate,
) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    let required = [
        ("firstname", &details.firstname),
        ("lastname", &details.lastname),
        ("address", &details.address),
    ];
    for (field, value) in required {
        if let Err(e) = validate_name(field, value) {
            issues.push(FieldIssue::at(prefix, e));
        }
    }
    if let Err(e) = validate_phone("phone", &details.phone) {
        issues.push(FieldIssue::at(prefix, e));
    }
    if let Err(e) = validate_email("email", &details.email) {
        issues.push(FieldIssue::at(prefix, e));
    }
    if let Err(e) = validate_not_future("dateOfBirth", details.date_of_birth, today) {
        issues.push(FieldIssue::at(prefix, e));
    }

    let nested = if prefix.is_empty() {
        "identification".to_string()
    } else {
        format!("{}.identification", prefix)
    };
    issues.extend(identification_issues(&details.identification, &nested, today));

    issues
}

// =============================================================================
// Unit Tests
// =============================================================================
