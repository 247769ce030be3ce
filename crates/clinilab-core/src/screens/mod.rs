//! Screen controllers.
//!
//! Each screen owns its transient state (form fields, selection sets) and
//! borrows the database plus its UI collaborators; there is no shared store.
//! Errors here are the user-visible validation taxonomy — every variant maps
//! to a blocked submit and an error toast.

mod ledger;
mod register;
mod samples;

pub use ledger::*;
pub use register::*;
pub use samples::*;

use thiserror::Error;

use crate::audit::AuditError;
use crate::db::DbError;
use crate::models::{RegisterStateError, SampleNotAvailable};

/// Screen-level errors: validation failures plus lifecycle violations.
#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("required field: {0}")]
    RequiredField(&'static str),

    #[error("amount must be a positive number")]
    NonPositiveAmount,

    #[error("unknown entry kind: {0}")]
    UnknownEntryKind(String),

    #[error("reason \"Outro\" requires a description")]
    UnspecifiedOtherReason,

    #[error("select at least one sample")]
    EmptySelection,

    #[error("attendant {0} already has an open register")]
    RegisterAlreadyOpen(String),

    #[error("register is already closed")]
    RegisterClosed,

    #[error("{0}")]
    SampleUnavailable(#[from] SampleNotAvailable),

    #[error("action was not confirmed")]
    NotConfirmed,

    #[error("record not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl From<RegisterStateError> for ScreenError {
    fn from(e: RegisterStateError) -> Self {
        match e {
            RegisterStateError::Closed => ScreenError::RegisterClosed,
            RegisterStateError::NonPositiveAmount => ScreenError::NonPositiveAmount,
        }
    }
}

/// Lenient amount coercion for the opening-float field: free text in,
/// non-negative amount out. Unparseable or negative input coerces to 0.
pub(crate) fn coerce_amount(raw: &str) -> f64 {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// Strict amount parsing for payment/entry fields: positive numbers only.
pub(crate) fn parse_positive_amount(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("150"), 150.0);
        assert_eq!(coerce_amount("10.50"), 10.5);
        assert_eq!(coerce_amount("10,50"), 10.5);
        assert_eq!(coerce_amount("  25 "), 25.0);
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("-5"), 0.0);
        assert_eq!(coerce_amount("NaN"), 0.0);
    }

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("10.50"), Some(10.5));
        assert_eq!(parse_positive_amount("10,50"), Some(10.5));
        assert_eq!(parse_positive_amount("0"), None);
        assert_eq!(parse_positive_amount("-5"), None);
        assert_eq!(parse_positive_amount("abc"), None);
        assert_eq!(parse_positive_amount("inf"), None);
    }
}
