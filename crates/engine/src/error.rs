//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`NotFound`] returned when a loan is missing or has been soft-deleted.
//! - [`Conflict`] returned when a loan number is already taken by an active
//!   loan, or when an update tries to change the loan number.
//! - [`Validation`] returned by the boundary validation helpers, never by the
//!   service itself.
//! - [`Overflow`] returned when loan totals do not fit in the money type.
//! - [`Database`] wraps any storage failure.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Validation`]: EngineError::Validation
//!  [`Overflow`]: EngineError::Overflow
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::FieldError;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid input: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Overflow(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn loan_not_found() -> Self {
        Self::NotFound("Loan not found".to_string())
    }

    pub(crate) fn loan_number_taken() -> Self {
        Self::Conflict("Loan number already exists".to_string())
    }

    pub(crate) fn totals_overflow() -> Self {
        Self::Overflow("Loan totals are too large to compute".to_string())
    }
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Overflow(a), Self::Overflow(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_every_field() {
        let err = EngineError::Validation(vec![
            FieldError::new("emi", "EMI cannot exceed Amount"),
            FieldError::new("endDate", "Loan's End Date must be after Start Date"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid input: emi: EMI cannot exceed Amount; endDate: Loan's End Date must be after Start Date"
        );
    }
}
