//! Error type shared by every service.
//!
//! Business-rule failures (`NotFound`, `Validation`, `Requirement`,
//! `InsufficientBalance`, `MaxPhase`) are final and never retried. Store
//! failures are wrapped unchanged.

use oneheart_db::DbError;
use oneheart_ledger::LedgerError;

/// Errors returned by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// The identifier looked up.
        id: String,
    },

    /// Input is out of range or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The player does not meet a quest or phase requirement.
    #[error("requirement not met: {0}")]
    Requirement(String),

    /// A debit exceeds the player's balance.
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance {
        /// Balance at the time of the check.
        balance: i64,
        /// Amount requested.
        required: i64,
    },

    /// The player is already in the final phase.
    #[error("already at maximum phase ({phase})")]
    MaxPhase {
        /// The current phase number.
        phase: u32,
    },

    /// A ledger entry failed validation.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] DbError),
}

impl ServiceError {
    /// A `NotFound` for `entity` with the given id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Requirement(_) => "requirement_not_met",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::MaxPhase { .. } => "max_phase",
            Self::Ledger(_) => "ledger_error",
            Self::Store(_) => "store_error",
        }
    }
}
