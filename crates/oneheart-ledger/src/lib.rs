//! Heart token ledger for the OneHeart impact backend.
//!
//! Every token a player holds is accounted for by an append-only list of
//! signed entries. Credits are positive, debits negative, and a balance is
//! always the sum of a player's entries. There is no balance column to
//! drift out of sync.
//!
//! # Architecture
//!
//! - [`transaction`] -- The [`TokenTransactionBuilder`] for validated entry construction.
//! - [`ledger`] -- The [`TokenLedger`] view: balances and guarded appends.
//! - [`audit`] -- History verification: no overdraft, signs match types and transfer direction.
//! - [`sources`] -- Canonical source tags for ledger entries.
//!
//! # Sign convention
//!
//! | Type | Sign |
//! |------|------|
//! | Mint | credit |
//! | Burn | debit |
//! | Redeem | debit |
//! | Transfer | debit for the sender, credit for the recipient |
//!
//! # Usage
//!
//! ```
//! use oneheart_ledger::{TokenLedger, TokenTransactionBuilder};
//! use oneheart_types::{PlayerId, TokenTxType};
//!
//! let player = PlayerId::new();
//! let mut ledger = TokenLedger::new();
//!
//! if let Ok(mint) = TokenTransactionBuilder::new(player, TokenTxType::Mint)
//!     .amount(50)
//!     .source("quest_park".to_owned())
//!     .build()
//! {
//!     ledger.append(mint);
//! }
//!
//! assert_eq!(ledger.balance_of(player), 50);
//! assert!(ledger.check_debit(player, 51).is_err());
//! ```

pub mod audit;
pub mod ledger;
pub mod sources;
pub mod transaction;

// Re-export primary types at crate root.
pub use audit::{AuditReport, audit_history};
pub use ledger::TokenLedger;
pub use transaction::{Side, TokenTransactionBuilder};

use oneheart_types::{PlayerId, TokenTxType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when building or recording token entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Amount must be non-zero.
    #[error("token amount must be non-zero")]
    ZeroAmount,

    /// Amount must not be negative; the sign comes from the entry side.
    #[error("token amount must be positive, got {amount}")]
    NegativeAmount {
        /// The invalid amount.
        amount: i64,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The requested side is not allowed for this transaction type.
    #[error("{tx_type:?} entries cannot be recorded as a {side:?}")]
    InvalidSide {
        /// The transaction type.
        tx_type: TokenTxType,
        /// The rejected side.
        side: Side,
    },

    /// A debit would take the balance below zero.
    #[error("insufficient balance for player {player_id}: have {balance}, need {required}")]
    InsufficientBalance {
        /// The player being debited.
        player_id: PlayerId,
        /// Balance before the debit.
        balance: i64,
        /// Amount requested.
        required: i64,
    },

    /// Negating the amount overflowed.
    #[error("token arithmetic overflow")]
    Overflow,
}
