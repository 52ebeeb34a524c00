//! The token ledger view: an append-only list of signed entries.
//!
//! [`TokenLedger`] holds entries in insertion order and answers balance
//! questions by summing them. The memory store keeps one as its token
//! table.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Derived balances**: a balance is the signed sum of entries.
//! - **Guarded debits**: [`TokenLedger::append_guarded`] refuses a batch
//!   whose debit exceeds the current balance and appends nothing.

use tracing::warn;

use oneheart_types::{PlayerId, TokenLedgerEntry};

use crate::LedgerError;

/// The token ledger for some set of players.
#[derive(Debug, Default, Clone)]
pub struct TokenLedger {
    /// All entries, in insertion order.
    entries: Vec<TokenLedgerEntry>,
}

impl TokenLedger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Iterate over one player's entries, in insertion order.
    pub fn entries_for(&self, player_id: PlayerId) -> impl Iterator<Item = &TokenLedgerEntry> {
        self.entries.iter().filter(move |e| e.player_id == player_id)
    }

    /// Append a pre-built entry without a balance check.
    ///
    /// Credits go through here. Debits should use
    /// [`append_guarded`](Self::append_guarded).
    pub fn append(&mut self, entry: TokenLedgerEntry) {
        self.entries.push(entry);
    }

    /// Signed sum of a player's entries.
    pub fn balance_of(&self, player_id: PlayerId) -> i64 {
        self.entries_for(player_id)
            .fold(0_i64, |acc, e| acc.saturating_add(e.amount))
    }

    /// Return the current balance if it covers a debit of `required`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `required` exceeds the
    /// balance.
    pub fn check_debit(&self, player_id: PlayerId, required: i64) -> Result<i64, LedgerError> {
        let balance = self.balance_of(player_id);
        if required > balance {
            warn!(
                player_id = %player_id,
                balance,
                required,
                "Rejected debit: insufficient balance"
            );
            return Err(LedgerError::InsufficientBalance {
                player_id,
                balance,
                required,
            });
        }
        Ok(balance)
    }

    /// Append `entries` atomically if `guard` holds.
    ///
    /// When a guard is given, the named player's balance must cover
    /// `required` before anything is appended. Either all entries are
    /// appended or none are.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the guard fails.
    pub fn append_guarded(
        &mut self,
        entries: &[TokenLedgerEntry],
        guard: Option<(PlayerId, i64)>,
    ) -> Result<(), LedgerError> {
        if let Some((player_id, required)) = guard {
            self.check_debit(player_id, required)?;
        }
        self.entries.extend_from_slice(entries);
        Ok(())
    }
}
