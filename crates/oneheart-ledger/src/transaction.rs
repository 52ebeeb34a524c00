//! Transaction builders and validation for the token ledger.
//!
//! Provides a [`TokenTransactionBuilder`] that turns an unsigned amount, a
//! transaction type, and a side into a signed [`TokenLedgerEntry`]. The
//! sign is never supplied by callers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use oneheart_types::{PlayerId, TokenLedgerEntry, TokenTxType, TransactionId};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Entry side
// ---------------------------------------------------------------------------

/// Whether an entry adds to or removes from a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Adds tokens.
    Credit,
    /// Removes tokens.
    Debit,
}

impl Side {
    /// The side a single-sided entry of `tx_type` takes.
    pub const fn for_type(tx_type: TokenTxType) -> Self {
        if tx_type.is_debit() {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

/// Return whether `side` is allowed for `tx_type`.
///
/// Mints are always credits and burns and redemptions always debits.
/// Transfers have one entry on each side.
const fn side_allowed(tx_type: TokenTxType, side: Side) -> bool {
    match tx_type {
        TokenTxType::Mint => matches!(side, Side::Credit),
        TokenTxType::Burn | TokenTxType::Redeem => matches!(side, Side::Debit),
        TokenTxType::Transfer => true,
    }
}

// ---------------------------------------------------------------------------
// Transaction builder
// ---------------------------------------------------------------------------

/// Builder for constructing validated [`TokenLedgerEntry`] values.
///
/// Enforces a strictly positive amount, a non-empty source tag, and a side
/// consistent with the transaction type.
///
/// # Examples
///
/// ```
/// use oneheart_ledger::TokenTransactionBuilder;
/// use oneheart_types::{PlayerId, TokenTxType};
///
/// let entry = TokenTransactionBuilder::new(PlayerId::new(), TokenTxType::Redeem)
///     .amount(25)
///     .source("redeem_tshirt".to_owned())
///     .build();
///
/// assert_eq!(entry.map(|e| e.amount).ok(), Some(-25));
/// ```
#[derive(Debug)]
pub struct TokenTransactionBuilder {
    player_id: PlayerId,
    tx_type: TokenTxType,
    side: Side,
    amount: Option<i64>,
    source: Option<String>,
}

impl TokenTransactionBuilder {
    /// Start building an entry for `player_id`. The side defaults to the
    /// one implied by `tx_type`.
    pub const fn new(player_id: PlayerId, tx_type: TokenTxType) -> Self {
        Self {
            player_id,
            tx_type,
            side: Side::for_type(tx_type),
            amount: None,
            source: None,
        }
    }

    /// Override the side. Only meaningful for transfers.
    #[must_use]
    pub const fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Set the unsigned amount.
    #[must_use]
    pub const fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the source tag.
    #[must_use]
    pub fn source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    /// Validate inputs and produce a signed [`TokenLedgerEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if amount or source is unset or
    /// the source is blank, [`LedgerError::ZeroAmount`] or
    /// [`LedgerError::NegativeAmount`] for a non-positive amount, and
    /// [`LedgerError::InvalidSide`] if the side contradicts the type.
    pub fn build(self) -> Result<TokenLedgerEntry, LedgerError> {
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        let source = self.source.ok_or(LedgerError::MissingField("source"))?;

        if source.trim().is_empty() {
            return Err(LedgerError::MissingField("source"));
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < 0 {
            return Err(LedgerError::NegativeAmount { amount });
        }
        if !side_allowed(self.tx_type, self.side) {
            return Err(LedgerError::InvalidSide {
                tx_type: self.tx_type,
                side: self.side,
            });
        }

        let signed = match self.side {
            Side::Credit => amount,
            Side::Debit => amount.checked_neg().ok_or(LedgerError::Overflow)?,
        };

        Ok(TokenLedgerEntry {
            id: TransactionId::new(),
            player_id: self.player_id,
            amount: signed,
            tx_type: self.tx_type,
            source,
            created_at: Utc::now(),
        })
    }
}

/// Build both legs of a transfer: a debit for `from` and a credit for `to`.
///
/// # Errors
///
/// Returns [`LedgerError`] if either leg fails validation.
pub fn transfer_pair(
    from: PlayerId,
    to: PlayerId,
    amount: i64,
) -> Result<[TokenLedgerEntry; 2], LedgerError> {
    let debit = TokenTransactionBuilder::new(from, TokenTxType::Transfer)
        .side(Side::Debit)
        .amount(amount)
        .source(crate::sources::transfer_to(to))
        .build()?;
    let credit = TokenTransactionBuilder::new(to, TokenTxType::Transfer)
        .side(Side::Credit)
        .amount(amount)
        .source(crate::sources::transfer_from(from))
        .build()?;
    Ok([debit, credit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_signs_by_type() {
        let player = PlayerId::new();
        let mint = TokenTransactionBuilder::new(player, TokenTxType::Mint)
            .amount(13)
            .source("quest_x".to_owned())
            .build();
        assert_eq!(mint.map(|e| e.amount).ok(), Some(13));

        let burn = TokenTransactionBuilder::new(player, TokenTxType::Burn)
            .amount(13)
            .source("burn".to_owned())
            .build();
        assert_eq!(burn.map(|e| e.amount).ok(), Some(-13));
    }

    #[test]
    fn zero_amount_rejected() {
        let result = TokenTransactionBuilder::new(PlayerId::new(), TokenTxType::Mint)
            .amount(0)
            .source("quest_x".to_owned())
            .build();
        assert!(matches!(result.err(), Some(LedgerError::ZeroAmount)));
    }

    #[test]
    fn negative_amount_rejected() {
        let result = TokenTransactionBuilder::new(PlayerId::new(), TokenTxType::Redeem)
            .amount(-5)
            .source("redeem_x".to_owned())
            .build();
        assert!(matches!(
            result.err(),
            Some(LedgerError::NegativeAmount { amount: -5 })
        ));
    }

    #[test]
    fn missing_or_blank_source_rejected() {
        let missing = TokenTransactionBuilder::new(PlayerId::new(), TokenTxType::Mint)
            .amount(1)
            .build();
        assert!(matches!(
            missing.err(),
            Some(LedgerError::MissingField("source"))
        ));

        let blank = TokenTransactionBuilder::new(PlayerId::new(), TokenTxType::Mint)
            .amount(1)
            .source("  ".to_owned())
            .build();
        assert!(matches!(blank.err(), Some(LedgerError::MissingField("source"))));
    }

    #[test]
    fn mint_cannot_be_a_debit() {
        let result = TokenTransactionBuilder::new(PlayerId::new(), TokenTxType::Mint)
            .side(Side::Debit)
            .amount(1)
            .source("quest_x".to_owned())
            .build();
        assert!(matches!(result.err(), Some(LedgerError::InvalidSide { .. })));
    }

    #[test]
    fn transfer_pair_nets_to_zero() {
        let from = PlayerId::new();
        let to = PlayerId::new();
        let pair = transfer_pair(from, to, 40);
        assert!(pair.is_ok());
        if let Ok([debit, credit]) = pair {
            assert_eq!(debit.player_id, from);
            assert_eq!(debit.amount, -40);
            assert_eq!(credit.player_id, to);
            assert_eq!(credit.amount, 40);
            assert_eq!(debit.source, format!("transfer_to_{to}"));
            assert_eq!(credit.source, format!("transfer_from_{from}"));
        }
    }

    #[test]
    fn every_type_has_its_default_side_allowed() {
        for tx_type in [
            TokenTxType::Mint,
            TokenTxType::Burn,
            TokenTxType::Transfer,
            TokenTxType::Redeem,
        ] {
            assert!(side_allowed(tx_type, Side::for_type(tx_type)));
        }
    }
}
