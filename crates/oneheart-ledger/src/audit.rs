//! History verification for the token ledger.
//!
//! Replaying a player's entries checks two properties:
//!
//! - The running balance never drops below zero right after a debit.
//! - Every entry's sign matches its type. Transfer legs must also match
//!   their direction: `transfer_to_*` is a debit, `transfer_from_*` a
//!   credit.
//!
//! Both are guaranteed by the store's guarded appends; the audit exists to
//! detect corrupted or hand-edited data.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use oneheart_types::{PlayerId, TokenLedgerEntry, TokenTxType, TransactionId};

use crate::sources::{TRANSFER_FROM_PREFIX, TRANSFER_TO_PREFIX};

/// Per-player replay of a token history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AuditReport {
    /// The audited player.
    pub player_id: PlayerId,
    /// Number of entries replayed.
    pub entries: u64,
    /// Sum of positive entries.
    pub total_credits: i64,
    /// Sum of negative entries, as a positive number.
    pub total_debits: i64,
    /// Final balance.
    pub balance: i64,
    /// Lowest running balance seen.
    pub lowest_balance: i64,
    /// Debit entries that left the balance negative.
    pub overdrafts: Vec<TransactionId>,
    /// Entries whose sign contradicts their type or transfer direction.
    pub sign_mismatches: Vec<TransactionId>,
}

impl AuditReport {
    /// Whether the history replays without an overdraft or a bad sign.
    pub fn is_clean(&self) -> bool {
        self.overdrafts.is_empty() && self.sign_mismatches.is_empty()
    }
}

/// Replay `entries` for `player_id` in the order given.
///
/// Entries belonging to other players are skipped.
pub fn audit_history(player_id: PlayerId, entries: &[TokenLedgerEntry]) -> AuditReport {
    let mut report = AuditReport {
        player_id,
        entries: 0,
        total_credits: 0,
        total_debits: 0,
        balance: 0,
        lowest_balance: 0,
        overdrafts: Vec::new(),
        sign_mismatches: Vec::new(),
    };

    for entry in entries.iter().filter(|e| e.player_id == player_id) {
        report.entries = report.entries.saturating_add(1);
        report.balance = report.balance.saturating_add(entry.amount);

        if !sign_matches(entry) {
            report.sign_mismatches.push(entry.id);
        }

        if entry.is_debit() {
            report.total_debits = report.total_debits.saturating_sub(entry.amount);
            if report.balance < 0 {
                report.overdrafts.push(entry.id);
            }
        } else {
            report.total_credits = report.total_credits.saturating_add(entry.amount);
        }

        report.lowest_balance = report.lowest_balance.min(report.balance);
    }

    report
}

/// Mints are positive, burns and redemptions negative. A transfer leg is
/// negative when sent and positive when received.
fn sign_matches(entry: &TokenLedgerEntry) -> bool {
    match entry.tx_type {
        TokenTxType::Mint => entry.amount > 0,
        TokenTxType::Burn | TokenTxType::Redeem => entry.amount < 0,
        TokenTxType::Transfer => {
            if entry.source.starts_with(TRANSFER_TO_PREFIX) {
                entry.amount < 0
            } else if entry.source.starts_with(TRANSFER_FROM_PREFIX) {
                entry.amount > 0
            } else {
                entry.amount != 0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    /// Helper to create an entry without going through the builder.
    fn make_entry(player_id: PlayerId, amount: i64, tx_type: TokenTxType) -> TokenLedgerEntry {
        TokenLedgerEntry {
            id: TransactionId::new(),
            player_id,
            amount,
            tx_type,
            source: format!("{tx_type:?}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_is_clean() {
        let report = audit_history(PlayerId::new(), &[]);
        assert!(report.is_clean());
        assert_eq!(report.balance, 0);
    }

    #[test]
    fn report_totals_credits_and_debits() {
        let player = PlayerId::new();
        let entries = vec![
            make_entry(player, 50, TokenTxType::Mint),
            make_entry(player, -20, TokenTxType::Redeem),
            make_entry(PlayerId::new(), 999, TokenTxType::Mint),
        ];
        let report = audit_history(player, &entries);
        assert_eq!(report.entries, 2);
        assert_eq!(report.total_credits, 50);
        assert_eq!(report.total_debits, 20);
        assert_eq!(report.balance, 30);
        assert!(report.is_clean());
    }

    #[test]
    fn overdraft_is_flagged() {
        let player = PlayerId::new();
        let bad = make_entry(player, -5, TokenTxType::Burn);
        let bad_id = bad.id;
        let entries = vec![bad, make_entry(player, 10, TokenTxType::Mint)];
        let report = audit_history(player, &entries);
        assert_eq!(report.overdrafts, vec![bad_id]);
        assert_eq!(report.lowest_balance, -5);
        assert_eq!(report.balance, 5);
    }

    #[test]
    fn transfer_legs_follow_direction() {
        let player = PlayerId::new();
        let peer = PlayerId::new();
        let mut received = make_entry(player, 10, TokenTxType::Transfer);
        received.source = format!("transfer_from_{peer}");
        let mut sent = make_entry(player, -4, TokenTxType::Transfer);
        sent.source = format!("transfer_to_{peer}");
        let report = audit_history(player, &[received, sent]);
        assert!(report.is_clean());
        assert_eq!(report.balance, 6);

        let mut backwards = make_entry(player, 4, TokenTxType::Transfer);
        backwards.source = format!("transfer_to_{peer}");
        let backwards_id = backwards.id;
        let report = audit_history(player, &[backwards]);
        assert_eq!(report.sign_mismatches, vec![backwards_id]);
        assert!(!report.is_clean());
    }

    #[test]
    fn positive_burn_is_flagged() {
        let player = PlayerId::new();
        let burn = make_entry(player, 5, TokenTxType::Burn);
        let burn_id = burn.id;
        let report = audit_history(player, &[make_entry(player, 5, TokenTxType::Mint), burn]);
        assert_eq!(report.sign_mismatches, vec![burn_id]);
        assert!(report.overdrafts.is_empty());
    }
}
