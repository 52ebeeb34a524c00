//! Token Ledger Accountant: validated, balance-guarded token movements.
//!
//! Balances are never stored. Every debit is checked against the signed
//! sum of the player's entries inside the same store operation that
//! appends it, so concurrent debits cannot overdraw.

use chrono::Utc;
use tracing::{info, warn};

use oneheart_db::{AppendOutcome, BalanceGuard, LedgerStore};
use oneheart_ledger::audit::{AuditReport, audit_history};
use oneheart_ledger::transaction::transfer_pair;
use oneheart_ledger::{TokenTransactionBuilder, sources};
use oneheart_types::{
    PlayerId, RedemptionReceipt, TokenBalance, TokenLedgerEntry, TokenTxType, TransferReceipt,
};

use super::{ServiceError, load_player};

fn require_positive(amount: i64) -> Result<(), ServiceError> {
    if amount > 0 {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "amount must be positive, got {amount}"
        )))
    }
}

/// Append entries, turning a failed guard into `InsufficientBalance`.
async fn append(
    store: &LedgerStore,
    entries: &[TokenLedgerEntry],
    guard: Option<BalanceGuard>,
) -> Result<(), ServiceError> {
    match store.append_token_entries(entries, guard).await? {
        AppendOutcome::Appended => Ok(()),
        AppendOutcome::Insufficient { balance } => {
            let required = guard.map_or(0, |g| g.required);
            warn!(
                player_id = ?guard.map(|g| g.player_id),
                balance,
                required,
                "debit rejected"
            );
            Err(ServiceError::InsufficientBalance { balance, required })
        }
    }
}

/// Record a single-sided movement.
///
/// `amount` is the unsigned quantity; burn, transfer and redeem entries
/// are stored negated.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a non-positive amount or blank
/// source, [`ServiceError::NotFound`] for an unknown player, and
/// [`ServiceError::InsufficientBalance`] when a debit exceeds the balance.
pub async fn record(
    store: &LedgerStore,
    player_id: PlayerId,
    amount: i64,
    tx_type: TokenTxType,
    source: String,
) -> Result<TokenLedgerEntry, ServiceError> {
    require_positive(amount)?;
    if source.trim().is_empty() {
        return Err(ServiceError::Validation("source must not be empty".to_owned()));
    }
    load_player(store, player_id).await?;

    let entry = TokenTransactionBuilder::new(player_id, tx_type)
        .amount(amount)
        .source(source)
        .build()?;
    let guard = tx_type.is_debit().then_some(BalanceGuard {
        player_id,
        required: amount,
    });
    append(store, std::slice::from_ref(&entry), guard).await?;
    info!(%player_id, amount = entry.amount, tx_type = ?tx_type, source = %entry.source, "tokens recorded");
    Ok(entry)
}

/// Current balance for a player.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn balance_of(store: &LedgerStore, player_id: PlayerId) -> Result<TokenBalance, ServiceError> {
    let player = load_player(store, player_id).await?;
    let balance = store.balance_of(player_id).await?;
    Ok(TokenBalance {
        player_id,
        balance,
        level: player.level,
        xp_total: player.xp_total,
        last_updated: Utc::now(),
    })
}

/// Move tokens between two players. Both legs commit together.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a non-positive amount or a
/// self-transfer, [`ServiceError::NotFound`] for an unknown player, and
/// [`ServiceError::InsufficientBalance`] when the sender cannot cover it.
pub async fn transfer_tokens(
    store: &LedgerStore,
    from: PlayerId,
    to: PlayerId,
    amount: i64,
) -> Result<TransferReceipt, ServiceError> {
    require_positive(amount)?;
    if from == to {
        return Err(ServiceError::Validation(
            "cannot transfer tokens to the same player".to_owned(),
        ));
    }
    load_player(store, from).await?;
    load_player(store, to).await?;

    let legs = transfer_pair(from, to, amount)?;
    append(
        store,
        &legs,
        Some(BalanceGuard {
            player_id: from,
            required: amount,
        }),
    )
    .await?;

    let sender_balance = store.balance_of(from).await?;
    info!(%from, %to, amount, "tokens transferred");
    Ok(TransferReceipt {
        from,
        to,
        amount,
        sender_balance,
        transaction_ids: legs.iter().map(|e| e.id).collect(),
        created_at: Utc::now(),
    })
}

/// Spend tokens on a reward.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a non-positive amount or blank
/// reward id, [`ServiceError::NotFound`] for an unknown player, and
/// [`ServiceError::InsufficientBalance`] when the balance is too low.
pub async fn redeem_tokens(
    store: &LedgerStore,
    player_id: PlayerId,
    reward_id: &str,
    amount: i64,
) -> Result<RedemptionReceipt, ServiceError> {
    if reward_id.trim().is_empty() {
        return Err(ServiceError::Validation("reward_id must not be empty".to_owned()));
    }
    let entry = record(
        store,
        player_id,
        amount,
        TokenTxType::Redeem,
        sources::redeem(reward_id),
    )
    .await?;
    let new_balance = store.balance_of(player_id).await?;
    Ok(RedemptionReceipt {
        player_id,
        reward_id: reward_id.to_owned(),
        amount_redeemed: amount,
        new_balance,
        transaction_id: entry.id,
        created_at: entry.created_at,
    })
}

/// Replay a player's history and report overdrafts and bad signs.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] for an unknown player.
pub async fn audit_player(store: &LedgerStore, player_id: PlayerId) -> Result<AuditReport, ServiceError> {
    load_player(store, player_id).await?;
    let entries = store.token_entries(player_id).await?;
    let report = audit_history(player_id, &entries);
    if !report.is_clean() {
        warn!(
            %player_id,
            overdrafts = report.overdrafts.len(),
            sign_mismatches = report.sign_mismatches.len(),
            "token history failed audit"
        );
    }
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::impact::{NewPlayer, create_player};

    async fn player(store: &LedgerStore, name: &str) -> PlayerId {
        create_player(
            store,
            NewPlayer {
                name: name.to_owned(),
                ..NewPlayer::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn debits_are_negated_and_guarded() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice").await;

        record(&store, alice, 50, TokenTxType::Mint, "quest_a".to_owned())
            .await
            .unwrap();
        let burned = record(&store, alice, 20, TokenTxType::Burn, "burn".to_owned())
            .await
            .unwrap();
        assert_eq!(burned.amount, -20);

        let overdraw = record(&store, alice, 31, TokenTxType::Burn, "burn".to_owned()).await;
        assert!(matches!(
            overdraw,
            Err(ServiceError::InsufficientBalance { balance: 30, required: 31 })
        ));
        assert_eq!(store.token_entries(alice).await.unwrap().len(), 2);
        assert_eq!(balance_of(&store, alice).await.unwrap().balance, 30);
    }

    #[tokio::test]
    async fn record_validates() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice").await;
        assert!(matches!(
            record(&store, alice, 0, TokenTxType::Mint, "x".to_owned()).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            record(&store, alice, -5, TokenTxType::Mint, "x".to_owned()).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            record(&store, PlayerId::new(), 5, TokenTxType::Mint, "x".to_owned()).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn transfer_moves_both_legs() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice").await;
        let bob = player(&store, "Bob").await;
        record(&store, alice, 40, TokenTxType::Mint, "quest_a".to_owned())
            .await
            .unwrap();

        let receipt = transfer_tokens(&store, alice, bob, 15).await.unwrap();
        assert_eq!(receipt.sender_balance, 25);
        assert_eq!(receipt.transaction_ids.len(), 2);
        assert_eq!(store.balance_of(bob).await.unwrap(), 15);

        let too_much = transfer_tokens(&store, alice, bob, 26).await;
        assert!(matches!(too_much, Err(ServiceError::InsufficientBalance { .. })));
        assert_eq!(store.balance_of(bob).await.unwrap(), 15);

        let to_self = transfer_tokens(&store, alice, alice, 1).await;
        assert!(matches!(to_self, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn redemption_reports_new_balance() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice").await;
        record(&store, alice, 100, TokenTxType::Mint, "quest_a".to_owned())
            .await
            .unwrap();

        let receipt = redeem_tokens(&store, alice, "coffee", 30).await.unwrap();
        assert_eq!(receipt.new_balance, 70);
        assert_eq!(receipt.amount_redeemed, 30);

        let entries = store.token_entries(alice).await.unwrap();
        assert_eq!(entries.last().map(|e| e.source.as_str()), Some("reward_coffee"));

        let broke = redeem_tokens(&store, alice, "bike", 71).await;
        assert!(matches!(broke, Err(ServiceError::InsufficientBalance { balance: 70, required: 71 })));
    }

    #[tokio::test]
    async fn concurrent_debits_never_overdraw() {
        let store = LedgerStore::memory();
        let alice = player(&store, "Alice").await;
        record(&store, alice, 100, TokenTxType::Mint, "quest_a".to_owned())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                redeem_tokens(&store, alice, &format!("r{i}"), 30).await.is_ok()
            }));
        }
        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap() {
                succeeded += 1;
            }
        }
        assert_eq!(succeeded, 3);
        assert_eq!(store.balance_of(alice).await.unwrap(), 10);
        assert!(audit_player(&store, alice).await.unwrap().is_clean());
    }
}
