//! Request-scoped services over the Ledger Store.
//!
//! Every service is a free async function taking `&LedgerStore`. Services
//! hold no state between calls; the store handle is the only shared state.
//!
//! - [`impact`] -- players, quests, assignment, completion, stats, history
//! - [`tokens`] -- recording, transfers, redemption, balance, audit
//! - [`worldwalker`] -- readiness, skills, phases, expeditions, missions

pub mod error;
pub mod impact;
pub mod tokens;
pub mod worldwalker;

pub use error::ServiceError;

use oneheart_db::LedgerStore;
use oneheart_types::{Player, PlayerId, Quest, QuestId};

/// Fetch a player or fail with `NotFound`.
pub(crate) async fn load_player(store: &LedgerStore, player_id: PlayerId) -> Result<Player, ServiceError> {
    store
        .get_player(player_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("player", player_id))
}

/// Fetch a quest or fail with `NotFound`.
pub(crate) async fn load_quest(store: &LedgerStore, quest_id: QuestId) -> Result<Quest, ServiceError> {
    store
        .get_quest(quest_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("quest", quest_id))
}

/// Convert an unsigned token count to a ledger amount.
pub(crate) fn to_amount(tokens: u64) -> Result<i64, ServiceError> {
    i64::try_from(tokens)
        .map_err(|e| ServiceError::Validation(format!("token amount {tokens} out of range: {e}")))
}
