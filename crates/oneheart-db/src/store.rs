//! The Ledger Store: one handle over the `PostgreSQL` and in-memory
//! backends.
//!
//! Services take a `&LedgerStore` and never know which backend they run
//! against. The handle is created once at startup and shared through the
//! HTTP state.

use chrono::{DateTime, Utc};

use oneheart_types::{
    ExpeditionId, ExpeditionPlan, GlobalMission, ImpactLog, MissionId, Player, PlayerId,
    PlayerQuest, Quest, QuestId, TokenLedgerEntry,
};

use crate::error::DbError;
use crate::impact_store::ImpactStore;
use crate::memory::MemoryStore;
use crate::player_store::PlayerStore;
use crate::postgres::PostgresPool;
use crate::quest_store::{CompletedAssignment, QuestStore};
use crate::reward_store;
use crate::token_store::TokenStore;
use crate::worldwalker_store::WorldwalkerStore;

// ---------------------------------------------------------------------------
// Write descriptions
// ---------------------------------------------------------------------------

/// Require a player's balance to cover a debit before appending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceGuard {
    /// The player being debited.
    pub player_id: PlayerId,
    /// Tokens the balance must cover.
    pub required: i64,
}

/// Result of a guarded append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// All entries were appended.
    Appended,
    /// The guard failed; nothing was appended.
    Insufficient {
        /// Balance at the time of the check.
        balance: i64,
    },
}

/// Assignment fields written when a quest is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCompletion {
    /// Quest whose open assignments are completed.
    pub quest_id: QuestId,
    /// Authenticity score recorded.
    pub score: u32,
    /// Proof link recorded.
    pub proof_url: String,
    /// Completion time.
    pub completed_at: DateTime<Utc>,
}

/// Everything a single reward writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardWrite {
    /// Rewarded player.
    pub player_id: PlayerId,
    /// XP to add. Zero leaves XP and level untouched.
    pub xp_delta: u64,
    /// Impact log to append.
    pub impact: Option<ImpactLog>,
    /// Mint entry to append.
    pub mint: Option<TokenLedgerEntry>,
    /// Assignments to complete.
    pub completion: Option<AssignmentCompletion>,
    /// Refuse the write when the player already has an impact log with the
    /// same reference.
    pub once_per_reference: bool,
}

/// Player state after a reward was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardApplied {
    /// Level before the reward.
    pub previous_level: u32,
    /// Player after the reward.
    pub player: Player,
}

/// Result of [`LedgerStore::apply_reward`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardOutcome {
    /// Everything was written.
    Applied(RewardApplied),
    /// The player does not exist; nothing was written.
    PlayerMissing,
    /// `once_per_reference` was set and a matching log exists; nothing was
    /// written.
    Duplicate,
}

// ---------------------------------------------------------------------------
// Unified store enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// The persistence handle shared by every service.
///
/// Uses enum dispatch instead of trait objects because async methods are
/// not dyn-compatible in Rust.
#[derive(Debug, Clone)]
pub enum LedgerStore {
    /// `PostgreSQL` via a connection pool.
    Postgres(PostgresPool),
    /// Process-local state behind one mutex.
    Memory(MemoryStore),
}

impl LedgerStore {
    /// A fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Check that the backend answers. The memory store always does.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if `PostgreSQL` does not answer.
    pub async fn ping(&self) -> Result<(), DbError> {
        match self {
            Self::Postgres(pg) => pg.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Release backend resources before exit.
    pub async fn close(&self) {
        if let Self::Postgres(pg) = self {
            pg.close().await;
        }
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Insert a new player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    pub async fn insert_player(&self, player: &Player) -> Result<(), DbError> {
        match self {
            Self::Postgres(pg) => PlayerStore::new(pg.pool()).insert(player).await,
            Self::Memory(mem) => {
                mem.insert_player(player).await;
                Ok(())
            }
        }
    }

    /// Fetch a player by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>, DbError> {
        match self {
            Self::Postgres(pg) => PlayerStore::new(pg.pool()).get(player_id).await,
            Self::Memory(mem) => Ok(mem.get_player(player_id).await),
        }
    }

    /// Fetch every player, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn list_players(&self) -> Result<Vec<Player>, DbError> {
        match self {
            Self::Postgres(pg) => PlayerStore::new(pg.pool()).list().await,
            Self::Memory(mem) => Ok(mem.list_players().await),
        }
    }

    // =========================================================================
    // Quests and assignments
    // =========================================================================

    /// Insert a new quest.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    pub async fn insert_quest(&self, quest: &Quest) -> Result<(), DbError> {
        match self {
            Self::Postgres(pg) => QuestStore::new(pg.pool()).insert(quest).await,
            Self::Memory(mem) => {
                mem.insert_quest(quest).await;
                Ok(())
            }
        }
    }

    /// Fetch a quest by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn get_quest(&self, quest_id: QuestId) -> Result<Option<Quest>, DbError> {
        match self {
            Self::Postgres(pg) => QuestStore::new(pg.pool()).get(quest_id).await,
            Self::Memory(mem) => Ok(mem.get_quest(quest_id).await),
        }
    }

    /// Fetch the quests with the given ids. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn get_quests(&self, quest_ids: &[QuestId]) -> Result<Vec<Quest>, DbError> {
        match self {
            Self::Postgres(pg) => QuestStore::new(pg.pool()).get_many(quest_ids).await,
            Self::Memory(mem) => Ok(mem.get_quests(quest_ids).await),
        }
    }

    /// Up to `limit` quests with difficulty in `[min, max]`, easiest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn quests_in_difficulty_range(
        &self,
        min: u32,
        max: u32,
        limit: u32,
    ) -> Result<Vec<Quest>, DbError> {
        match self {
            Self::Postgres(pg) => {
                QuestStore::new(pg.pool())
                    .in_difficulty_range(min, max, limit)
                    .await
            }
            Self::Memory(mem) => Ok(mem.quests_in_difficulty_range(min, max, limit).await),
        }
    }

    /// Insert a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    pub async fn insert_assignment(&self, assignment: &PlayerQuest) -> Result<(), DbError> {
        match self {
            Self::Postgres(pg) => QuestStore::new(pg.pool()).insert_assignment(assignment).await,
            Self::Memory(mem) => {
                mem.insert_assignment(assignment).await;
                Ok(())
            }
        }
    }

    /// A player's completed assignments with their quests.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn completed_assignments(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<CompletedAssignment>, DbError> {
        match self {
            Self::Postgres(pg) => {
                QuestStore::new(pg.pool())
                    .completed_for_player(player_id)
                    .await
            }
            Self::Memory(mem) => Ok(mem.completed_assignments(player_id).await),
        }
    }

    // =========================================================================
    // Impact logs
    // =========================================================================

    /// A player's impact logs since `since` (all when `None`), newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn impact_logs(
        &self,
        player_id: PlayerId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ImpactLog>, DbError> {
        match self {
            Self::Postgres(pg) => ImpactStore::new(pg.pool()).for_player(player_id, since).await,
            Self::Memory(mem) => Ok(mem.impact_logs(player_id, since).await),
        }
    }

    // =========================================================================
    // Token ledger
    // =========================================================================

    /// Append token entries atomically, checking `guard` first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails. A failed guard is reported as
    /// [`AppendOutcome::Insufficient`].
    pub async fn append_token_entries(
        &self,
        entries: &[TokenLedgerEntry],
        guard: Option<BalanceGuard>,
    ) -> Result<AppendOutcome, DbError> {
        match self {
            Self::Postgres(pg) => TokenStore::new(pg.pool()).append(entries, guard).await,
            Self::Memory(mem) => Ok(mem.append_token_entries(entries, guard).await),
        }
    }

    /// Signed sum of a player's ledger entries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn balance_of(&self, player_id: PlayerId) -> Result<i64, DbError> {
        match self {
            Self::Postgres(pg) => TokenStore::new(pg.pool()).balance_of(player_id).await,
            Self::Memory(mem) => Ok(mem.balance_of(player_id).await),
        }
    }

    /// A player's ledger entries in append order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn token_entries(&self, player_id: PlayerId) -> Result<Vec<TokenLedgerEntry>, DbError> {
        match self {
            Self::Postgres(pg) => TokenStore::new(pg.pool()).entries_for(player_id).await,
            Self::Memory(mem) => Ok(mem.token_entries(player_id).await),
        }
    }

    // =========================================================================
    // Rewards
    // =========================================================================

    /// Apply a reward atomically.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails; nothing is written in that
    /// case.
    pub async fn apply_reward(
        &self,
        write: &RewardWrite,
        resolve_level: fn(u64) -> u32,
    ) -> Result<RewardOutcome, DbError> {
        match self {
            Self::Postgres(pg) => reward_store::apply_reward(pg.pool(), write, resolve_level).await,
            Self::Memory(mem) => Ok(mem.apply_reward(write, resolve_level).await),
        }
    }

    // =========================================================================
    // Worldwalker plans
    // =========================================================================

    /// Persist an expedition plan.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    pub async fn insert_expedition(&self, plan: &ExpeditionPlan) -> Result<(), DbError> {
        match self {
            Self::Postgres(pg) => WorldwalkerStore::new(pg.pool()).insert_expedition(plan).await,
            Self::Memory(mem) => {
                mem.insert_expedition(plan).await;
                Ok(())
            }
        }
    }

    /// Fetch an expedition plan.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn get_expedition(
        &self,
        expedition_id: ExpeditionId,
    ) -> Result<Option<ExpeditionPlan>, DbError> {
        match self {
            Self::Postgres(pg) => {
                WorldwalkerStore::new(pg.pool())
                    .get_expedition(expedition_id)
                    .await
            }
            Self::Memory(mem) => Ok(mem.get_expedition(expedition_id).await),
        }
    }

    /// Persist a global mission.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    pub async fn insert_mission(&self, mission: &GlobalMission) -> Result<(), DbError> {
        match self {
            Self::Postgres(pg) => WorldwalkerStore::new(pg.pool()).insert_mission(mission).await,
            Self::Memory(mem) => {
                mem.insert_mission(mission).await;
                Ok(())
            }
        }
    }

    /// Fetch a global mission.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    pub async fn get_mission(&self, mission_id: MissionId) -> Result<Option<GlobalMission>, DbError> {
        match self {
            Self::Postgres(pg) => WorldwalkerStore::new(pg.pool()).get_mission(mission_id).await,
            Self::Memory(mem) => Ok(mem.get_mission(mission_id).await),
        }
    }
}
