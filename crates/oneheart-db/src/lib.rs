//! Data layer for the OneHeart impact backend (`PostgreSQL` + in-memory).
//!
//! The Ledger Store is the only shared state in the system. It holds
//! players, quests, assignments, and the two append-only logs (impact logs
//! and token ledger entries), plus persisted expedition plans and global
//! missions.
//!
//! # Architecture
//!
//! ```text
//! Services
//!     |
//!     +-- &LedgerStore (enum dispatch)
//!         |-- Postgres(PostgresPool)
//!         |     |-- PlayerStore       (players)
//!         |     |-- QuestStore        (quests, player_quests)
//!         |     |-- ImpactStore       (impact_logs, append-only)
//!         |     |-- TokenStore        (token_ledger, append-only, guarded debits)
//!         |     |-- WorldwalkerStore  (expeditions, global_missions)
//!         |     +-- reward_store      (atomic multi-table reward writes)
//!         +-- Memory(MemoryStore)     (same contract, one mutex)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`LedgerStore`] handle and write descriptions
//! - [`memory`] -- In-memory backend
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`player_store`], [`quest_store`], [`impact_store`], [`token_store`],
//!   [`worldwalker_store`] -- Per-table `PostgreSQL` operations
//! - [`error`] -- Shared error types

mod codec;
pub mod error;
pub mod impact_store;
pub mod memory;
pub mod player_store;
pub mod postgres;
pub mod quest_store;
mod reward_store;
pub mod store;
pub mod token_store;
pub mod worldwalker_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use impact_store::{ImpactRow, ImpactStore};
pub use memory::MemoryStore;
pub use player_store::{PlayerRow, PlayerStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use quest_store::{CompletedAssignment, QuestRow, QuestStore};
pub use store::{
    AppendOutcome, AssignmentCompletion, BalanceGuard, LedgerStore, RewardApplied, RewardOutcome,
    RewardWrite,
};
pub use token_store::{TokenRow, TokenStore};
pub use worldwalker_store::{ExpeditionRow, MissionRow, WorldwalkerStore};
