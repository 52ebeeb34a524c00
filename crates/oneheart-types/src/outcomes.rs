//! Results returned by the service layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Alignment, Phase, QuestCategory};
use crate::ids::{ExpeditionId, ImpactLogId, MissionId, PlayerId, TransactionId};
use crate::reports::SkillProfile;
use crate::structs::{ImpactBreakdown, ImpactReference, PlayerAttributes};

/// Summary of a quest completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestCompletion {
    /// Rewarded player.
    pub player_id: PlayerId,
    /// XP credited.
    pub xp_awarded: u64,
    /// Tokens minted.
    pub tokens_awarded: u64,
    /// Whether the level changed.
    pub leveled_up: bool,
    /// Level after the reward.
    pub new_level: u32,
    /// Badges earned. Always empty; no badge rules exist yet.
    pub badges_earned: Vec<String>,
}

/// Aggregate view of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerStats {
    /// Player.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Cumulative XP.
    pub xp_total: u64,
    /// XP still needed for the next level; `None` at the cap.
    pub xp_to_next_level: Option<u64>,
    /// Signed sum of ledger entries.
    pub token_balance: i64,
    /// Completed assignments.
    pub quests_completed: u64,
    /// Character attributes.
    pub attributes: PlayerAttributes,
    /// Declared alignment.
    pub alignment: Alignment,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// One row of a player's recent impact history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HistoryEntry {
    /// Impact log entry.
    pub impact_id: ImpactLogId,
    /// What the impact was for.
    pub reference: ImpactReference,
    /// Quest title, for quest impacts.
    pub quest_title: Option<String>,
    /// Quest category, for quest impacts.
    pub quest_category: Option<QuestCategory>,
    /// XP awarded.
    pub xp_awarded: u64,
    /// Tokens awarded.
    pub tokens_awarded: u64,
    /// Impact credits.
    #[ts(as = "String")]
    pub impact_value: Decimal,
    /// Fund split.
    pub fund_allocation: ImpactBreakdown,
    /// When the impact was recorded.
    pub created_at: DateTime<Utc>,
}

/// A player's recent impact history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerHistory {
    /// Player.
    pub player_id: PlayerId,
    /// Number of entries.
    pub history_count: u64,
    /// Entries, newest first.
    pub history: Vec<HistoryEntry>,
}

/// Where a player stands on the Worldwalker journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldwalkerStatus {
    /// Player.
    pub player_id: PlayerId,
    /// Phase the readiness score allows.
    #[ts(as = "u32")]
    pub current_phase: Phase,
    /// Overall readiness.
    pub readiness_score: u32,
    /// Current skill profile.
    pub skills_profile: SkillProfile,
    /// Non-zero skill dimensions, strongest first.
    pub strongest_skills: Vec<String>,
    /// Expedition completions recorded.
    pub expeditions_completed: u64,
    /// Sum of all impact values.
    #[ts(as = "String")]
    pub global_impact_total: Decimal,
    /// Next thing to aim for.
    pub next_milestone: String,
}

/// Result of advancing to the next phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseAdvancement {
    /// Player.
    pub player_id: PlayerId,
    /// Phase entered.
    #[ts(as = "u32")]
    pub new_phase: Phase,
    /// Bonus XP credited.
    pub xp_awarded: u64,
    /// Bonus tokens minted.
    pub tokens_awarded: u64,
    /// Level after the bonus.
    pub new_level: u32,
    /// Whether the bonus changed the level.
    pub leveled_up: bool,
    /// Congratulation text.
    pub message: String,
}

/// Result of recording an expedition completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExpeditionCompletion {
    /// Expedition.
    pub expedition_id: ExpeditionId,
    /// Player.
    pub player_id: PlayerId,
    /// XP credited.
    pub xp_awarded: u64,
    /// Tokens minted.
    pub tokens_awarded: u64,
    /// Impact credits logged.
    #[ts(as = "String")]
    pub impact_value: Decimal,
    /// Level after the reward.
    pub new_level: u32,
    /// Whether the level changed.
    pub leveled_up: bool,
}

/// Result of recording a region's share of a global mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissionCompletion {
    /// Mission.
    pub mission_id: MissionId,
    /// Player.
    pub player_id: PlayerId,
    /// Region reported.
    pub region: String,
    /// Local impact times the global multiplier.
    #[ts(as = "String")]
    pub total_impact: Decimal,
    /// XP recorded on the impact log.
    pub xp_awarded: u64,
    /// Tokens minted.
    pub tokens_awarded: u64,
}

/// A player's current token position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenBalance {
    /// Player.
    pub player_id: PlayerId,
    /// Signed sum of ledger entries.
    pub balance: i64,
    /// Current level.
    pub level: u32,
    /// Cumulative XP.
    pub xp_total: u64,
    /// When the balance was computed.
    pub last_updated: DateTime<Utc>,
}

/// Result of a token transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TransferReceipt {
    /// Sender.
    pub from: PlayerId,
    /// Recipient.
    pub to: PlayerId,
    /// Tokens moved.
    pub amount: i64,
    /// Sender balance after the transfer.
    pub sender_balance: i64,
    /// Ledger entries written, debit first.
    pub transaction_ids: Vec<TransactionId>,
    /// When the transfer was recorded.
    pub created_at: DateTime<Utc>,
}

/// Result of redeeming tokens for a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RedemptionReceipt {
    /// Player.
    pub player_id: PlayerId,
    /// Reward redeemed.
    pub reward_id: String,
    /// Tokens spent.
    pub amount_redeemed: i64,
    /// Balance after the redemption.
    pub new_balance: i64,
    /// Ledger entry written.
    pub transaction_id: TransactionId,
    /// When the redemption was recorded.
    pub created_at: DateTime<Utc>,
}
