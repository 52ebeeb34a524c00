//! Core entity structs for the OneHeart impact backend.
//!
//! Covers players, quests, assignments, and the two append-only logs
//! (`ImpactLog` and `TokenLedgerEntry`) that every reward writes to.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Alignment, AssignmentStatus, QuestCategory, TokenTxType};
use crate::ids::{
    AssignmentId, ExpeditionId, ImpactLogId, MissionId, PlayerId, QuestId, TransactionId,
};

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Descriptive character attributes. Informational only; no rule reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerAttributes {
    /// Physical strength.
    pub strength: u32,
    /// Accumulated wisdom.
    pub wisdom: u32,
    /// Social presence.
    pub charisma: u32,
    /// Endurance.
    pub constitution: u32,
}

/// A registered player.
///
/// `level` and `xp_total` are mutated only by reward application. Players
/// are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Current level, 1 to 10.
    pub level: u32,
    /// Cumulative experience points.
    pub xp_total: u64,
    /// Declared value orientation.
    pub alignment: Alignment,
    /// Character attributes.
    pub attributes: PlayerAttributes,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Quest
// ---------------------------------------------------------------------------

/// Gating requirements for a quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestRequirements {
    /// Minimum player level required to be assigned the quest.
    pub min_level: Option<u32>,
}

/// A real-world task players can be assigned. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Quest {
    /// Unique identifier.
    pub id: QuestId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Kind of work.
    pub category: QuestCategory,
    /// Difficulty, 1 to 5.
    pub difficulty: u32,
    /// Advertised base XP. The reward calculator uses the category base.
    pub base_xp: u32,
    /// Advertised base tokens.
    pub base_tokens: u32,
    /// Region tag, e.g. `region_bangkok`.
    pub region_id: String,
    /// Assignment requirements.
    pub requirements: QuestRequirements,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A player's assignment to a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerQuest {
    /// Unique identifier.
    pub id: AssignmentId,
    /// Assigned player.
    pub player_id: PlayerId,
    /// Assigned quest.
    pub quest_id: QuestId,
    /// Lifecycle status.
    pub status: AssignmentStatus,
    /// Authenticity score recorded at completion, 0 to 100.
    pub score: Option<u32>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Proof link submitted at completion.
    pub proof_url: Option<String>,
    /// Assignment time.
    pub assigned_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Impact log
// ---------------------------------------------------------------------------

/// What an impact log entry was earned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ImpactReference {
    /// A completed quest.
    Quest(QuestId),
    /// A completed slice of a global mission.
    GlobalMission(MissionId),
    /// A completed expedition.
    Expedition(ExpeditionId),
}

/// How an impact entry's value splits across the three funds, plus
/// optional activity counts reported by mission completions.
///
/// The three fractions always sum to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ImpactBreakdown {
    /// Local community fund share.
    #[ts(as = "String")]
    pub local: Decimal,
    /// National fund share.
    #[ts(as = "String")]
    pub national: Decimal,
    /// Global fund share.
    #[ts(as = "String")]
    pub global: Decimal,
    /// Documents produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<u32>,
    /// Partnerships formed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnerships: Option<u32>,
    /// Skills shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_shared: Option<u32>,
}

impl ImpactBreakdown {
    /// A breakdown with the given fractions and no activity counts.
    pub const fn split(local: Decimal, national: Decimal, global: Decimal) -> Self {
        Self {
            local,
            national,
            global,
            documents: None,
            partnerships: None,
            skills_shared: None,
        }
    }

    /// Sum of the three fund fractions.
    pub fn fraction_total(&self) -> Decimal {
        self.local
            .saturating_add(self.national)
            .saturating_add(self.global)
    }
}

/// An append-only record of one reward event's impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ImpactLog {
    /// Unique identifier.
    pub id: ImpactLogId,
    /// The rewarded player.
    pub player_id: PlayerId,
    /// What the reward was for.
    pub reference: ImpactReference,
    /// XP awarded by this event.
    pub xp_awarded: u64,
    /// Tokens awarded by this event.
    pub tokens_awarded: u64,
    /// Impact credits generated.
    #[ts(as = "String")]
    pub impact_value: Decimal,
    /// Fund split and activity counts.
    pub breakdown: ImpactBreakdown,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Token ledger
// ---------------------------------------------------------------------------

/// One signed movement in the append-only token ledger.
///
/// Credits are positive, debits negative. A player's balance is the sum of
/// all of their entries; no balance is stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenLedgerEntry {
    /// Unique identifier.
    pub id: TransactionId,
    /// Whose balance this entry moves.
    pub player_id: PlayerId,
    /// Signed amount.
    pub amount: i64,
    /// Movement kind.
    pub tx_type: TokenTxType,
    /// Free-form origin tag, e.g. `quest_<id>` or `reward_<reward>`.
    pub source: String,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

impl TokenLedgerEntry {
    /// Whether this entry reduces the player's balance.
    pub const fn is_debit(&self) -> bool {
        self.amount < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_reference_is_tagged() {
        let quest = QuestId::new();
        let json = serde_json::to_value(ImpactReference::Quest(quest)).unwrap_or_default();
        assert_eq!(json["kind"], "quest");
        assert_eq!(json["id"], serde_json::Value::String(quest.to_string()));
    }

    #[test]
    fn default_split_sums_to_one() {
        let breakdown =
            ImpactBreakdown::split(Decimal::new(5, 1), Decimal::new(3, 1), Decimal::new(2, 1));
        assert_eq!(breakdown.fraction_total(), Decimal::ONE);
    }

    #[test]
    fn activity_counts_are_omitted_when_absent() {
        let breakdown =
            ImpactBreakdown::split(Decimal::new(4, 1), Decimal::new(3, 1), Decimal::new(3, 1));
        let json = serde_json::to_value(&breakdown).unwrap_or_default();
        assert!(json.get("documents").is_none());
        assert!(json.get("local").is_some());
    }
}
