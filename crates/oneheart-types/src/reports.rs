//! Outputs of the reward and readiness rules, and the Worldwalker plans.
//!
//! These are computed values. `ExpeditionPlan` and `GlobalMission` are also
//! persisted so later completions can be validated against them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Phase, ReadinessTier};
use crate::ids::{ExpeditionId, MissionId, PlayerId};
use crate::structs::ImpactBreakdown;

// ---------------------------------------------------------------------------
// Reward calculation
// ---------------------------------------------------------------------------

/// The multiplier chain applied to base XP, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RewardMultipliers {
    /// Zone difficulty factor.
    #[ts(as = "String")]
    pub zone_difficulty: Decimal,
    /// Community health factor.
    #[ts(as = "String")]
    pub community_health: Decimal,
    /// Player level factor (diminishing returns at high level).
    #[ts(as = "String")]
    pub player_level: Decimal,
    /// Proof authenticity factor, `score / 100`.
    #[ts(as = "String")]
    pub authenticity: Decimal,
    /// Time sensitivity factor.
    #[ts(as = "String")]
    pub time_sensitivity: Decimal,
}

/// Fixed split of impact value across the three funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FundAllocation {
    /// Local community share.
    #[ts(as = "String")]
    pub local: Decimal,
    /// National share.
    #[ts(as = "String")]
    pub national: Decimal,
    /// Global share.
    #[ts(as = "String")]
    pub global: Decimal,
}

impl FundAllocation {
    /// The allocation as an impact breakdown with no activity counts.
    pub const fn to_breakdown(self) -> ImpactBreakdown {
        ImpactBreakdown::split(self.local, self.national, self.global)
    }
}

/// Result of evaluating a quest completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ImpactResult {
    /// Category base plus one XP per ten minutes.
    pub base_xp: u64,
    /// Base XP after the multiplier chain, floored.
    pub final_xp: u64,
    /// Tokens minted for the completion.
    pub tokens: u64,
    /// Impact credits generated. Not rounded.
    #[ts(as = "String")]
    pub impact_credits: Decimal,
    /// Multipliers applied.
    pub multipliers: RewardMultipliers,
    /// Fund split for the impact.
    pub fund_allocation: FundAllocation,
}

// ---------------------------------------------------------------------------
// Readiness and skills
// ---------------------------------------------------------------------------

/// The five readiness categories, each in 0 to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ReadinessCategories {
    /// Community standing from completed quests.
    #[ts(as = "String")]
    pub reputation: Decimal,
    /// Competency from level and XP.
    #[ts(as = "String")]
    pub skills: Decimal,
    /// Breadth of completed quest categories.
    #[ts(as = "String")]
    pub experience: Decimal,
    /// Mean proof authenticity score.
    #[ts(as = "String")]
    pub trust_score: Decimal,
    /// Score for the declared alignment.
    #[ts(as = "String")]
    pub alignment: Decimal,
}

/// A player's readiness for the Worldwalker journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ReadinessScore {
    /// Rounded mean of the five categories, 0 to 100.
    pub overall: u32,
    /// Per-category scores.
    pub categories: ReadinessCategories,
    /// Highest phase the player may enter.
    #[ts(as = "u32")]
    pub ready_for_phase: Phase,
    /// Human-facing interpretation of `overall`.
    pub tier: ReadinessTier,
    /// Improvement hints, in fixed order.
    pub recommendations: Vec<String>,
}

/// The six skill dimensions, each in 0 to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SkillVector {
    /// From training quests.
    pub leadership: u32,
    /// From cultural and research quests.
    pub communication: u32,
    /// From category diversity.
    pub adaptability: u32,
    /// From research quests.
    pub technical: u32,
    /// From cleanup and sports quests.
    pub compassion: u32,
    /// From research and cultural quests.
    pub documentation: u32,
}

/// A player's skill vector with gaps and role suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SkillProfile {
    /// Skill scores.
    pub skills: SkillVector,
    /// Dimensions below 40, with a hint each.
    pub gaps: Vec<String>,
    /// Roles for dimensions above 60, or `Apprentice`.
    pub recommended_roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Expeditions
// ---------------------------------------------------------------------------

/// Rewards offered for completing an expedition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExpeditionRewards {
    /// XP per member.
    pub xp: u64,
    /// Tokens per member.
    pub tokens: u64,
    /// Impact credits per member.
    pub impact_credits: u64,
}

/// A planned team expedition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExpeditionPlan {
    /// Unique identifier.
    pub id: ExpeditionId,
    /// Phase number as requested (may be outside 1 to 4).
    pub phase: u32,
    /// Target region.
    pub region: String,
    /// Difficulty used for candidate filtering.
    pub difficulty: u32,
    /// Roles the organizer asked for.
    pub required_skills: Vec<String>,
    /// Selected members, best score first.
    pub team: Vec<PlayerId>,
    /// Maximum team size for the phase.
    pub team_size: u32,
    /// Planned length in days.
    pub duration_days: u32,
    /// Expedition objectives.
    pub objectives: Vec<String>,
    /// Rewards per member.
    pub rewards: ExpeditionRewards,
    /// Planning time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Global missions
// ---------------------------------------------------------------------------

/// The local slice of a global mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionalVariation {
    /// Region tag.
    pub region: String,
    /// What the region works on.
    pub local_objective: String,
    /// Local reward pool.
    pub local_rewards: u64,
}

/// A progress checkpoint on a mission timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Checkpoint {
    /// 1-based checkpoint number.
    pub sequence: u32,
    /// Days after mission start.
    pub day: u32,
    /// Absolute checkpoint time.
    pub at: DateTime<Utc>,
}

/// A synchronized multi-region mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GlobalMission {
    /// Unique identifier.
    pub id: MissionId,
    /// Mission theme.
    pub theme: String,
    /// Journey phase the mission belongs to.
    #[ts(as = "u32")]
    pub phase: Phase,
    /// Participating regions.
    pub regions: Vec<String>,
    /// Mission start.
    pub start_date: DateTime<Utc>,
    /// Mission end.
    pub end_date: DateTime<Utc>,
    /// Per-region objectives.
    pub regional_variations: Vec<RegionalVariation>,
    /// Four evenly spaced checkpoints.
    pub checkpoints: Vec<Checkpoint>,
    /// Shared objective.
    pub global_objective: String,
    /// Target impact across all regions.
    pub global_impact_target: u64,
}

impl GlobalMission {
    /// Whether `region` takes part in this mission.
    pub fn includes_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }
}

/// Activity reported for one region's share of a global mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissionImpact {
    /// Local impact achieved.
    #[ts(as = "String")]
    pub local_impact: Decimal,
    /// Documents produced.
    #[serde(default)]
    pub documents_created: u32,
    /// Partnerships formed.
    #[serde(default)]
    pub partnerships_formed: u32,
    /// Skills shared.
    #[serde(default)]
    pub skills_shared: u32,
}

// ---------------------------------------------------------------------------
// Phase catalog
// ---------------------------------------------------------------------------

/// Headline rewards of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseRewards {
    /// XP.
    pub xp: u64,
    /// Tokens.
    pub tokens: u64,
}

/// Descriptive catalog entry for a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseInfo {
    /// The phase.
    #[ts(as = "u32")]
    pub phase: Phase,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Readiness needed to enter.
    pub min_readiness: u32,
    /// Typical duration.
    pub duration: String,
    /// What the phase trains.
    pub focus: String,
    /// Headline rewards.
    pub rewards: PhaseRewards,
    /// Example activity.
    pub example: String,
}
