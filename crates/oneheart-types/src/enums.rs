//! Enumeration types for the OneHeart impact backend.
//!
//! Every categorical value the rules branch on is a closed enum so that
//! lookups are exhaustive `match` expressions rather than string tables
//! with a silent default.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Player alignment
// ---------------------------------------------------------------------------

/// The value orientation a player declares at registration.
///
/// Alignment feeds the readiness scorer's alignment category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Alignment {
    /// No particular leaning.
    #[default]
    Balanced,
    /// Giving-oriented.
    Generous,
    /// Service to others first.
    Service,
    /// Personal and community growth.
    Growth,
    /// Community-building.
    Community,
    /// Any declared alignment outside the known set.
    Other,
}

// ---------------------------------------------------------------------------
// Quest category
// ---------------------------------------------------------------------------

/// The kind of real-world work a quest represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum QuestCategory {
    /// Environmental cleanup (parks, beaches, streams).
    Cleanup,
    /// Teaching, mentoring, or skills workshops.
    Training,
    /// Cultural documentation and heritage work.
    Cultural,
    /// Surveys and field research.
    Research,
    /// Sports coaching and health programs.
    Sports,
}

impl QuestCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Cleanup,
        Self::Training,
        Self::Cultural,
        Self::Research,
        Self::Sports,
    ];
}

// ---------------------------------------------------------------------------
// Assignment status
// ---------------------------------------------------------------------------

/// Lifecycle of a player-quest assignment. Transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AssignmentStatus {
    /// Assigned and not yet completed.
    Available,
    /// Completed with proof; terminal.
    Completed,
}

// ---------------------------------------------------------------------------
// Token transaction type
// ---------------------------------------------------------------------------

/// The kind of movement recorded in the token ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TokenTxType {
    /// Tokens created as a reward (credit).
    Mint,
    /// Tokens destroyed (debit).
    Burn,
    /// Tokens moved between players. The sender's entry is a debit; the
    /// recipient's entry is recorded as a credit by the transfer service.
    Transfer,
    /// Tokens spent on a reward (debit).
    Redeem,
}

impl TokenTxType {
    /// Whether a single-sided `record` of this type removes tokens from the
    /// player's balance.
    pub const fn is_debit(self) -> bool {
        match self {
            Self::Mint => false,
            Self::Burn | Self::Transfer | Self::Redeem => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Readiness tier
// ---------------------------------------------------------------------------

/// Human-facing interpretation of an overall readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ReadinessTier {
    /// Overall below 30.
    NotReady,
    /// Overall 30 to 49.
    Beginner,
    /// Overall 50 to 69.
    Ready,
    /// Overall 70 to 84.
    Advanced,
    /// Overall 85 and above.
    Master,
}

// ---------------------------------------------------------------------------
// Worldwalker phase
// ---------------------------------------------------------------------------

/// One of the four stages of the Worldwalker journey.
///
/// Serialized as its stage number (1 to 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Phase {
    /// Stage 1: build skills and reputation locally.
    Preparation,
    /// Stage 2: lead regional expeditions at home.
    DomesticTrial,
    /// Stage 3: coordinate multi-country expeditions.
    GlobalOperation,
    /// Stage 4: document and share knowledge globally.
    ReturnAndShare,
}

impl Phase {
    /// All phases in journey order.
    pub const ALL: [Self; 4] = [
        Self::Preparation,
        Self::DomesticTrial,
        Self::GlobalOperation,
        Self::ReturnAndShare,
    ];

    /// The stage number, 1 to 4.
    pub const fn number(self) -> u32 {
        match self {
            Self::Preparation => 1,
            Self::DomesticTrial => 2,
            Self::GlobalOperation => 3,
            Self::ReturnAndShare => 4,
        }
    }

    /// Look up a phase by its stage number.
    pub const fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(Self::Preparation),
            2 => Some(Self::DomesticTrial),
            3 => Some(Self::GlobalOperation),
            4 => Some(Self::ReturnAndShare),
            _ => None,
        }
    }

    /// The following phase, or `None` at the final stage.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Preparation => Some(Self::DomesticTrial),
            Self::DomesticTrial => Some(Self::GlobalOperation),
            Self::GlobalOperation => Some(Self::ReturnAndShare),
            Self::ReturnAndShare => None,
        }
    }
}

impl From<Phase> for u32 {
    fn from(phase: Phase) -> Self {
        phase.number()
    }
}

/// A phase number outside 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPhase(pub u32);

impl core::fmt::Display for InvalidPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "phase must be between 1 and 4, got {}", self.0)
    }
}

impl TryFrom<u32> for Phase {
    type Error = InvalidPhase;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(InvalidPhase(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_types() {
        assert!(!TokenTxType::Mint.is_debit());
        assert!(TokenTxType::Burn.is_debit());
        assert!(TokenTxType::Transfer.is_debit());
        assert!(TokenTxType::Redeem.is_debit());
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&QuestCategory::Cleanup).unwrap_or_default();
        assert_eq!(json, "\"cleanup\"");
        let parsed: Result<QuestCategory, _> = serde_json::from_str("\"research\"");
        assert_eq!(parsed.ok(), Some(QuestCategory::Research));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let parsed: Result<QuestCategory, _> = serde_json::from_str("\"cleanpu\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn phase_serializes_as_number() {
        let json = serde_json::to_string(&Phase::GlobalOperation).unwrap_or_default();
        assert_eq!(json, "3");
        let parsed: Result<Phase, _> = serde_json::from_str("5");
        assert!(parsed.is_err());
    }

    #[test]
    fn phase_walks_forward_and_stops() {
        assert_eq!(Phase::Preparation.next(), Some(Phase::DomesticTrial));
        assert_eq!(Phase::ReturnAndShare.next(), None);
        for phase in Phase::ALL {
            assert_eq!(Phase::from_number(phase.number()), Some(phase));
        }
    }
}
