//! Request and response bodies.
//!
//! Request bodies carry identifiers as strings so a malformed id is
//! reported with the API's own error body rather than a bare extractor
//! rejection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use oneheart_types::{
    Alignment, MissionImpact, PlayerAttributes, PlayerQuest, PlayerId, Quest, QuestCategory,
};

use crate::error::ApiError;

/// Parse a UUID-backed identifier.
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] if `raw` is not a UUID.
pub fn parse_id<T: From<Uuid>>(raw: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse::<Uuid>()
        .map(T::from)
        .map_err(|e| ApiError::InvalidId(format!("{raw}: {e}")))
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// `?player_id=` query parameter.
#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    /// The player.
    pub player_id: String,
}

impl PlayerQuery {
    /// The parsed player id.
    pub fn id(&self) -> Result<PlayerId, ApiError> {
        parse_id(&self.player_id)
    }
}

// ---------------------------------------------------------------------------
// Players and quests
// ---------------------------------------------------------------------------

/// Body of `POST /api/players`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Declared alignment.
    #[serde(default)]
    pub alignment: Alignment,
    /// Character attributes.
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

/// Body of `POST /api/quests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    /// Category.
    pub category: QuestCategory,
    /// Difficulty.
    #[validate(range(min = 1, max = 5))]
    pub difficulty: u32,
    /// Informational base XP.
    #[serde(default)]
    pub base_xp: u32,
    /// Informational base tokens.
    #[serde(default)]
    pub base_tokens: u32,
    /// Region tag.
    #[validate(length(min = 1, max = 100))]
    pub region_id: String,
    /// Minimum level to be assigned.
    #[validate(range(min = 1, max = 10))]
    pub min_level: Option<u32>,
}

/// Body of `POST /api/quests/assign`.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignQuestRequest {
    /// The player.
    #[validate(length(min = 1))]
    pub player_id: String,
    /// The quest.
    #[validate(length(min = 1))]
    pub quest_id: String,
}

/// Response of `POST /api/quests/assign`.
#[derive(Debug, Serialize)]
pub struct AssignQuestResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// The created assignment.
    pub assignment: PlayerQuest,
}

/// Response of `GET /api/quests/available`.
#[derive(Debug, Serialize)]
pub struct AvailableQuestsResponse {
    /// The player.
    pub player_id: PlayerId,
    /// Number of quests returned.
    pub quest_count: usize,
    /// Matching quests, easiest first.
    pub quests: Vec<Quest>,
}

/// Body of `POST /api/quests/{id}/complete`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteQuestRequest {
    /// The completing player.
    #[validate(length(min = 1))]
    pub player_id: String,
    /// Link to the proof.
    #[validate(length(min = 1, max = 2048))]
    pub proof_url: String,
    /// Minutes spent.
    #[validate(range(min = 1))]
    pub duration_minutes: u32,
    /// Proof authenticity, 0 to 100. Defaults to 100.
    #[validate(range(max = 100))]
    pub authenticity_score: Option<u32>,
    /// People who benefited. Defaults to 1.
    #[validate(range(min = 1))]
    pub beneficiaries: Option<u32>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Body of `POST /api/tokens/transfer`.
#[derive(Debug, Deserialize, Validate)]
pub struct TransferRequest {
    /// Sender.
    #[validate(length(min = 1))]
    pub from_player_id: String,
    /// Recipient.
    #[validate(length(min = 1))]
    pub to_player_id: String,
    /// Tokens to move.
    #[validate(range(min = 1))]
    pub amount: i64,
}

/// Body of `POST /api/tokens/redeem`.
#[derive(Debug, Deserialize, Validate)]
pub struct RedeemRequest {
    /// Redeeming player.
    #[validate(length(min = 1))]
    pub player_id: String,
    /// Reward being claimed.
    #[validate(length(min = 1, max = 200))]
    pub reward_id: String,
    /// Tokens to spend.
    #[validate(range(min = 1))]
    pub amount: i64,
}

// ---------------------------------------------------------------------------
// Worldwalker
// ---------------------------------------------------------------------------

/// Body of `POST /api/worldwalker/expedition`.
#[derive(Debug, Deserialize, Validate)]
pub struct PlanExpeditionRequest {
    /// Phase number.
    #[validate(range(min = 1, max = 4))]
    pub phase: u32,
    /// Target region.
    #[validate(length(min = 1, max = 100))]
    pub region: String,
    /// Difficulty for candidate filtering.
    #[validate(range(min = 1, max = 5))]
    pub difficulty: u32,
    /// Roles wanted on the team.
    #[serde(default)]
    pub required_skills: Vec<String>,
}

/// Body of the expedition and mission completion endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteExpeditionRequest {
    /// The completing team member.
    #[validate(length(min = 1))]
    pub player_id: String,
}

/// Body of `POST /api/worldwalker/mission`.
#[derive(Debug, Deserialize, Validate)]
pub struct SynchronizeMissionRequest {
    /// Mission theme.
    #[validate(length(min = 1, max = 200))]
    pub theme: String,
    /// Participating regions.
    #[validate(length(min = 1, max = 50))]
    pub regions: Vec<String>,
    /// Mission length in days.
    #[validate(range(min = 1, max = 365))]
    pub duration_days: u32,
}

/// Body of `POST /api/worldwalker/mission/{id}/complete`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteMissionRequest {
    /// Reporting player.
    #[validate(length(min = 1))]
    pub player_id: String,
    /// Region the work happened in.
    #[validate(length(min = 1))]
    pub region: String,
    /// Local impact achieved.
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

impl CompleteMissionRequest {
    /// The reported activity.
    pub const fn impact(&self) -> MissionImpact {
        MissionImpact {
            local_impact: self.local_impact,
            documents_created: self.documents_created,
            partnerships_formed: self.partnerships_formed,
            skills_shared: self.skills_shared,
        }
    }
}
