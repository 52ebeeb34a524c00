//! Service info and Impact Engine endpoints.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Service banner |
//! | `GET` | `/health` | Liveness and store backend |
//! | `POST` | `/api/players` | Register a player |
//! | `GET` | `/api/players/{id}/stats` | Player stats |
//! | `GET` | `/api/players/{id}/history` | Recent impact history |
//! | `POST` | `/api/quests` | Define a quest |
//! | `POST` | `/api/quests/assign` | Assign a quest |
//! | `GET` | `/api/quests/available` | Difficulty-matched quests |
//! | `POST` | `/api/quests/{id}/complete` | Complete a quest and award impact |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::warn;
use validator::Validate;

use oneheart_core::reward::Activity;
use oneheart_core::services::impact::{self, NewPlayer, NewQuest, QuestSubmission};
use oneheart_types::{PlayerId, QuestId};

use crate::dto::{
    AssignQuestRequest, AssignQuestResponse, AvailableQuestsResponse, CompleteQuestRequest,
    CreatePlayerRequest, CreateQuestRequest, PlayerQuery, parse_id,
};
use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / and GET /health
// ---------------------------------------------------------------------------

/// Service banner.
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "OneHeart Impact Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "philosophy": "ONE FOR ALL",
    }))
}

/// Liveness check. Reports `degraded` with 503 when the store does not
/// answer.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, label) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(error = %e, "store ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };
    let body = Json(serde_json::json!({
        "status": label,
        "service": "oneheart-backend",
        "store": state.store.name(),
        "started_at": state.started_at,
        "timestamp": Utc::now(),
    }));
    (status, body)
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Register a player at level 1.
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let player = impact::create_player(
        &state.store,
        NewPlayer {
            name: body.name,
            alignment: body.alignment,
            attributes: body.attributes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// Player stats.
pub async fn player_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let player_id: PlayerId = parse_id(&id)?;
    Ok(Json(impact::player_stats(&state.store, player_id).await?))
}

/// Impact history over the configured window, newest first.
pub async fn player_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let player_id: PlayerId = parse_id(&id)?;
    let history = impact::player_history(&state.store, player_id, state.history_days).await?;
    Ok(Json(history))
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// Define a quest.
pub async fn create_quest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateQuestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let quest = impact::create_quest(
        &state.store,
        NewQuest {
            title: body.title,
            description: body.description,
            category: body.category,
            difficulty: body.difficulty,
            base_xp: body.base_xp,
            base_tokens: body.base_tokens,
            region_id: body.region_id,
            min_level: body.min_level,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(quest)))
}

/// Assign a quest to a player.
pub async fn assign_quest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AssignQuestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let player_id: PlayerId = parse_id(&body.player_id)?;
    let quest_id: QuestId = parse_id(&body.quest_id)?;
    let assignment = impact::assign_quest(&state.store, player_id, quest_id).await?;
    Ok(Json(AssignQuestResponse {
        success: true,
        message: "Quest assigned successfully".to_owned(),
        assignment,
    }))
}

/// Quests near the player's recommended difficulty.
pub async fn available_quests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let player_id = query.id()?;
    let quests = impact::list_quests_for_player(&state.store, player_id).await?;
    Ok(Json(AvailableQuestsResponse {
        player_id,
        quest_count: quests.len(),
        quests,
    }))
}

/// Complete a quest and award XP, tokens, and impact.
pub async fn complete_quest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CompleteQuestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let quest_id: QuestId = parse_id(&id)?;
    let player_id: PlayerId = parse_id(&body.player_id)?;

    let mut activity = Activity::new(body.duration_minutes);
    if let Some(score) = body.authenticity_score {
        activity.authenticity_score = score;
    }
    if let Some(beneficiaries) = body.beneficiaries {
        activity.beneficiaries = beneficiaries;
    }

    let completion = impact::complete_quest(
        &state.store,
        QuestSubmission {
            player_id,
            quest_id,
            proof_url: body.proof_url,
            activity,
        },
    )
    .await?;
    Ok(Json(completion))
}
