//! Worldwalker endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/worldwalker/readiness` | Readiness assessment |
//! | `GET` | `/api/worldwalker/skills` | Skill profile |
//! | `GET` | `/api/worldwalker/status` | Journey status |
//! | `GET` | `/api/worldwalker/phases` | Phase catalog |
//! | `POST` | `/api/worldwalker/advance` | Advance a phase and take the bonus |
//! | `POST` | `/api/worldwalker/expedition` | Plan an expedition |
//! | `POST` | `/api/worldwalker/expedition/{id}/complete` | Record a member's completion |
//! | `POST` | `/api/worldwalker/mission` | Synchronize a global mission |
//! | `POST` | `/api/worldwalker/mission/{id}/complete` | Record a region's completion |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use oneheart_core::services::worldwalker::{self, ExpeditionRequest};
use oneheart_types::{ExpeditionId, MissionId, PlayerId};

use crate::dto::{
    CompleteExpeditionRequest, CompleteMissionRequest, PlanExpeditionRequest, PlayerQuery,
    SynchronizeMissionRequest, parse_id,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Readiness assessment.
pub async fn readiness(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(worldwalker::readiness(&state.store, query.id()?).await?))
}

/// Skill profile.
pub async fn skills(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(worldwalker::skills(&state.store, query.id()?).await?))
}

/// Journey status.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(worldwalker::status(&state.store, query.id()?).await?))
}

/// The four phases.
pub async fn phases() -> impl IntoResponse {
    Json(worldwalker::phases())
}

/// Advance past the player's readiness phase.
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(worldwalker::advance(&state.store, query.id()?).await?))
}

/// Plan and persist an expedition.
pub async fn plan_expedition(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlanExpeditionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let plan = worldwalker::plan_expedition(
        &state.store,
        ExpeditionRequest {
            phase: body.phase,
            region: body.region,
            difficulty: body.difficulty,
            required_skills: body.required_skills,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// Record a team member's completion.
pub async fn complete_expedition(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CompleteExpeditionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let expedition_id: ExpeditionId = parse_id(&id)?;
    let player_id: PlayerId = parse_id(&body.player_id)?;
    let completion = worldwalker::complete_expedition(&state.store, expedition_id, player_id).await?;
    Ok(Json(completion))
}

/// Synchronize a global mission.
pub async fn synchronize_mission(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SynchronizeMissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let mission = worldwalker::synchronize_global_mission(
        &state.store,
        &body.theme,
        body.regions,
        body.duration_days,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(mission)))
}

/// Record a region's mission completion for a player.
pub async fn complete_mission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CompleteMissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let mission_id: MissionId = parse_id(&id)?;
    let player_id: PlayerId = parse_id(&body.player_id)?;
    let completion = worldwalker::record_global_mission_completion(
        &state.store,
        mission_id,
        player_id,
        &body.region,
        &body.impact(),
    )
    .await?;
    Ok(Json(completion))
}
