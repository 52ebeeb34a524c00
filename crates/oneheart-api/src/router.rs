//! Axum router construction for the impact API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, tokens, worldwalker};

/// Build the complete Axum router.
///
/// CORS allows any origin so a locally served dashboard can call the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Players
        .route("/api/players", post(handlers::create_player))
        .route("/api/players/{id}/stats", get(handlers::player_stats))
        .route("/api/players/{id}/history", get(handlers::player_history))
        // Quests
        .route("/api/quests", post(handlers::create_quest))
        .route("/api/quests/assign", post(handlers::assign_quest))
        .route("/api/quests/available", get(handlers::available_quests))
        .route("/api/quests/{id}/complete", post(handlers::complete_quest))
        // Tokens
        .route("/api/tokens/transfer", post(tokens::transfer))
        .route("/api/tokens/redeem", post(tokens::redeem))
        .route("/api/tokens/balance", get(tokens::balance))
        .route("/api/tokens/audit", get(tokens::audit))
        // Worldwalker
        .route("/api/worldwalker/readiness", get(worldwalker::readiness))
        .route("/api/worldwalker/skills", get(worldwalker::skills))
        .route("/api/worldwalker/status", get(worldwalker::status))
        .route("/api/worldwalker/phases", get(worldwalker::phases))
        .route("/api/worldwalker/advance", post(worldwalker::advance))
        .route("/api/worldwalker/expedition", post(worldwalker::plan_expedition))
        .route(
            "/api/worldwalker/expedition/{id}/complete",
            post(worldwalker::complete_expedition),
        )
        .route("/api/worldwalker/mission", post(worldwalker::synchronize_mission))
        .route(
            "/api/worldwalker/mission/{id}/complete",
            post(worldwalker::complete_mission),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
