//! Token Ledger endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/tokens/transfer` | Move tokens between players |
//! | `POST` | `/api/tokens/redeem` | Spend tokens on a reward |
//! | `GET` | `/api/tokens/balance` | Current balance |
//! | `GET` | `/api/tokens/audit` | Replay history and report overdrafts |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use validator::Validate;

use oneheart_core::services::tokens;
use oneheart_types::PlayerId;

use crate::dto::{PlayerQuery, RedeemRequest, TransferRequest, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Transfer tokens; both legs commit together.
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let from: PlayerId = parse_id(&body.from_player_id)?;
    let to: PlayerId = parse_id(&body.to_player_id)?;
    Ok(Json(tokens::transfer_tokens(&state.store, from, to, body.amount).await?))
}

/// Redeem tokens for a reward.
pub async fn redeem(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RedeemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let player_id: PlayerId = parse_id(&body.player_id)?;
    let receipt = tokens::redeem_tokens(&state.store, player_id, &body.reward_id, body.amount).await?;
    Ok(Json(receipt))
}

/// Current balance.
pub async fn balance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(tokens::balance_of(&state.store, query.id()?).await?))
}

/// Ledger audit for one player.
pub async fn audit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = tokens::audit_player(&state.store, query.id()?).await?;
    Ok(Json(report))
}
