//! HTTP API for the `OneHeart` impact backend.
//!
//! This crate exposes the impact, token, and Worldwalker services as JSON
//! endpoints over Axum. Handlers are thin: they parse ids, validate the
//! request body with `validator`, call one service function, and map the
//! result through [`ApiError`].
//!
//! - [`handlers`] -- service info, players, and quests
//! - [`tokens`] -- transfers, redemption, balance, and audit
//! - [`worldwalker`] -- readiness, phases, expeditions, and missions
//! - [`startup`] -- store bootstrap used by the server binary
//!
//! [`ApiError`]: error::ApiError

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod tokens;
pub mod worldwalker;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, open_store};
pub use state::AppState;
