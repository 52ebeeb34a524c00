//! Shared application state for the API server.

use chrono::{DateTime, Utc};

use oneheart_db::LedgerStore;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The store handle is cheap to clone and is the only state
/// shared between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The Ledger Store every service runs against.
    pub store: LedgerStore,
    /// Days of history returned by the player history endpoint.
    pub history_days: u32,
    /// Process start time, reported by the health endpoint.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// State over `store` with the default history window.
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            history_days: 30,
            started_at: Utc::now(),
        }
    }

    /// Override the history window.
    #[must_use]
    pub const fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }
}
