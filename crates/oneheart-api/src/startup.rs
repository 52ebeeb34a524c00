//! Store bootstrap for the server binary.
//!
//! [`open_store`] turns the database section of the configuration into a
//! ready [`LedgerStore`]: connect, migrate, and optionally seed the demo
//! roster.

use std::time::Duration;

use tracing::{info, warn};

use oneheart_core::config::{DatabaseConfig, StoreBackend};
use oneheart_core::seed::seed_demo_data;
use oneheart_core::ServiceError;
use oneheart_db::{DbError, LedgerStore, PostgresConfig, PostgresPool};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while preparing the store.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Connecting or migrating failed.
    #[error("store startup failed: {0}")]
    Store(#[from] DbError),

    /// Seeding the demo roster failed.
    #[error("demo seed failed: {0}")]
    Seed(#[from] ServiceError),
}

/// Open the configured store.
///
/// # Errors
///
/// Returns [`StartupError::Store`] if `PostgreSQL` is unreachable or a
/// migration fails, and [`StartupError::Seed`] if seeding fails.
pub async fn open_store(config: &DatabaseConfig) -> Result<LedgerStore, StartupError> {
    let store = match config.backend {
        StoreBackend::Memory => {
            warn!("using the in-memory store; state is lost on exit");
            LedgerStore::memory()
        }
        StoreBackend::Postgres => {
            let pg_config = PostgresConfig::new(&config.postgres_url)
                .with_max_connections(config.max_connections)
                .with_connect_timeout(CONNECT_TIMEOUT);
            let pool = PostgresPool::connect(&pg_config).await?;
            if config.run_migrations {
                pool.run_migrations().await?;
                info!("migrations applied");
            }
            LedgerStore::Postgres(pool)
        }
    };
    info!(backend = store.name(), "store ready");

    if config.seed_demo_data {
        seed_demo_data(&store).await?;
    }
    Ok(store)
}
