//! Error types for the server binary.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: oneheart_core::ConfigError,
    },

    /// The store could not be prepared.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: oneheart_api::StartupError,
    },

    /// The HTTP server failed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: oneheart_api::ServerError,
    },
}
