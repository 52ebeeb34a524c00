//! Error types for the HTTP API.
//!
//! [`ApiError`] wraps service failures and request problems and converts
//! into a JSON response `{ "error", "code", "status" }` via its
//! [`IntoResponse`] implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use oneheart_core::ServiceError;
use oneheart_ledger::LedgerError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A service call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request body failed field validation.
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// An identifier in the path, query, or body is not a UUID.
    #[error("invalid id: {0}")]
    InvalidId(String),
}

const fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::ZeroAmount
        | LedgerError::NegativeAmount { .. }
        | LedgerError::MissingField(_)
        | LedgerError::InvalidSide { .. } => StatusCode::BAD_REQUEST,
        LedgerError::InsufficientBalance { .. } => StatusCode::CONFLICT,
        LedgerError::Overflow => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Requirement(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::InsufficientBalance { .. } | ServiceError::MaxPhase { .. } => {
                    StatusCode::CONFLICT
                }
                ServiceError::Ledger(inner) => ledger_status(inner),
                ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Service(err) => err.code(),
            Self::Validation(_) => "validation_error",
            Self::InvalidId(_) => "invalid_id",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::not_found("player", "x"), StatusCode::NOT_FOUND),
            (ServiceError::Validation("bad".to_owned()), StatusCode::BAD_REQUEST),
            (ServiceError::Requirement("level".to_owned()), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ServiceError::InsufficientBalance { balance: 1, required: 2 },
                StatusCode::CONFLICT,
            ),
            (ServiceError::MaxPhase { phase: 4 }, StatusCode::CONFLICT),
            (ServiceError::Ledger(LedgerError::ZeroAmount), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn codes_come_from_the_service_error() {
        let err = ApiError::from(ServiceError::MaxPhase { phase: 4 });
        assert_eq!(err.code(), "max_phase");
        assert_eq!(ApiError::InvalidId("x".to_owned()).code(), "invalid_id");
    }
}
