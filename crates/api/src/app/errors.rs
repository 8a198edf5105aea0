use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bizlens_ai::AiError;
use bizlens_core::DomainError;
use bizlens_infra::DataSourceError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn data_error_to_response(err: DataSourceError) -> axum::response::Response {
    match err {
        DataSourceError::Domain(e) => domain_error_to_response(e),
        DataSourceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DataSourceError::Status { status: 409, body } => json_error(StatusCode::CONFLICT, "conflict", body),
        e @ (DataSourceError::Transport(_) | DataSourceError::Status { .. } | DataSourceError::Decode(_)) => {
            tracing::warn!(error = %e, "backend call failed");
            json_error(StatusCode::BAD_GATEWAY, "backend_error", e.to_string())
        }
        DataSourceError::Poisoned => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "store lock poisoned",
        ),
    }
}

/// `RateLimited` is not an error for the client; callers handle it first.
pub fn ai_error_to_response(err: AiError) -> axum::response::Response {
    match err {
        AiError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AiError::NotConfigured => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "assistant_unavailable",
            "assistant is not configured",
        ),
        e => {
            tracing::warn!(error = %e, "assistant call failed");
            json_error(StatusCode::BAD_GATEWAY, "assistant_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_record_id(s: &str) -> Result<bizlens_core::RecordId, axum::response::Response> {
    s.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid record id"))
}
