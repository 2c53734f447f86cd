use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use sims_auth::AuthError;
use sims_core::DomainError;
use sims_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::InsufficientStock { requested, available }) => {
            tracing::debug!(requested, available, "insufficient stock");
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", "Insufficient stock quantity")
        }
        ServiceError::Domain(e @ DomainError::NotFound(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        ServiceError::Auth(AuthError::InvalidCredentials) => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "Invalid credentials")
        }
        ServiceError::Auth(AuthError::Unauthenticated) => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "Authentication required")
        }
        ServiceError::Auth(e @ (AuthError::Hash(_) | AuthError::SessionStore(_))) => {
            internal_error(e.to_string())
        }
        ServiceError::Storage(msg) => internal_error(msg),
    }
}

fn internal_error(detail: String) -> axum::response::Response {
    tracing::error!(error = %detail, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "database_error", "Database error")
}

/// Malformed or missing JSON bodies are validation errors.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_failure_is_a_server_error() {
        let res = service_error_to_response(AuthError::SessionStore("session lock poisoned".into()).into());
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_session_is_unauthorized() {
        let res = service_error_to_response(AuthError::Unauthenticated.into());
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
