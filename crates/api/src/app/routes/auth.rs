use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;
use crate::middleware;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    let session = match services.gate.login(&body.username, &body.password).await {
        Ok(s) => s,
        Err(e) => return errors::service_error_to_response(e),
    };

    let cookie = middleware::session_cookie(session.id, services.session_ttl(), services.cookie_secure);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "message": "Login successful",
            "username": session.username,
        })),
    )
        .into_response()
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    services.gate.logout(&session.session_id());
    tracing::info!(user_id = %session.user_id(), username = session.username(), "logged out");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, middleware::clear_session_cookie(services.cookie_secure))],
        Json(json!({ "message": "Logout successful" })),
    )
        .into_response()
}

/// Public: reports whether the request carries a live session.
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let session = middleware::extract_session_id(&headers).and_then(|id| services.gate.check(&id));
    let body = match session {
        Some(s) => json!({ "authenticated": true, "username": s.username }),
        None => json!({ "authenticated": false }),
    };
    (StatusCode::OK, Json(body)).into_response()
}
