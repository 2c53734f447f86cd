use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Duration;

use sims_auth::{AuthError, SessionId};
use sims_infra::SessionGate;

use crate::app::errors;
use crate::context::SessionContext;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sims.sid";

#[derive(Clone)]
pub struct SessionState {
    pub gate: SessionGate,
}

/// Reject requests without a live session; attach [`SessionContext`] otherwise.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let session = extract_session_id(req.headers())
        .and_then(|id| state.gate.check(&id))
        .ok_or_else(|| errors::service_error_to_response(AuthError::Unauthenticated.into()))?;

    req.extensions_mut().insert(SessionContext::from(session));

    Ok(next.run(req).await)
}

/// Session id from the `Cookie` header, if present and well formed.
pub fn extract_session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// `Set-Cookie` value issuing the session cookie.
pub fn session_cookie(id: SessionId, ttl: Duration, secure: bool) -> HeaderValue {
    cookie_header(&id.to_string(), ttl.num_seconds(), secure)
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    cookie_header("", 0, secure)
}

fn cookie_header(value: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    // Session ids are hex and the rest is fixed ASCII.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("sims.sid=; Path=/; Max-Age=0"))
}
