use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: String,
}

/// Session user for routes that serve anonymous viewers too.
#[derive(Clone, Debug)]
pub struct MaybeSessionUser(pub Option<SessionUser>);

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
}

fn session_from_request(request: &Request) -> Option<SessionUser> {
    // Extract the access token cookie
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("access_token="))
                .and_then(|c| c.strip_prefix("access_token="))
        })?;

    // Parse JWT payload (middle part)
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let payload = serde_json::from_slice::<JwtPayload>(&payload_bytes).ok()?;
    Some(SessionUser { id: payload.sub })
}

pub async fn require_session(mut request: Request, next: Next) -> Response {
    match session_from_request(&request) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => AppError::Unauthorized("Please login".to_string()).into_response(),
    }
}

pub async fn optional_session(mut request: Request, next: Next) -> Response {
    let session = session_from_request(&request);
    request.extensions_mut().insert(MaybeSessionUser(session));
    next.run(request).await
}

/// Gate for the public REST API. Without a configured key every request
/// is rejected.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|hv| hv.to_str().ok());

    match (&state.config.api_key, presented) {
        (Some(expected), Some(key)) if expected == key => next.run(request).await,
        _ => AppError::Unauthorized("Invalid API key".to_string()).into_response(),
    }
}
