use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{request::Parts, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use pagetrace_core::{source::detect_source, visitor::hash_ip};

use crate::{error::AppError, state::AppState};

/// The tracking payload for `POST /track`. A bare `{}` is accepted; the
/// plan then defaults to `"unknown"`.
#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub plan: Option<String>,
}

/// `POST /track`: record one buy-button click.
///
/// If no visitor exists yet for the requesting address, one is created
/// first; visitor and click are persisted together. The body is read as raw
/// bytes and parsed by hand so that an empty or malformed body maps to the
/// documented `{"success": false, "error": …}` shape rather than the
/// extractor's default rejection.
#[tracing::instrument(skip(state, headers, body))]
pub async fn track(
    State(state): State<Arc<AppState>>,
    maybe_connect_info: MaybeConnectInfo,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("no tracking payload received".to_string()));
    }
    let req: TrackRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("invalid tracking payload: {e}")))?;
    let plan = req.plan.unwrap_or_else(|| "unknown".to_string());

    let client_ip = extract_client_ip(&headers, maybe_connect_info.0);
    let ip_hash = hash_ip(&client_ip);
    let referrer = referrer_header(&headers);
    let user_agent = user_agent_header(&headers);
    let source = detect_source(referrer.as_deref().unwrap_or(""));

    let receipt = state
        .db
        .track_click(
            &ip_hash,
            user_agent.as_deref(),
            referrer.as_deref(),
            source.as_str(),
            &plan,
        )
        .await?;

    tracing::info!(
        visitor_id = %receipt.visitor_id,
        click_id = %receipt.click_id,
        plan = %plan,
        new_visitor = receipt.new_visitor,
        "buy click tracked"
    );

    let message = if receipt.new_visitor {
        "New visitor and click tracked"
    } else {
        "Click tracked successfully"
    };
    Ok(Json(json!({
        "success": true,
        "visitor_id": receipt.visitor_id,
        "plan": plan,
        "message": message,
    })))
}

// ---------------------------------------------------------------------------
// Client address helpers (shared with the landing-page tracker)
// ---------------------------------------------------------------------------

/// The TCP peer address, when the server was started with
/// `into_make_service_with_connect_info`. Absent under `tower::oneshot` in
/// tests, hence the infallible optional extractor.
#[derive(Debug, Clone, Copy)]
pub struct MaybeConnectInfo(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for MaybeConnectInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        Ok(Self(addr))
    }
}

/// Resolve the client address: first `X-Forwarded-For` entry when present,
/// else the TCP peer address, else the loopback placeholder.
pub fn extract_client_ip(headers: &HeaderMap, remote: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| remote.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

pub fn referrer_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn user_agent_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
