use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use pagetrace_core::{
    plan::{display_label, format_rupees},
    visitor::{abbreviate_hash, time_ago},
};

use crate::{
    auth::{
        jwt::{decode_session, encode_session},
        middleware::AdminContext,
        password::verify_password,
        session::{build_session_cookie, clear_session_cookie, session_token},
    },
    error::AppError,
    state::AppState,
};

const RECENT_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// GET /admin/login
// ---------------------------------------------------------------------------

/// `GET /admin/login`: render the login form, or skip straight to the
/// dashboard when a valid session already exists.
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if is_authenticated(&state, &headers).await {
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }
    Ok(Html(login_page(None)).into_response())
}

// ---------------------------------------------------------------------------
// POST /admin/login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// `POST /admin/login`: verify the submitted credentials.
///
/// Exact email match plus Argon2 verification against the configured hash.
/// Success sets the session cookie and redirects to the dashboard; failure
/// re-renders the form with an error.
#[tracing::instrument(skip(state, form))]
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let credentials_ok = form.email == state.config.admin_email
        && verify_password(&form.password, &state.config.admin_password_hash);

    if !credentials_ok {
        tracing::warn!(email = %form.email, "failed admin login attempt");
        return Ok(Html(login_page(Some("Invalid email or password"))).into_response());
    }

    let secret = state.db.ensure_session_secret().await?;
    let (token, _expires_at) =
        encode_session(&secret, &form.email, state.config.session_days)?;
    let cookie = build_session_cookie(&token, state.config.https, state.config.session_days);

    tracing::info!(email = %form.email, "admin logged in");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to("/admin/dashboard"),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// GET /admin/logout
// ---------------------------------------------------------------------------

/// `GET /admin/logout`: clear the session cookie, back to the login form.
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.config.https);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/admin/login"))
}

// ---------------------------------------------------------------------------
// GET /admin/dashboard
// ---------------------------------------------------------------------------

/// `GET /admin/dashboard`: headline stats, recent activity, and the
/// per-plan breakdown. All numbers are computed fresh per request.
#[tracing::instrument(skip(state, ctx))]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AdminContext>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let stats = state.db.dashboard_stats().await?;

    let top_plan = match state.db.top_plan().await? {
        Some(top) => format!("{} ({} clicks)", display_label(&top.plan), top.clicks),
        None => "No clicks yet".to_string(),
    };

    let recent_visitors: Vec<_> = state
        .db
        .visitors_by_recency(Some(RECENT_LIMIT))
        .await?
        .into_iter()
        .map(|v| {
            json!({
                "visitor_id": v.visitor_id,
                "time": v.last_visit.format("%H:%M").to_string(),
                "time_ago": time_ago(v.last_visit, now),
                "source": v.source,
                "clicks": v.clicks,
            })
        })
        .collect();

    let recent_clicks: Vec<_> = state
        .db
        .clicks_by_recency(Some(RECENT_LIMIT))
        .await?
        .into_iter()
        .map(|c| {
            json!({
                "plan": c.plan,
                "visitor_id": c.visitor_id,
                "time_ago": time_ago(c.created_at, now),
                "ip_hash": abbreviate_hash(&c.ip_hash),
            })
        })
        .collect();

    let plan_stats: Vec<_> = state
        .db
        .plan_breakdown()
        .await?
        .into_iter()
        .map(|p| {
            json!({
                "plan": display_label(&p.plan),
                "count": p.count,
                "percentage": p.percentage,
                "revenue": format_rupees(p.revenue),
            })
        })
        .collect();

    Ok(Json(json!({
        "data": {
            "admin_email": ctx.email,
            "current_time": now.format("%H:%M").to_string(),
            "stats": {
                "total_visitors": stats.total_visitors,
                "total_clicks": stats.total_clicks,
                "today_visitors": stats.today_visitors,
                "today_clicks": stats.today_clicks,
                "conversion_rate": stats.conversion_rate,
                "top_plan": top_plan,
            },
            "recent_visitors": recent_visitors,
            "recent_clicks": recent_clicks,
            "plan_stats": plan_stats,
        }
    })))
}

// ---------------------------------------------------------------------------
// GET /admin/visitors
// ---------------------------------------------------------------------------

/// `GET /admin/visitors`: every visitor, newest activity first.
#[tracing::instrument(skip(state, ctx))]
pub async fn visitors(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AdminContext>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let visitors: Vec<_> = state
        .db
        .visitors_by_recency(None)
        .await?
        .into_iter()
        .map(|v| {
            json!({
                "id": v.visitor_id,
                "ip": abbreviate_hash(&v.ip_hash),
                "source": v.source,
                "first_visit": v.first_visit.format("%Y-%m-%d %H:%M").to_string(),
                "last_visit": time_ago(v.last_visit, now),
                "clicks": v.clicks,
                "is_returning": v.clicks > 0,
            })
        })
        .collect();

    Ok(Json(json!({
        "data": {
            "admin_email": ctx.email,
            "visitors": visitors,
        }
    })))
}

// ---------------------------------------------------------------------------
// GET /admin/clicks
// ---------------------------------------------------------------------------

/// `GET /admin/clicks`: every click, newest first.
#[tracing::instrument(skip(state, ctx))]
pub async fn clicks(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AdminContext>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let clicks: Vec<_> = state
        .db
        .clicks_by_recency(None)
        .await?
        .into_iter()
        .map(|c| {
            json!({
                "id": c.click_id,
                "visitor_id": c.visitor_id,
                "plan": display_label(&c.plan),
                "time": c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                "time_ago": time_ago(c.created_at, now),
                "ip": abbreviate_hash(&c.ip_hash),
            })
        })
        .collect();

    Ok(Json(json!({
        "data": {
            "admin_email": ctx.email,
            "clicks": clicks,
        }
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    let token = match session_token(headers) {
        Some(t) => t,
        None => return false,
    };
    let secret = match state.db.get_setting("session_secret").await {
        Ok(Some(s)) => s,
        _ => return false,
    };
    decode_session(&token, &secret).is_ok()
}

/// Minimal unbranded login form. Thin glue: full page design is out of
/// scope for this service.
fn login_page(error: Option<&str>) -> String {
    let error_html = match error {
        Some(msg) => format!(r#"<p class="error">{msg}</p>"#),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Login</title><meta name="viewport" content="width=device-width, initial-scale=1.0"></head>
<body>
    <h2>Login to Dashboard</h2>
    {error_html}
    <form method="POST" action="/admin/login">
        <label>Email <input type="email" name="email" required></label>
        <label>Password <input type="password" name="password" required></label>
        <button type="submit">Sign In</button>
    </form>
    <a href="/">&larr; Back to Home</a>
</body>
</html>
"#
    )
}
