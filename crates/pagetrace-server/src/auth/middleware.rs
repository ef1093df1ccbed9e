use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

use super::jwt::decode_session;
use super::session::session_token;

/// Request-scoped authentication context, injected into request extensions
/// by [`require_admin`] after a successful session check. Handlers read it
/// via `Extension<AdminContext>`.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub email: String,
}

/// Gate for the admin views.
///
/// A valid session cookie lets the request through with an [`AdminContext`]
/// attached; anything else is answered with a redirect to the login form,
/// since these are browser pages rather than API endpoints.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        match state.db.get_setting("session_secret").await {
            Ok(Some(secret)) => {
                if let Ok(claims) = decode_session(&token, &secret) {
                    request
                        .extensions_mut()
                        .insert(AdminContext { email: claims.sub });
                    return next.run(request).await;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "session secret lookup failed");
            }
        }
    }

    Redirect::to("/admin/login").into_response()
}
