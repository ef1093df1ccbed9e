use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{auth, routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// The three admin views sit behind [`auth::middleware::require_admin`],
/// which redirects to the login form when no valid session cookie is
/// present. `TraceLayer` gives structured request/response logging via
/// `tracing` for every route.
pub fn build_app(state: Arc<AppState>) -> Router {
    let admin_views = Router::new()
        .route("/admin/dashboard", get(routes::admin::dashboard))
        .route("/admin/visitors", get(routes::admin::visitors))
        .route("/admin/clicks", get(routes::admin::clicks))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::middleware::require_admin,
        ));

    Router::new()
        .route("/", get(routes::home::home))
        .route("/coming-soon", get(routes::home::coming_soon))
        .route("/track", post(routes::track::track))
        .route("/health", get(routes::health::health))
        .route(
            "/admin/login",
            get(routes::admin::login_form).post(routes::admin::login_submit),
        )
        .route("/admin/logout", get(routes::admin::logout))
        .merge(admin_views)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
