use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Html};

use pagetrace_core::{source::detect_source, visitor::hash_ip};

use crate::{
    error::AppError,
    routes::track::{extract_client_ip, referrer_header, user_agent_header, MaybeConnectInfo},
    state::AppState,
};

// Thin placeholder markup; real page design lives outside this service.
const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Home</title><meta name="viewport" content="width=device-width, initial-scale=1.0"></head>
<body>
    <h1>Choose your plan</h1>
    <button data-plan="plan_99">Buy &#8377;99</button>
    <button data-plan="plan_149">Buy &#8377;149</button>
    <button data-plan="plan_199">Buy &#8377;199</button>
    <script>
        document.querySelectorAll('button[data-plan]').forEach(function (btn) {
            btn.addEventListener('click', function () {
                fetch('/track', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ plan: btn.dataset.plan })
                });
            });
        });
    </script>
</body>
</html>
"#;

/// `GET /`: tracks the visitor, returns the landing page.
///
/// Every request creates or refreshes the Visitor row for the hashed client
/// address before the page is served.
#[tracing::instrument(skip(state, headers))]
pub async fn home(
    State(state): State<Arc<AppState>>,
    maybe_connect_info: MaybeConnectInfo,
    headers: HeaderMap,
) -> Result<Html<&'static str>, AppError> {
    let client_ip = extract_client_ip(&headers, maybe_connect_info.0);
    let ip_hash = hash_ip(&client_ip);
    let referrer = referrer_header(&headers);
    let user_agent = user_agent_header(&headers);
    let source = detect_source(referrer.as_deref().unwrap_or(""));

    let visit = state
        .db
        .record_visit(&ip_hash, user_agent.as_deref(), referrer.as_deref(), source.as_str())
        .await?;

    tracing::info!(
        visitor_id = %visit.visitor_id,
        source = %source,
        new_visitor = visit.new_visitor,
        "visitor tracked"
    );

    Ok(Html(LANDING_HTML))
}

/// `GET /coming-soon`: static placeholder.
pub async fn coming_soon() -> Html<&'static str> {
    Html("<h1>Coming Soon</h1>")
}
