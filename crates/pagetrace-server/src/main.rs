use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use pagetrace_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagetrace=info".parse()?),
        )
        .json()
        .init();

    let cfg = pagetrace_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Ensure data directory exists before opening DuckDB. The database file
    // is opened in place, never deleted on startup.
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/pagetrace.db", cfg.data_dir);
    let db = pagetrace_duckdb::DuckDbBackend::open(&db_path, &cfg.duckdb_memory_limit)?;

    match db.ensure_session_secret().await {
        Ok(_) => info!("Session secret ready"),
        Err(e) => tracing::error!(error = %e, "Failed to ensure session secret"),
    }
    info!(admin_email = %cfg.admin_email, "Admin login configured");

    let state = Arc::new(AppState::new(db, cfg.clone()));
    let app = pagetrace_server::app::build_app(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", cfg.port);
    info!(port = cfg.port, "pagetrace listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        tokio::signal::ctrl_c().await.ok();
    })
    .await?;

    Ok(())
}
