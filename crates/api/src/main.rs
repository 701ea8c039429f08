use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::config::AppConfig;
use api::{build_router, AppState};
use store::DocumentStore;
use suggest::HeuristicSuggester;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config);

    let vocabulary = store::load_vocabulary(&config.vocab_path)
        .context("Failed to load vocabulary")?;

    let store = DocumentStore::open(
        &config.annotations_dir,
        vocabulary,
        config.annotation_defaults(),
    )
    .context("Failed to open annotations directory")?;

    let suggester = HeuristicSuggester::builtin().context("Failed to build suggester")?;

    let state = Arc::new(AppState::new(
        store,
        Arc::new(suggester),
        config.raw_dir.clone(),
    ));

    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context(format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(
        env = %config.env,
        annotator = %config.annotator,
        annotations_dir = %config.annotations_dir.display(),
        "Server listening on http://{}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Flush everything that is loaded before exiting.
    let saved = state.store.save_all().context("Failed to save documents on shutdown")?;
    tracing::info!(count = saved, "Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
