//! mctools cache server
//!
//! Serves the configured cache strategy over HTTP, with startup and shutdown
//! work driven by a [`Lifespan`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mctools::api::create_router;
use mctools::{spawn_cleanup_task, AppState, Config, Lifespan};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache façade over the configured strategy
/// 4. Register lifespan events (cleanup task start/stop)
/// 5. Bind the HTTP listener and serve inside the lifespan
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mctools=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mctools cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={}, maxsize={}, port={}, cleanup_interval={}s, lifespan_timeout={:?}",
        config.backend.as_str(),
        config.maxsize,
        config.server_port,
        config.cleanup_interval,
        config.lifespan_timeout
    );

    let state = AppState::from_config(&config).context("failed to build cache backend")?;
    info!("Cache backend initialized");

    let mut lifespan = match config.lifespan_timeout {
        Some(limit) => Lifespan::with_timeout(limit),
        None => Lifespan::new(),
    };
    register_cleanup_events(&mut lifespan, &state, config.cleanup_interval);
    lifespan.set_states(serde_json::json!({
        "backend": config.backend.as_str(),
        "maxsize": config.maxsize,
    }));
    let state = state.with_states(lifespan.states()?.cloned());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    lifespan.run(async { server.await }).await??;

    info!("Server shutdown complete");
    Ok(())
}

/// Starts the TTL sweeper on startup and aborts it on shutdown.
///
/// Only the in-process store needs sweeping; Redis expires keys itself.
fn register_cleanup_events(lifespan: &mut Lifespan, state: &AppState, interval_secs: u64) {
    let Some(store) = state.memory.clone() else {
        return;
    };

    let handle: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));

    let startup_handle = handle.clone();
    lifespan.on_startup_async(move || {
        let store = store.clone();
        let handle = startup_handle.clone();
        async move {
            *handle.lock().await = Some(spawn_cleanup_task(store, interval_secs));
            info!("Background cleanup task started");
            Ok(())
        }
    });

    lifespan.on_shutdown_async(move || {
        let handle = handle.clone();
        async move {
            if let Some(task) = handle.lock().await.take() {
                task.abort();
                warn!("Cleanup task aborted");
            }
            Ok(())
        }
    });
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
