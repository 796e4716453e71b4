//! StudyHub notification agent.
//!
//! Main entry point that wires the broker connection, the observable
//! notification feed, and the overlay presentation layer together and
//! runs until shutdown.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use studyhub_broker::BrokerClient;
use studyhub_client::HttpNotificationBackend;
use studyhub_core::config::AppConfig;
use studyhub_core::error::AppError;
use studyhub_core::session::{SessionContext, UserRole};
use studyhub_notify::{NotificationDispatcher, NotificationFeed};
use studyhub_overlay::{OverlayStack, TracingNavigator, TracingRenderer};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Agent error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("STUDYHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main agent run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StudyHub agent v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Session context ──────────────────────────────────
    // Explicit context instead of ambient session state.
    let session = session_from_env();

    // ── Step 2: REST collaborator + observable feed ──────────────
    let backend = Arc::new(HttpNotificationBackend::new(&config.api)?);
    let feed = Arc::new(NotificationFeed::new(backend));

    // ── Step 3: Transient presentation layer ─────────────────────
    let overlays = Arc::new(OverlayStack::new(
        config.overlay.clone(),
        Arc::new(TracingRenderer),
        Arc::new(TracingNavigator),
    ));

    // Warm the feed with the server-side list. A dead collaborator is
    // not fatal for the live pipeline.
    if let Err(e) = feed.refresh(&session).await {
        tracing::warn!(error = %e, "Initial notification fetch failed");
    }

    // ── Step 4: Broker connection with the dispatcher subscribed ─
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&feed),
        Arc::clone(&overlays),
    ));
    let client = BrokerClient::connect(config.broker.clone());
    client.subscribe(config.broker.notification_topic.clone(), dispatcher);
    client.activate();

    tracing::info!(
        endpoint = %config.broker.endpoint,
        topic = %config.broker.notification_topic,
        user = %session.username,
        "Notification pipeline running"
    );

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, tearing down...");

    client.shutdown();
    overlays.shutdown();

    tracing::info!("StudyHub agent shut down gracefully");
    Ok(())
}

/// Build the session context from the environment
fn session_from_env() -> SessionContext {
    let user_id = std::env::var("STUDYHUB_USER_ID").unwrap_or_else(|_| "local".to_string());
    let username = std::env::var("STUDYHUB_USERNAME").unwrap_or_else(|_| user_id.clone());
    let role = match std::env::var("STUDYHUB_ROLE").as_deref() {
        Ok("admin") => UserRole::Admin,
        Ok("instructor") => UserRole::Instructor,
        _ => UserRole::Student,
    };
    SessionContext::new(user_id, username, role)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
