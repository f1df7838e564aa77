//! Quiz Timer - countdown timer service for timed quizzes
//!
//! This is the main entry point for the quiz-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use quiz_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::notice_sweeper_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("quiz_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting quiz-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, default duration={:?}min",
          config.host, config.port, config.duration);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.default_duration_seconds(),
    ));

    // Start the notice sweeper background task
    let sweeper_state = Arc::clone(&state);
    tokio::spawn(async move {
        notice_sweeper_task(sweeper_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /quiz              - Start a quiz and its timer");
    info!("  GET    /quiz              - Current quiz and timer display");
    info!("  POST   /quiz/submit       - Submit the current quiz");
    info!("  POST   /quiz/leave        - Leave the current quiz without submitting");
    info!("  GET    /notifications     - Active notices");
    info!("  DELETE /notifications/:id - Dismiss a notice");
    info!("  GET    /status            - Server status");
    info!("  GET    /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();

    info!("Server shutdown complete");
    Ok(())
}
