//! # Inkwell Blog Server
//!
//! Multi-author blog served over Actix-web.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod content;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Inkwell blog server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::build(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application state");
        std::io::Error::other(e.to_string())
    })?;

    #[cfg(feature = "scheduler")]
    let mut sweeper = background::start_session_sweeper(
        &background::SchedulerConfig::from_app(&config),
        state.auth.clone(),
        state.login_limiter.clone(),
    )
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))?;

    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(|cfg| handlers::configure_app(cfg, &app_state))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Some(scheduler) = sweeper.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
