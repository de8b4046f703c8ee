//! Background maintenance.

mod scheduler;

pub use scheduler::{Scheduler, SchedulerConfig};

use std::sync::Arc;

use inkwell_core::ports::RateLimiter;
use inkwell_core::services::AuthService;
use tokio_cron_scheduler::JobSchedulerError;

/// Start the scheduler with the maintenance sweep registered.
///
/// Returns `None` when scheduling is switched off.
pub async fn start_session_sweeper(
    config: &SchedulerConfig,
    auth: AuthService,
    login_limiter: Option<Arc<dyn RateLimiter>>,
) -> Result<Option<Scheduler>, JobSchedulerError> {
    if !config.enabled {
        tracing::info!("Scheduler disabled");
        return Ok(None);
    }

    let scheduler = Scheduler::new().await?;
    scheduler
        .add_cron("session-sweep", &config.session_sweep, move || {
            let auth = auth.clone();
            let login_limiter = login_limiter.clone();
            async move { run_maintenance(&auth, login_limiter.as_deref()).await }
        })
        .await?;
    scheduler.start().await?;

    Ok(Some(scheduler))
}

/// One sweep: drop expired sessions and idle throttle state.
pub async fn run_maintenance(auth: &AuthService, login_limiter: Option<&dyn RateLimiter>) {
    if let Err(e) = auth.purge_expired_sessions().await {
        tracing::warn!(error = %e, "Session sweep failed");
    }
    if let Some(limiter) = login_limiter {
        limiter.shrink();
    }
}
