//! # prayerbridged: prayer bridge daemon
//!
//! Composition root that wires all adapters together and runs the daily
//! schedule.
//!
//! ## Responsibilities
//! - Load configuration (TOML file, env vars) and initialise logging
//! - Publish the bridge and its five prayer switches
//! - Plan today immediately, then again on every daily trigger firing
//! - Serve the HTTP status/control API when enabled
//! - Shut down on Ctrl-C / SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use prayerbridge_adapter_http_axum::state::AppState;
use prayerbridge_adapter_lpt::LptClient;
use prayerbridge_adapter_virtual::VirtualBridge;
use prayerbridge_app::actuator::Switchboard;
use prayerbridge_app::planner::{DailyPlanner, PlanOutcome};
use prayerbridge_app::ports::SystemClock;
use prayerbridge_app::schedule_engine::ScheduleEngine;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Accessory bridge
    let switchboard = Arc::new(Switchboard::new(VirtualBridge::new()));
    switchboard.publish(&config.bridge_info()).await?;

    // Scheduling
    let settings = config.schedule_settings()?;
    tracing::info!(
        timezone = %settings.timezone,
        pulse_secs = settings.pulse_duration.as_secs(),
        cron = %config.schedule.daily_fetch_cron,
        "schedule configured"
    );
    let engine = Arc::new(ScheduleEngine::new(SystemClock, switchboard, settings));
    let source = LptClient::new(config.source.clone())?;
    let planner = Arc::new(DailyPlanner::new(source, engine, config.retry_interval()));

    match planner.plan_today().await {
        PlanOutcome::Scheduled { date, armed } => {
            tracing::info!(%date, armed = armed.len(), "initial plan scheduled");
        }
        PlanOutcome::RetryArmed { date, retry_in, .. } => {
            tracing::warn!(%date, retry_in_secs = retry_in.as_secs(), "initial plan deferred");
        }
    }

    let refresh = config.daily_trigger()?.spawn(Arc::clone(&planner));

    if config.server.enabled {
        let app = prayerbridge_adapter_http_axum::router::build(AppState::new(Arc::clone(&planner)));
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        tracing::info!("prayerbridged listening on http://{bind_addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        shutdown_signal().await;
    }

    refresh.abort();
    planner.engine().cancel_all();
    tracing::info!("prayerbridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
