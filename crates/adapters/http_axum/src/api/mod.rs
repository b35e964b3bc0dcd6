//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod schedule;
#[allow(clippy::missing_errors_doc)]
pub mod switches;

use axum::Router;
use axum::routing::{get, post};

use prayerbridge_app::ports::{AccessorySink, Clock, PrayerTimesSource};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<F, C, S>() -> Router<AppState<F, C, S>>
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    Router::new()
        .route("/switches", get(switches::list::<F, C, S>))
        .route("/switches/{prayer}", get(switches::get::<F, C, S>))
        .route(
            "/switches/{prayer}/{service}",
            post(switches::call_service::<F, C, S>),
        )
        .route("/schedule", get(schedule::current::<F, C, S>))
        .route("/plan", post(schedule::plan::<F, C, S>))
}
