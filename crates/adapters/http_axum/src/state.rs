//! Shared application state for axum handlers.

use std::sync::Arc;

use prayerbridge_app::actuator::Switchboard;
use prayerbridge_app::planner::DailyPlanner;
use prayerbridge_app::ports::{AccessorySink, Clock, PrayerTimesSource};
use prayerbridge_app::schedule_engine::ScheduleEngine;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the source, clock and sink types do
/// not need to be `Clone`; only the `Arc` is cloned.
pub struct AppState<F, C, S> {
    /// Planner, and through it the schedule engine and switchboard.
    pub planner: Arc<DailyPlanner<F, C, S>>,
}

impl<F, C, S> Clone for AppState<F, C, S> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}

impl<F, C, S> AppState<F, C, S>
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    /// Wrap a planner already shared with background tasks.
    pub fn new(planner: Arc<DailyPlanner<F, C, S>>) -> Self {
        Self { planner }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<ScheduleEngine<C, S>> {
        self.planner.engine()
    }

    #[must_use]
    pub fn switchboard(&self) -> &Arc<Switchboard<S>> {
        self.planner.engine().switchboard()
    }
}
