//! Daily planner: fetch, normalize, validate and schedule today's pulses.
//!
//! A failed attempt never escapes: the planner logs it and starts a retry
//! chain that re-attempts at a fixed interval until one succeeds. The chain
//! is not cancelled when a later [`DailyPlanner::plan_today`] succeeds, so a
//! pending chain still performs one more (redundant) fetch and re-schedule
//! before it ends.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;

use prayerbridge_domain::error::PrayerBridgeError;
use prayerbridge_domain::time::local_date;
use prayerbridge_domain::timetable::DailyTimeSet;

use crate::ports::{AccessorySink, Clock, PrayerTimesSource};
use crate::schedule_engine::{PlannedPulse, ScheduleEngine};

/// The timetable currently scheduled and the day it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub times: DailyTimeSet,
}

/// Result of a [`DailyPlanner::plan_today`] call.
#[derive(Debug)]
pub enum PlanOutcome {
    /// Today's timetable was fetched and the listed pulses armed.
    Scheduled {
        date: NaiveDate,
        armed: Vec<PlannedPulse>,
    },
    /// The attempt failed; a retry chain was started.
    RetryArmed {
        date: NaiveDate,
        error: PrayerBridgeError,
        retry_in: Duration,
    },
}

impl PlanOutcome {
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }
}

/// Orchestrates one day's planning on top of a [`ScheduleEngine`].
pub struct DailyPlanner<F, C, S> {
    source: F,
    engine: Arc<ScheduleEngine<C, S>>,
    retry_interval: Duration,
    current: Mutex<Option<DailyPlan>>,
    attempts: AtomicU64,
}

impl<F, C, S> DailyPlanner<F, C, S>
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    pub fn new(source: F, engine: Arc<ScheduleEngine<C, S>>, retry_interval: Duration) -> Self {
        Self {
            source,
            engine,
            retry_interval,
            current: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<ScheduleEngine<C, S>> {
        &self.engine
    }

    /// The most recently scheduled timetable.
    #[must_use]
    pub fn current(&self) -> Option<DailyPlan> {
        self.lock_current().clone()
    }

    /// Number of fetches attempted since start.
    #[must_use]
    pub fn fetch_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Plan the current day in the configured timezone.
    ///
    /// On failure a retry chain is spawned and [`PlanOutcome::RetryArmed`]
    /// is returned; the error is never propagated.
    pub async fn plan_today(self: &Arc<Self>) -> PlanOutcome {
        let date = self.today();
        match self.attempt(date).await {
            Ok(armed) => PlanOutcome::Scheduled { date, armed },
            Err(error) => {
                tracing::error!(%date, error = %error, "planning failed");
                tracing::info!(
                    retry_in_minutes = self.retry_interval.as_secs() / 60,
                    "fetch retry armed"
                );
                self.spawn_retry();
                PlanOutcome::RetryArmed {
                    date,
                    error,
                    retry_in: self.retry_interval,
                }
            }
        }
    }

    fn spawn_retry(self: &Arc<Self>) {
        let planner = Arc::clone(self);
        tokio::spawn(async move { planner.retry_until_planned().await });
    }

    async fn retry_until_planned(&self) {
        loop {
            tokio::time::sleep(self.retry_interval).await;
            let date = self.today();
            match self.attempt(date).await {
                Ok(armed) => {
                    tracing::info!(%date, armed = armed.len(), "retry succeeded");
                    return;
                }
                Err(error) => {
                    tracing::error!(
                        %date,
                        error = %error,
                        retry_in_minutes = self.retry_interval.as_secs() / 60,
                        "retry failed"
                    );
                }
            }
        }
    }

    async fn attempt(&self, date: NaiveDate) -> Result<Vec<PlannedPulse>, PrayerBridgeError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let raw = self.source.fetch(date).await?;
        let times = DailyTimeSet::normalize(&raw);
        times.validate()?;
        tracing::info!(%date, %times, "prayer times for today");

        *self.lock_current() = Some(DailyPlan {
            date,
            times: times.clone(),
        });
        Ok(self.engine.schedule(&times))
    }

    fn today(&self) -> NaiveDate {
        local_date(self.engine.clock().now(), self.engine.settings().timezone)
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<DailyPlan>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
