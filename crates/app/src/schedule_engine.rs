//! Schedule engine: turns a daily timetable into armed one-shot timers.
//!
//! Every call to [`ScheduleEngine::schedule`] first cancels all pending
//! timers, then arms one timer per prayer whose trigger instant (local time
//! plus offset) is still in the future. Instants that have already passed
//! are skipped for the day; there is no rollover to tomorrow.
//!
//! A firing timer hands the pulse to its own task, so a later `schedule`
//! cancels only timers that have not fired yet and never interrupts a pulse
//! that has started.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use tokio::task::JoinHandle;

use prayerbridge_domain::offset::OffsetConfig;
use prayerbridge_domain::prayer::PrayerKey;
use prayerbridge_domain::time::trigger_instant;
use prayerbridge_domain::timetable::DailyTimeSet;

use crate::actuator::Switchboard;
use crate::ports::{AccessorySink, Clock};

/// Fixed inputs of the engine, loaded once from configuration.
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub timezone: Tz,
    pub offsets: OffsetConfig,
    pub pulse_duration: Duration,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::London,
            offsets: OffsetConfig::default(),
            pulse_duration: Duration::from_secs(30),
        }
    }
}

/// A pulse the engine has armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPulse {
    pub prayer: PrayerKey,
    pub at: DateTime<Tz>,
}

struct ScheduledEvent {
    prayer: PrayerKey,
    at: DateTime<Tz>,
    timer: JoinHandle<()>,
}

impl ScheduledEvent {
    fn planned(&self) -> PlannedPulse {
        PlannedPulse {
            prayer: self.prayer,
            at: self.at,
        }
    }
}

/// Owns the live set of armed timers.
pub struct ScheduleEngine<C, S> {
    clock: C,
    settings: ScheduleSettings,
    switchboard: Arc<Switchboard<S>>,
    events: Mutex<Vec<ScheduledEvent>>,
}

impl<C, S> ScheduleEngine<C, S>
where
    C: Clock,
    S: AccessorySink + 'static,
{
    pub fn new(clock: C, switchboard: Arc<Switchboard<S>>, settings: ScheduleSettings) -> Self {
        Self {
            clock,
            settings,
            switchboard,
            events: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn switchboard(&self) -> &Arc<Switchboard<S>> {
        &self.switchboard
    }

    /// Replace all pending timers with the pulses for `times`.
    ///
    /// Must be called from within a tokio runtime. Returns the pulses that
    /// were armed.
    pub fn schedule(&self, times: &DailyTimeSet) -> Vec<PlannedPulse> {
        let timezone = self.settings.timezone;
        let mut events = self.lock_events();
        cancel(&mut events);

        let now = self.clock.now().with_timezone(&timezone);
        let today = now.date_naive();
        tracing::info!(date = %today, %timezone, "scheduling switch pulses");

        for (prayer, time) in times.iter() {
            let Some(time) = time else {
                tracing::warn!(%prayer, "missing time, skipping");
                continue;
            };
            let offset = self.settings.offsets.get(prayer);
            let Some(at) = trigger_instant(today, time, offset, timezone) else {
                tracing::warn!(%prayer, %time, "local time does not exist today, skipping");
                continue;
            };
            if at <= now {
                tracing::info!(%prayer, at = %at.to_rfc3339(), "already passed, skipping");
                continue;
            }
            let delay = (at - now).to_std().unwrap_or_default();
            tracing::info!(
                %prayer,
                at = %at.to_rfc3339(),
                in_minutes = delay.as_secs() / 60,
                "pulse armed"
            );
            let timer = self.arm(prayer, delay);
            events.push(ScheduledEvent { prayer, at, timer });
        }

        events.iter().map(ScheduledEvent::planned).collect()
    }

    /// Pulses whose timer has not fired yet.
    #[must_use]
    pub fn armed(&self) -> Vec<PlannedPulse> {
        self.lock_events()
            .iter()
            .filter(|event| !event.timer.is_finished())
            .map(ScheduledEvent::planned)
            .collect()
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&self) {
        cancel(&mut self.lock_events());
    }

    fn arm(&self, prayer: PrayerKey, delay: Duration) -> JoinHandle<()> {
        let actuator = Arc::clone(self.switchboard.get(prayer));
        let duration = self.settings.pulse_duration;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(async move {
                if let Err(err) = actuator.pulse(duration).await {
                    tracing::error!(%prayer, error = %err, "error pulsing switch");
                }
            });
        })
    }

    fn lock_events(&self) -> MutexGuard<'_, Vec<ScheduledEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C, S> Drop for ScheduleEngine<C, S> {
    fn drop(&mut self) {
        let events = self.events.get_mut().unwrap_or_else(PoisonError::into_inner);
        cancel(events);
    }
}

fn cancel(events: &mut Vec<ScheduledEvent>) {
    let pending = events.iter().filter(|e| !e.timer.is_finished()).count();
    for event in events.drain(..) {
        event.timer.abort();
    }
    if pending > 0 {
        tracing::debug!(pending, "cancelled pending pulse timers");
    }
}
