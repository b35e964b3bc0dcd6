//! # prayerbridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PrayerTimesSource`: fetch one day's raw timetable
//!   - `AccessorySink`: publish switches and mirror their on/off state
//!   - `Clock`: current instant, replaceable in tests
//! - Provide the **use-cases**:
//!   - `SwitchActuator` / `Switchboard`: per-prayer pulse state machines
//!   - `ScheduleEngine`: turn a daily timetable into armed one-shot timers
//!   - `DailyPlanner`: fetch → normalize → validate → schedule, with retry
//!   - `DailyTrigger`: cron-driven daily re-plan
//!
//! ## Dependency rule
//! Depends on `prayerbridge-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actuator;
pub mod daily_trigger;
pub mod planner;
pub mod ports;
pub mod schedule_engine;
