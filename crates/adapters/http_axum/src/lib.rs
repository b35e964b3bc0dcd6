//! # prayerbridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Report switch states and the currently armed schedule as JSON
//! - Accept external on/off commands for a switch, the same way a paired
//!   controller writes the `On` characteristic
//! - Trigger a manual re-plan of the current day
//!
//! ## Routes
//!
//! | Method | Path | Effect |
//! |--------|------|--------|
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/switches` | All switch snapshots |
//! | `GET` | `/api/switches/{prayer}` | One switch snapshot |
//! | `POST` | `/api/switches/{prayer}/{service}` | `turn_on`, `turn_off` or `toggle` |
//! | `GET` | `/api/schedule` | Current timetable and armed pulses |
//! | `POST` | `/api/plan` | Run the daily planner now |
//!
//! ## Dependency rule
//! Depends on `prayerbridge-app` and `prayerbridge-domain`. Never leaks axum
//! types into either.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
