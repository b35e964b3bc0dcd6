//! # prayerbridge-adapter-lpt
//!
//! HTTP implementation of the [`PrayerTimesSource`] port.
//!
//! One call to [`LptClient::fetch`] performs a single `GET` against the
//! configured endpoint, bounded by a timeout that covers both headers and
//! body. There is no retry here; the planner owns retry policy.
//!
//! ```text
//! GET <api_url>?format=json&key=<api_key>&city=<city>&24hours=true&date=YYYY-MM-DD
//! ```
//!
//! ## Dependency rule
//!
//! Depends on `prayerbridge-app` (port traits) and `prayerbridge-domain` only.
//!
//! [`PrayerTimesSource`]: prayerbridge_app::ports::PrayerTimesSource

mod client;
pub mod config;

pub use client::LptClient;
pub use config::LptConfig;
