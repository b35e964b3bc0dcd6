//! # prayerbridge-domain
//!
//! Pure domain model for the prayerbridge switch scheduler.
//!
//! ## Responsibilities
//! - Foundational types: accessory identifiers, error conventions, timestamps
//! - Define **prayer keys** (the five daily events the bridge schedules around)
//! - Define **times of day** and the **daily timetable** produced by one fetch,
//!   including normalization of raw provider payloads and completeness checks
//! - Define **offsets** (per-prayer minute adjustments)
//! - Define **switch** and **bridge** descriptors exposed to accessory sinks
//! - Compute absolute trigger instants in a fixed timezone
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod bridge;
pub mod offset;
pub mod prayer;
pub mod switch;
pub mod time_of_day;
pub mod timetable;
