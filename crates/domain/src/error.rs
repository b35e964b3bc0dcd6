//! Common error types used across the workspace.
//!
//! Each failure family has its own typed error; [`PrayerBridgeError`] is the
//! umbrella used at port boundaries and converts from each of them via
//! `#[from]`.

use std::time::Duration;

use crate::prayer::PrayerKey;

/// Boxed source error carried by IO-flavoured variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for prayerbridge operations.
#[derive(Debug, thiserror::Error)]
pub enum PrayerBridgeError {
    /// Fetching the day's raw timetable failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched timetable is missing one or more prayers.
    #[error(transparent)]
    IncompleteSchedule(#[from] IncompleteScheduleError),

    /// A caller supplied an invalid name or value.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The accessory sink rejected a publish or state update.
    #[error("accessory sink error")]
    Accessory(#[source] BoxError),
}

/// A required setting is absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{name}`")]
    MissingSetting { name: &'static str },
}

/// Why a single fetch of the remote timetable failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Credentials or endpoint are missing; no request was sent.
    #[error("fetch not attempted: {0}")]
    Config(#[from] ConfigError),

    /// The request did not complete in time and was aborted.
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// The remote source answered with a non-success status.
    #[error("remote source answered {status} {reason}")]
    Status { status: u16, reason: String },

    /// The request could not be sent or the connection broke.
    #[error("request to remote source failed")]
    Transport(#[source] BoxError),

    /// The body could not be decoded into a JSON object.
    #[error("malformed response body")]
    MalformedBody(#[source] BoxError),
}

/// Validation found prayers without a time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing prayer times: {}", join_keys(.missing))]
pub struct IncompleteScheduleError {
    /// Missing keys, in order of the day.
    pub missing: Vec<PrayerKey>,
}

/// Invalid user-supplied names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown prayer `{0}`")]
    UnknownPrayer(String),

    #[error("unknown switch service `{0}`")]
    UnknownService(String),
}

fn join_keys(keys: &[PrayerKey]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
