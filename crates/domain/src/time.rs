//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::time_of_day::TimeOfDay;

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Calendar date of `at` in `timezone`.
#[must_use]
pub fn local_date(at: Timestamp, timezone: Tz) -> NaiveDate {
    at.with_timezone(&timezone).date_naive()
}

/// Absolute instant for `time` on `date` in `timezone`, shifted by
/// `offset_minutes`.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
/// Returns `None` when the local time does not exist on that date (DST
/// spring-forward gap) or the offset leaves the representable range.
#[must_use]
pub fn trigger_instant(
    date: NaiveDate,
    time: TimeOfDay,
    offset_minutes: i64,
    timezone: Tz,
) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)?;
    let local = timezone.from_local_datetime(&naive).earliest()?;
    local.checked_add_signed(TimeDelta::try_minutes(offset_minutes)?)
}
