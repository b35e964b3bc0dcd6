//! Prayer times source port: retrieves one day's raw timetable.

use std::future::Future;

use chrono::NaiveDate;
use prayerbridge_domain::error::FetchError;
use prayerbridge_domain::timetable::RawTimetable;

/// Remote source of daily prayer times.
///
/// Implementations perform a single bounded attempt; retrying is the
/// planner's job.
pub trait PrayerTimesSource: Send + Sync {
    /// Fetch the raw provider payload for `date`.
    fn fetch(&self, date: NaiveDate)
    -> impl Future<Output = Result<RawTimetable, FetchError>> + Send;
}

impl<T: PrayerTimesSource> PrayerTimesSource for std::sync::Arc<T> {
    fn fetch(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<RawTimetable, FetchError>> + Send {
        (**self).fetch(date)
    }
}
