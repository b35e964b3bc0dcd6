//! Daily timetable: one day's prayer times as produced by a single fetch.
//!
//! Raw provider payloads are JSON objects with provider-specific field
//! names. [`DailyTimeSet::normalize`] picks the right field for each
//! [`PrayerKey`] and parses it; [`DailyTimeSet::validate`] enforces that all
//! five prayers are present before scheduling.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::IncompleteScheduleError;
use crate::prayer::PrayerKey;
use crate::time_of_day::TimeOfDay;

/// Raw provider payload: field name to JSON value.
pub type RawTimetable = serde_json::Map<String, serde_json::Value>;

/// Provider field names consulted for a key, in order of preference.
#[must_use]
pub fn source_fields(key: PrayerKey) -> &'static [&'static str] {
    match key {
        PrayerKey::Fajr => &["fajr"],
        PrayerKey::Dhuhr => &["dhuhr"],
        PrayerKey::Asr => &["asr_2"],
        PrayerKey::Maghrib => &["magrib", "maghrib"],
        PrayerKey::Isha => &["isha"],
    }
}

/// Mapping from every [`PrayerKey`] to an optional [`TimeOfDay`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTimeSet {
    times: [Option<TimeOfDay>; 5],
}

impl DailyTimeSet {
    /// Empty set: every key absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, key: PrayerKey, time: TimeOfDay) -> Self {
        self.set(key, Some(time));
        self
    }

    pub fn set(&mut self, key: PrayerKey, time: Option<TimeOfDay>) {
        self.times[key.index()] = time;
    }

    #[must_use]
    pub fn get(&self, key: PrayerKey) -> Option<TimeOfDay> {
        self.times[key.index()]
    }

    /// Iterate over all keys in order of the day with their optional time.
    pub fn iter(&self) -> impl Iterator<Item = (PrayerKey, Option<TimeOfDay>)> + '_ {
        PrayerKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    /// Keys without a time, in order of the day.
    #[must_use]
    pub fn missing(&self) -> Vec<PrayerKey> {
        self.iter()
            .filter_map(|(key, time)| time.is_none().then_some(key))
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.times.iter().all(Option::is_some)
    }

    /// Build a set from a raw provider payload.
    ///
    /// For each key the first [`source_fields`] entry holding a non-empty
    /// string is parsed with [`TimeOfDay::parse`]. Missing fields, non-string
    /// values and unparsable strings leave the key absent.
    #[must_use]
    pub fn normalize(raw: &RawTimetable) -> Self {
        let mut set = Self::new();
        for key in PrayerKey::ALL {
            let text = source_fields(key)
                .iter()
                .filter_map(|field| raw.get(*field).and_then(serde_json::Value::as_str))
                .find(|value| !value.trim().is_empty());
            set.set(key, text.and_then(TimeOfDay::parse));
        }
        set
    }

    /// Require every key to be present.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteScheduleError`] listing the absent keys.
    pub fn validate(&self) -> Result<(), IncompleteScheduleError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IncompleteScheduleError { missing })
        }
    }
}

impl fmt::Display for DailyTimeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, time)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match time {
                Some(time) => write!(f, "{key}={time}")?,
                None => write!(f, "{key}=-")?,
            }
        }
        Ok(())
    }
}

impl Serialize for DailyTimeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PrayerKey::ALL.len()))?;
        for (key, time) in self.iter() {
            map.serialize_entry(key.as_str(), &time)?;
        }
        map.end()
    }
}
