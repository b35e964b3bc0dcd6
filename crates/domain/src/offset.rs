//! Per-prayer minute offsets applied before computing trigger instants.

use serde::Deserialize;

use crate::prayer::PrayerKey;

/// Signed minute adjustment for each prayer. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OffsetConfig {
    pub fajr: i64,
    pub dhuhr: i64,
    pub asr: i64,
    pub maghrib: i64,
    pub isha: i64,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            fajr: 45,
            dhuhr: 0,
            asr: 0,
            maghrib: 0,
            isha: 0,
        }
    }
}

impl OffsetConfig {
    /// All offsets set to zero.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            fajr: 0,
            dhuhr: 0,
            asr: 0,
            maghrib: 0,
            isha: 0,
        }
    }

    #[must_use]
    pub fn get(&self, key: PrayerKey) -> i64 {
        match key {
            PrayerKey::Fajr => self.fajr,
            PrayerKey::Dhuhr => self.dhuhr,
            PrayerKey::Asr => self.asr,
            PrayerKey::Maghrib => self.maghrib,
            PrayerKey::Isha => self.isha,
        }
    }

    pub fn set(&mut self, key: PrayerKey, minutes: i64) {
        let slot = match key {
            PrayerKey::Fajr => &mut self.fajr,
            PrayerKey::Dhuhr => &mut self.dhuhr,
            PrayerKey::Asr => &mut self.asr,
            PrayerKey::Maghrib => &mut self.maghrib,
            PrayerKey::Isha => &mut self.isha,
        };
        *slot = minutes;
    }
}
