//! Switch state and the services an external controller may call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::prayer::PrayerKey;

/// Pulse state machine of one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorState {
    #[default]
    Idle,
    Pulsing,
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Pulsing => f.write_str("pulsing"),
        }
    }
}

/// Point-in-time view of a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchSnapshot {
    pub prayer: PrayerKey,
    pub name: String,
    pub state: ActuatorState,
    pub on: bool,
}

/// Direct write requested by an external controller.
///
/// None of these start a timed pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchService {
    TurnOn,
    TurnOff,
    Toggle,
}

impl SwitchService {
    /// Resulting on/off value given the current one.
    #[must_use]
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::TurnOn => true,
            Self::TurnOff => false,
            Self::Toggle => !current,
        }
    }
}

impl FromStr for SwitchService {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turn_on" => Ok(Self::TurnOn),
            "turn_off" => Ok(Self::TurnOff),
            "toggle" => Ok(Self::Toggle),
            other => Err(ValidationError::UnknownService(other.to_string())),
        }
    }
}
