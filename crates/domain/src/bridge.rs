//! Bridge and switch descriptors handed to the accessory sink on publish.

use serde::{Deserialize, Serialize};

use crate::id::AccessoryId;
use crate::prayer::PrayerKey;

/// Identity and pairing fields of the published bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeInfo {
    pub id: AccessoryId,
    pub name: String,
    /// Device identifier advertised to controllers (MAC-like).
    pub username: String,
    pub pin: String,
    pub port: u16,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware: String,
}

impl Default for BridgeInfo {
    fn default() -> Self {
        Self {
            id: AccessoryId::derive("hap.prayer.bridge"),
            name: "Prayer Bridge".to_string(),
            username: "AA:12:3D:D3:BE:A6".to_string(),
            pin: "012-34-567".to_string(),
            port: 51827,
            manufacturer: "Prayer Bridge".to_string(),
            model: "HomeKit-Prayer-Bridge".to_string(),
            serial_number: "PB-0001".to_string(),
            firmware: "1.0.0".to_string(),
        }
    }
}

/// A switch exposed by the bridge, one per prayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDescriptor {
    pub id: AccessoryId,
    pub prayer: PrayerKey,
    pub name: String,
}

impl SwitchDescriptor {
    #[must_use]
    pub fn for_prayer(prayer: PrayerKey) -> Self {
        Self {
            id: AccessoryId::derive(&format!("hap.prayer.switch.{}", prayer.as_str())),
            prayer,
            name: format!("{} Switch", prayer.label()),
        }
    }
}
