//! Accessory sink port: where switches are published and their state mirrored.

use std::future::Future;

use prayerbridge_domain::bridge::{BridgeInfo, SwitchDescriptor};
use prayerbridge_domain::error::PrayerBridgeError;
use prayerbridge_domain::prayer::PrayerKey;

/// Exposes the bridge and its switches to external observers.
///
/// The sink never drives the switches itself; controllers write through
/// [`SwitchActuator::set_on`](crate::actuator::SwitchActuator::set_on).
pub trait AccessorySink: Send + Sync {
    /// Announce the bridge and its switches.
    fn publish(
        &self,
        bridge: &BridgeInfo,
        switches: &[SwitchDescriptor],
    ) -> impl Future<Output = Result<(), PrayerBridgeError>> + Send;

    /// Mirror an on/off transition of one switch.
    fn update_on(
        &self,
        prayer: PrayerKey,
        on: bool,
    ) -> impl Future<Output = Result<(), PrayerBridgeError>> + Send;
}

impl<T: AccessorySink> AccessorySink for std::sync::Arc<T> {
    fn publish(
        &self,
        bridge: &BridgeInfo,
        switches: &[SwitchDescriptor],
    ) -> impl Future<Output = Result<(), PrayerBridgeError>> + Send {
        (**self).publish(bridge, switches)
    }

    fn update_on(
        &self,
        prayer: PrayerKey,
        on: bool,
    ) -> impl Future<Output = Result<(), PrayerBridgeError>> + Send {
        (**self).update_on(prayer, on)
    }
}
