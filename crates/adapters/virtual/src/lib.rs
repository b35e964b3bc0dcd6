//! # prayerbridge-adapter-virtual
//!
//! In-process accessory bridge. It plays the part of the home-automation
//! bridge that exposes one switch per prayer: the application publishes the
//! bridge identity and switch descriptors once at startup, then mirrors every
//! on/off transition through [`AccessorySink::update_on`].
//!
//! The bridge keeps the last mirrored value per switch so that the HTTP API
//! and tests can observe what a paired controller would see.
//!
//! ## Dependency rule
//!
//! Depends on `prayerbridge-app` (port traits) and `prayerbridge-domain` only.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use prayerbridge_app::ports::AccessorySink;
use prayerbridge_domain::bridge::{BridgeInfo, SwitchDescriptor};
use prayerbridge_domain::error::PrayerBridgeError;
use prayerbridge_domain::prayer::PrayerKey;

#[derive(Debug, Default)]
struct Published {
    bridge: Option<BridgeInfo>,
    switches: Vec<SwitchDescriptor>,
    on: BTreeMap<PrayerKey, bool>,
    updates: u64,
}

/// Accessory bridge that lives entirely in memory.
#[derive(Debug, Default)]
pub struct VirtualBridge {
    inner: Mutex<Published>,
}

impl VirtualBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity published at startup, if any.
    #[must_use]
    pub fn bridge(&self) -> Option<BridgeInfo> {
        self.lock().bridge.clone()
    }

    /// Switches published at startup, in order of the day.
    #[must_use]
    pub fn switches(&self) -> Vec<SwitchDescriptor> {
        self.lock().switches.clone()
    }

    /// Last mirrored value for a switch; `false` before any update.
    #[must_use]
    pub fn is_on(&self, prayer: PrayerKey) -> bool {
        self.lock().on.get(&prayer).copied().unwrap_or(false)
    }

    /// Number of on/off updates mirrored since start.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.lock().updates
    }

    fn lock(&self) -> MutexGuard<'_, Published> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccessorySink for VirtualBridge {
    async fn publish(
        &self,
        bridge: &BridgeInfo,
        switches: &[SwitchDescriptor],
    ) -> Result<(), PrayerBridgeError> {
        {
            let mut inner = self.lock();
            inner.bridge = Some(bridge.clone());
            inner.switches = switches.to_vec();
            inner.on = switches.iter().map(|s| (s.prayer, false)).collect();
        }

        for switch in switches {
            tracing::debug!(id = %switch.id, name = %switch.name, "switch accessory added");
        }
        tracing::info!(
            name = %bridge.name,
            username = %bridge.username,
            port = bridge.port,
            "Bridge published. Pair using PIN {}",
            bridge.pin
        );
        Ok(())
    }

    async fn update_on(&self, prayer: PrayerKey, on: bool) -> Result<(), PrayerBridgeError> {
        let mut inner = self.lock();
        inner.on.insert(prayer, on);
        inner.updates += 1;
        tracing::trace!(%prayer, on, "accessory characteristic updated");
        Ok(())
    }
}
