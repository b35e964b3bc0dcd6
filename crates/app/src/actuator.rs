//! Switch actuators: one pulse state machine per prayer.
//!
//! A pulse is `On → hold → Off`. If the switch is already on when a pulse
//! starts, it is forced off and left to settle first so every pulse begins
//! with a visible falling edge.
//!
//! Pulses do not queue: a new pulse supersedes the one in flight. The older
//! pulse keeps sleeping but no longer writes to the switch, so it can neither
//! turn the switch on after being superseded nor cut the newer pulse short.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use prayerbridge_domain::bridge::{BridgeInfo, SwitchDescriptor};
use prayerbridge_domain::error::PrayerBridgeError;
use prayerbridge_domain::prayer::PrayerKey;
use prayerbridge_domain::switch::{ActuatorState, SwitchService, SwitchSnapshot};

use crate::ports::AccessorySink;

/// Pause between a forced Off and the next On.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct SwitchState {
    state: ActuatorState,
    on: bool,
    /// Incremented by every pulse; a pulse only writes while it holds the
    /// latest value.
    generation: u64,
}

/// On/off output for a single prayer.
pub struct SwitchActuator<S> {
    descriptor: SwitchDescriptor,
    sink: Arc<S>,
    settle_delay: Duration,
    inner: Mutex<SwitchState>,
}

impl<S: AccessorySink> SwitchActuator<S> {
    /// Create an idle, off switch that mirrors its transitions to `sink`.
    pub fn new(prayer: PrayerKey, sink: Arc<S>, settle_delay: Duration) -> Self {
        Self {
            descriptor: SwitchDescriptor::for_prayer(prayer),
            sink,
            settle_delay,
            inner: Mutex::new(SwitchState::default()),
        }
    }

    #[must_use]
    pub fn prayer(&self) -> PrayerKey {
        self.descriptor.prayer
    }

    #[must_use]
    pub fn descriptor(&self) -> &SwitchDescriptor {
        &self.descriptor
    }

    /// Observed on/off value, as read by the accessory side.
    #[must_use]
    pub fn get_on(&self) -> bool {
        self.lock().on
    }

    #[must_use]
    pub fn state(&self) -> ActuatorState {
        self.lock().state
    }

    #[must_use]
    pub fn snapshot(&self) -> SwitchSnapshot {
        let inner = self.lock();
        SwitchSnapshot {
            prayer: self.descriptor.prayer,
            name: self.descriptor.name.clone(),
            state: inner.state,
            on: inner.on,
        }
    }

    /// Plain write from an external controller. Does not start a pulse.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if mirroring the new value fails.
    pub async fn set_on(&self, on: bool) -> Result<(), PrayerBridgeError> {
        self.lock().on = on;
        tracing::info!(prayer = %self.prayer(), on, "switch set externally");
        self.sink.update_on(self.prayer(), on).await
    }

    /// Turn the switch on for `duration`, then off.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if mirroring a transition fails; the pulse
    /// stops at that point.
    pub async fn pulse(&self, duration: Duration) -> Result<(), PrayerBridgeError> {
        let prayer = self.prayer();
        let (ticket, active) = {
            let mut inner = self.lock();
            inner.generation += 1;
            (
                inner.generation,
                inner.on || inner.state == ActuatorState::Pulsing,
            )
        };

        if active {
            tracing::debug!(%prayer, "switch already on, forcing off before pulse");
            self.transition(ActuatorState::Idle, false).await?;
            tokio::time::sleep(self.settle_delay).await;
            if self.is_superseded(ticket) {
                tracing::debug!(%prayer, "pulse superseded while settling");
                return Ok(());
            }
        }

        tracing::info!(%prayer, seconds = duration.as_secs_f64(), "pulsing switch on");
        self.transition(ActuatorState::Pulsing, true).await?;
        tokio::time::sleep(duration).await;

        if self.is_superseded(ticket) {
            tracing::debug!(%prayer, "pulse superseded, leaving switch to newer pulse");
            return Ok(());
        }
        self.transition(ActuatorState::Idle, false).await?;
        tracing::debug!(%prayer, "pulse complete");
        Ok(())
    }

    async fn transition(&self, state: ActuatorState, on: bool) -> Result<(), PrayerBridgeError> {
        {
            let mut inner = self.lock();
            inner.state = state;
            inner.on = on;
        }
        self.sink.update_on(self.prayer(), on).await
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.lock().generation != ticket
    }

    fn lock(&self) -> MutexGuard<'_, SwitchState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The five switches of the bridge.
pub struct Switchboard<S> {
    sink: Arc<S>,
    actuators: [Arc<SwitchActuator<S>>; 5],
}

impl<S: AccessorySink> Switchboard<S> {
    /// Create one actuator per prayer, all mirroring to `sink`.
    pub fn new(sink: S) -> Self {
        Self::with_settle_delay(sink, SETTLE_DELAY)
    }

    pub fn with_settle_delay(sink: S, settle_delay: Duration) -> Self {
        let sink = Arc::new(sink);
        let actuators = PrayerKey::ALL
            .map(|prayer| Arc::new(SwitchActuator::new(prayer, Arc::clone(&sink), settle_delay)));
        Self { sink, actuators }
    }

    #[must_use]
    pub fn get(&self, prayer: PrayerKey) -> &Arc<SwitchActuator<S>> {
        &self.actuators[prayer.index()]
    }

    /// Publish the bridge and all switch descriptors to the sink.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    pub async fn publish(&self, bridge: &BridgeInfo) -> Result<(), PrayerBridgeError> {
        let switches: Vec<_> = self
            .actuators
            .iter()
            .map(|a| a.descriptor().clone())
            .collect();
        self.sink.publish(bridge, &switches).await?;
        tracing::info!(
            bridge = %bridge.name,
            switches = switches.len(),
            "accessories published"
        );
        Ok(())
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<SwitchSnapshot> {
        self.actuators.iter().map(|a| a.snapshot()).collect()
    }

    /// Apply an external service call as a plain write.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if mirroring fails.
    pub async fn handle_service(
        &self,
        prayer: PrayerKey,
        service: SwitchService,
    ) -> Result<SwitchSnapshot, PrayerBridgeError> {
        let actuator = self.get(prayer);
        actuator.set_on(service.apply(actuator.get_on())).await?;
        Ok(actuator.snapshot())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    // ── Spy sink ───────────────────────────────────────────────────

    #[derive(Default)]
    pub(crate) struct SpySink {
        pub(crate) updates: Mutex<Vec<(PrayerKey, bool, Instant)>>,
        pub(crate) published: Mutex<Vec<SwitchDescriptor>>,
    }

    impl SpySink {
        pub(crate) fn updates_for(&self, prayer: PrayerKey) -> Vec<(bool, Instant)> {
            self.updates
                .lock()
                .unwrap()
                .iter()
                .filter(|(p, _, _)| *p == prayer)
                .map(|(_, on, at)| (*on, *at))
                .collect()
        }

        pub(crate) fn total_updates(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    impl AccessorySink for SpySink {
        async fn publish(
            &self,
            _bridge: &BridgeInfo,
            switches: &[SwitchDescriptor],
        ) -> Result<(), PrayerBridgeError> {
            self.published.lock().unwrap().extend_from_slice(switches);
            Ok(())
        }

        async fn update_on(&self, prayer: PrayerKey, on: bool) -> Result<(), PrayerBridgeError> {
            self.updates
                .lock()
                .unwrap()
                .push((prayer, on, Instant::now()));
            Ok(())
        }
    }

    struct FailingSink;

    impl AccessorySink for FailingSink {
        async fn publish(
            &self,
            _bridge: &BridgeInfo,
            _switches: &[SwitchDescriptor],
        ) -> Result<(), PrayerBridgeError> {
            Ok(())
        }

        async fn update_on(&self, _prayer: PrayerKey, _on: bool) -> Result<(), PrayerBridgeError> {
            Err(PrayerBridgeError::Accessory("sink offline".into()))
        }
    }

    fn actuator(sink: &Arc<SpySink>) -> Arc<SwitchActuator<SpySink>> {
        Arc::new(SwitchActuator::new(
            PrayerKey::Dhuhr,
            Arc::clone(sink),
            SETTLE_DELAY,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn should_pulse_on_then_off_after_duration() {
        let sink = Arc::new(SpySink::default());
        let switch = actuator(&sink);

        switch.pulse(Duration::from_secs(30)).await.unwrap();

        let updates = sink.updates_for(PrayerKey::Dhuhr);
        assert_eq!(updates.len(), 2);
        assert!(updates[0].0);
        assert!(!updates[1].0);
        assert_eq!(updates[1].1 - updates[0].1, Duration::from_secs(30));
        assert_eq!(switch.state(), ActuatorState::Idle);
        assert!(!switch.get_on());
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_pulsing_while_holding() {
        let sink = Arc::new(SpySink::default());
        let switch = actuator(&sink);

        let handle = tokio::spawn({
            let switch = Arc::clone(&switch);
            async move { switch.pulse(Duration::from_secs(30)).await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(switch.state(), ActuatorState::Pulsing);
        assert!(switch.get_on());
        handle.await.unwrap().unwrap();
        assert_eq!(switch.state(), ActuatorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn should_force_single_off_before_new_pulse_when_already_pulsing() {
        let sink = Arc::new(SpySink::default());
        let switch = actuator(&sink);

        let first = tokio::spawn({
            let switch = Arc::clone(&switch);
            async move { switch.pulse(Duration::from_secs(30)).await }
        });
        tokio::time::sleep(Duration::from_secs(10)).await;

        switch.pulse(Duration::from_secs(30)).await.unwrap();
        first.await.unwrap().unwrap();

        let updates = sink.updates_for(PrayerKey::Dhuhr);
        let values: Vec<bool> = updates.iter().map(|(on, _)| *on).collect();
        assert_eq!(values, vec![true, false, true, false]);
        // Forced off, then settle, then the new pulse.
        assert_eq!(updates[2].1 - updates[1].1, SETTLE_DELAY);
        // The newer pulse holds for its full duration.
        assert_eq!(updates[3].1 - updates[2].1, Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_turn_on_when_superseded_during_settle() {
        let sink = Arc::new(SpySink::default());
        let switch = actuator(&sink);
        switch.set_on(true).await.unwrap();

        let first = tokio::spawn({
            let switch = Arc::clone(&switch);
            async move { switch.pulse(Duration::from_secs(30)).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        switch.pulse(Duration::from_secs(5)).await.unwrap();
        first.await.unwrap().unwrap();

        let values: Vec<bool> = sink
            .updates_for(PrayerKey::Dhuhr)
            .iter()
            .map(|(on, _)| *on)
            .collect();
        // external on, forced off by the first pulse, then only the second pulse
        assert_eq!(values, vec![true, false, true, false]);
        assert!(!switch.get_on());
    }

    #[tokio::test(start_paused = true)]
    async fn should_force_off_when_switch_was_set_on_externally() {
        let sink = Arc::new(SpySink::default());
        let switch = actuator(&sink);
        switch.set_on(true).await.unwrap();

        switch.pulse(Duration::from_secs(2)).await.unwrap();

        let values: Vec<bool> = sink
            .updates_for(PrayerKey::Dhuhr)
            .iter()
            .map(|(on, _)| *on)
            .collect();
        assert_eq!(values, vec![true, false, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_set_state_without_pulsing() {
        let sink = Arc::new(SpySink::default());
        let switch = actuator(&sink);

        switch.set_on(true).await.unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(switch.get_on());
        assert_eq!(switch.state(), ActuatorState::Idle);
        assert_eq!(sink.total_updates(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_propagate_sink_failure_from_pulse() {
        let switch = SwitchActuator::new(PrayerKey::Asr, Arc::new(FailingSink), SETTLE_DELAY);
        let result = switch.pulse(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(PrayerBridgeError::Accessory(_))));
    }

    #[tokio::test]
    async fn should_publish_one_descriptor_per_prayer() {
        let sink = Arc::new(SpySink::default());
        let board = Switchboard::new(Arc::clone(&sink));

        board.publish(&BridgeInfo::default()).await.unwrap();

        let published = sink.published.lock().unwrap();
        let prayers: Vec<_> = published.iter().map(|d| d.prayer).collect();
        assert_eq!(prayers, PrayerKey::ALL.to_vec());
    }

    #[tokio::test]
    async fn should_toggle_switch_through_service_call() {
        let sink = Arc::new(SpySink::default());
        let board = Switchboard::new(Arc::clone(&sink));

        let snapshot = board
            .handle_service(PrayerKey::Isha, SwitchService::Toggle)
            .await
            .unwrap();
        assert!(snapshot.on);
        assert_eq!(snapshot.name, "Isha Switch");

        let snapshot = board
            .handle_service(PrayerKey::Isha, SwitchService::Toggle)
            .await
            .unwrap();
        assert!(!snapshot.on);
        assert_eq!(sink.updates_for(PrayerKey::Isha).len(), 2);
    }

    #[tokio::test]
    async fn should_list_snapshots_in_order_of_the_day() {
        let board = Switchboard::new(SpySink::default());
        let snapshots = board.snapshots();
        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[0].prayer, PrayerKey::Fajr);
        assert!(snapshots.iter().all(|s| !s.on && s.state == ActuatorState::Idle));
    }
}
