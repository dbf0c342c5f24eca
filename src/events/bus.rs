//! Round event bus
//!
//! Kicker input, shot, keeper and phase systems push `GameEvent`s here as a
//! round plays out. Session runners export the stream into round results and
//! evlog files, scenario checks read it back for sequence assertions.

use bevy::prelude::*;

use super::types::GameEvent;

/// A `GameEvent` stamped with the app clock when it was emitted
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Milliseconds of app time
    pub time_ms: u32,
    pub event: GameEvent,
}

/// Ordered record of what happened in the current session
#[derive(Resource, Default)]
pub struct EventBus {
    /// Emitted, not yet exported
    pending: Vec<BusEvent>,
    /// Already exported, kept until an evlog writer clears them
    processed: Vec<BusEvent>,
    /// App time stamped onto the next emit
    elapsed_ms: u32,
    /// When off, emits are dropped
    enabled: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// A muted bus that records nothing until re-enabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Advance the stamp clock, called once per frame before gameplay systems
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    /// Record an event at the current app time
    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Events emitted since the last export, in order
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Take the pending events, keeping a copy in `processed`
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        self.processed.extend(events.clone());
        events
    }

    pub fn processed(&self) -> &[BusEvent] {
        &self.processed
    }

    pub fn clear_processed(&mut self) {
        self.processed.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mute or unmute recording. Already pending events are kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Drain as `(time_ms, event)` pairs, the shape round results and evlogs use
    pub fn export_events(&mut self) -> Vec<(u32, GameEvent)> {
        self.drain()
            .into_iter()
            .map(|e| (e.time_ms, e.event))
            .collect()
    }
}

/// Per-frame system keeping the stamp clock on `Time`
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time>) {
    bus.update_time(time.elapsed_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_is_stamped_with_app_time() {
        let mut bus = EventBus::new();
        bus.update_time(1.5);
        assert_eq!(bus.elapsed_ms(), 1500);

        bus.emit(GameEvent::Kick {
            power: 0.8,
            yaw: 0.1,
            pitch: 0.0,
        });

        assert_eq!(bus.pending_count(), 1);
        assert!(bus.has_pending());
        assert_eq!(bus.peek()[0].time_ms, 1500);

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_ms, 1500);
        assert_eq!(bus.pending_count(), 0);
        assert_eq!(bus.processed().len(), 1);
    }

    #[test]
    fn test_disabled_bus_drops_charge() {
        let mut bus = EventBus::disabled();
        assert!(!bus.is_enabled());
        bus.emit(GameEvent::ChargeStart);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_muting_mid_round_keeps_earlier_events() {
        let mut bus = EventBus::new();
        assert!(bus.is_enabled());
        bus.emit(GameEvent::ChargeStart);

        bus.set_enabled(false);
        assert!(!bus.is_enabled());
        bus.emit(GameEvent::KeeperSave {
            saved: true,
            chance: 0.4,
        });
        assert_eq!(bus.pending_count(), 1);

        bus.set_enabled(true);
        bus.emit(GameEvent::Outcome {
            result: "save".to_string(),
        });
        let names: Vec<_> = bus.export_events().iter().map(|(_, e)| e.name()).collect();
        assert_eq!(names, vec!["ChargeStart", "Outcome"]);
    }

    #[test]
    fn test_export_moves_to_processed() {
        let mut bus = EventBus::new();
        bus.emit(GameEvent::Outcome {
            result: "goal".to_string(),
        });
        let exported = bus.export_events();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].0, 0);
        assert!(!bus.has_pending());
        assert_eq!(bus.processed().len(), 1);

        bus.clear_processed();
        assert!(bus.processed().is_empty());
    }
}
