//! Scene event bus.
//!
//! The core publishes presentation-facing events (dialog open/close, phase
//! flips, freeze/release) onto a bounded channel; the orchestrator's host
//! drains them once per tick. Publishing never blocks: when the channel is
//! full the event is dropped, which is acceptable because events are
//! rendering hints, never authoritative state.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use canopy_common::ids::NpcId;

use crate::npc::NpcPhase;

/// Events emitted by the scene core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// A dialog opened with an NPC.
    DialogOpened {
        /// The engaged NPC
        npc: NpcId,
    },
    /// The dialog closed.
    DialogClosed {
        /// The formerly engaged NPC
        npc: NpcId,
    },
    /// The player's body began overlapping an NPC's body.
    PlayerTouchedNpc {
        /// The touched NPC
        npc: NpcId,
    },
    /// An NPC's autonomous phase flipped.
    NpcPhaseChanged {
        /// The NPC that changed phase
        npc: NpcId,
        /// The new phase
        phase: NpcPhase,
    },
    /// Proximity froze an NPC's wandering.
    NpcFrozen {
        /// The frozen NPC
        npc: NpcId,
    },
    /// A frozen NPC was released back to its schedule.
    NpcReleased {
        /// The released NPC
        npc: NpcId,
    },
}

/// Bounded event channel between the scene core and its host.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<SceneEvent>,
    receiver: Receiver<SceneEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event, dropping it if the channel is full.
    pub fn publish(&self, event: SceneEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events in publish order.
    pub fn drain(&self) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of events waiting to be drained.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain_in_order() {
        let bus = EventBus::new(8);
        bus.publish(SceneEvent::NpcFrozen { npc: NpcId::new(1) });
        bus.publish(SceneEvent::NpcReleased { npc: NpcId::new(1) });

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                SceneEvent::NpcFrozen { npc: NpcId::new(1) },
                SceneEvent::NpcReleased { npc: NpcId::new(1) },
            ]
        );
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(2);
        for i in 0..5 {
            bus.publish(SceneEvent::NpcFrozen {
                npc: NpcId::new(i),
            });
        }

        assert_eq!(bus.capacity(), 2);
        assert_eq!(bus.drain().len(), 2);
    }

    #[test]
    fn test_event_serialization() {
        let event = SceneEvent::DialogOpened { npc: NpcId::new(3) };
        let json = serde_json::to_string(&event).expect("serializes");
        assert!(json.contains("DialogOpened"));

        let back: SceneEvent = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, event);
    }
}
