//! Failure and state-change events raised by the pipeline.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteamEvent {
    CoalExhausted,
    WaterExhausted,
    FireExhausted,
    FusiblePlugBlown,
    PrimingStarted,
    PrimingCleared,
    SafetyValveLifted,
    SafetyValveSeated,
}

impl SteamEvent {
    /// Failures the crew must act on; the rest are informational.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            SteamEvent::CoalExhausted
                | SteamEvent::WaterExhausted
                | SteamEvent::FireExhausted
                | SteamEvent::FusiblePlugBlown
                | SteamEvent::PrimingStarted
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            SteamEvent::CoalExhausted => "tender coal exhausted",
            SteamEvent::WaterExhausted => "tender water exhausted",
            SteamEvent::FireExhausted => "fire has gone out",
            SteamEvent::FusiblePlugBlown => "fusible plug blown, fire extinguished",
            SteamEvent::PrimingStarted => "boiler priming",
            SteamEvent::PrimingCleared => "priming cleared",
            SteamEvent::SafetyValveLifted => "safety valve lifted",
            SteamEvent::SafetyValveSeated => "safety valves reseated",
        }
    }
}

/// Collects the events of a single tick.
#[derive(Clone, Debug, Default)]
pub struct EventSink {
    events: Vec<SteamEvent>,
}

impl EventSink {
    pub fn raise(&mut self, event: SteamEvent) {
        if event.is_failure() {
            tracing::warn!(event = ?event, "{}", event.describe());
        } else {
            tracing::info!(event = ?event, "{}", event.describe());
        }
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_vec(self) -> Vec<SteamEvent> {
        self.events
    }
}
