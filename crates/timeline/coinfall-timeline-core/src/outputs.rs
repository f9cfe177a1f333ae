//! Output contracts from the playback driver.
//!
//! Outputs carry the entity deltas for this tick keyed by stable entity id,
//! and a separate list of semantic events. Adapters (Bevy/WASM) apply
//! changes to their scene objects and react to events.

use serde::{Deserialize, Serialize};

use crate::data::{EntityDelta, EntityId};

/// Fields of one entity that changed this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityChange {
    pub id: EntityId,
    pub delta: EntityDelta,
}

/// Recordings only mark left flips.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipDirection {
    Left,
}

/// Discrete semantic signals emitted during playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum TimelineEvent {
    PlaybackStarted,
    PlaybackPaused,
    PlaybackResumed,
    PlaybackEnded {
        score: f64,
    },
    FrameChanged {
        from: Option<usize>,
        to: usize,
    },
    ScoreChanged {
        old: f64,
        new: f64,
    },
    CoinCollected {
        id: EntityId,
        variant: u32,
        value: f64,
    },
    Flipped {
        id: EntityId,
        direction: FlipDirection,
        frame: usize,
    },
    SpeedChanged {
        frame_duration_ms: f64,
        speed: f64,
    },
}

/// Outputs returned by `PlaybackDriver::update` and friends.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<EntityChange>,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    pub progress: f64,
    /// Last applied playback frame; `None` until the first frame is reached.
    pub frame_index: Option<usize>,
    pub score: f64,
    pub playing: bool,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: EntityChange) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: TimelineEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
