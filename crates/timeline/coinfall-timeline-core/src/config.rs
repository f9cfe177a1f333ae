//! Core configuration for coinfall-timeline-core.

use serde::{Deserialize, Serialize};

use crate::clock::DEFAULT_FRAME_DURATION_MS;

/// How one-shot events behave when a frame is visited more than once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPolicy {
    /// Coin collections fire once per coin, flips once per frame.
    #[default]
    Once,
    /// Fire every time a frame is applied going forward, including frames
    /// replayed after a backward scrub. Backward scrubs themselves fire
    /// nothing, and a forward jump fires for every frame it passes.
    EveryVisit,
}

/// Configuration for playback and timeline loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wall-clock milliseconds spent on each recorded frame.
    pub frame_duration_ms: f64,
    /// Multiplier applied to ticked time.
    pub speed: f64,
    /// Frames between pre-resolved roster snapshots used for scrubbing.
    pub checkpoint_interval: usize,
    /// Reject timelines whose frames reference ids missing from setup.
    pub strict_ids: bool,
    /// Maximum events to retain per tick; the rest are dropped.
    pub max_events_per_tick: usize,
    pub event_policy: EventPolicy,
    /// Interpolate transforms between the current and the next frame.
    pub smooth: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            speed: 1.0,
            checkpoint_interval: 64,
            strict_ids: false,
            max_events_per_tick: 1024,
            event_policy: EventPolicy::Once,
            smooth: false,
        }
    }
}
