//! Coinfall Timeline Core (engine-agnostic)
//!
//! Replays pre-recorded entity timelines: a [`Timeline`] holds the setup
//! frame and playback frames, a [`PlaybackDriver`] maps ticked time or
//! manual scrubbing onto frame indices and produces [`Outputs`] (entity
//! deltas plus one-shot events) for adapters to apply to their scene.
//! [`GameSession`] wraps the driver with the start / run / game-over flow.

pub mod blend;
pub mod checkpoints;
pub mod clock;
pub mod coins;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod outputs;
pub mod roster;
pub mod session;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use checkpoints::Checkpoints;
pub use clock::{frame_duration_from_fps, frame_index_for_progress, DEFAULT_FRAME_DURATION_MS};
pub use coins::{coin_variant, CoinVariant};
pub use config::{Config, EventPolicy};
pub use data::{EntityDelta, EntityId, EntityKind, EntityPatch, EntityState, Frame};
pub use driver::PlaybackDriver;
pub use error::{Result, TimelineError};
pub use outputs::{EntityChange, FlipDirection, Outputs, TimelineEvent};
pub use roster::Roster;
pub use session::{GameSession, Phase, RunStats};
pub use timeline::{parse_timeline_json, Timeline};
