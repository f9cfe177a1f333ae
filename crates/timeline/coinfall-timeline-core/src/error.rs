//! Error types for the timeline core

use serde::{Deserialize, Serialize};

pub type Result<T, E = TimelineError> = std::result::Result<T, E>;

/// Errors raised while loading timelines or driving playback.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimelineError {
    /// No frames at all, not even a setup frame
    #[error("Timeline is empty")]
    EmptyTimeline,

    /// Setup frame present but nothing to play back
    #[error("Timeline has a setup frame but no playback frames")]
    NoPlaybackFrames,

    /// Setup entity is missing a required field
    #[error("Invalid setup entity at index {index}: missing {field}")]
    InvalidSetupEntity { index: usize, field: String },

    /// The same id was declared twice in the setup frame
    #[error("Duplicate entity id in setup frame: {id}")]
    DuplicateEntity { id: String },

    /// A playback frame references an id the setup frame never declared
    #[error("Frame {frame} references unknown entity: {id}")]
    UnknownEntity { frame: usize, id: String },

    /// Playback patch without an id
    #[error("Frame {frame} contains an entity patch without id")]
    MissingEntityId { frame: usize },

    /// Invalid playback rate
    #[error("Invalid playback rate: {reason}")]
    InvalidRate { reason: String },

    /// Timeline swap attempted while playback is running
    #[error("Cannot load a timeline while playback is running")]
    Busy,

    /// Operation not permitted in the current session phase
    #[error("Invalid session phase: {current} -> {requested}")]
    InvalidPhase { current: String, requested: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl TimelineError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyTimeline
            | Self::NoPlaybackFrames
            | Self::InvalidSetupEntity { .. }
            | Self::DuplicateEntity { .. }
            | Self::UnknownEntity { .. }
            | Self::MissingEntityId { .. } => "data",
            Self::InvalidRate { .. } => "validation",
            Self::Busy | Self::InvalidPhase { .. } => "session",
            Self::SerializationError { .. } => "serialization",
        }
    }

    /// Errors the host can recover from without reloading the timeline.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidRate { .. } | Self::Busy | Self::InvalidPhase { .. }
        )
    }
}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
