use bevy::prelude::*;
use std::collections::HashMap;

use coinfall_timeline_core::{
    parse_timeline_json, Config, EntityChange, EntityId, GameSession, Outputs, TimelineEvent,
};

/// The running game session. Inserted by the host once a timeline is loaded.
#[derive(Resource)]
pub struct TimelineSession(pub GameSession);

impl TimelineSession {
    pub fn from_json(json: &str, cfg: Config) -> coinfall_timeline_core::Result<Self> {
        let timeline = parse_timeline_json(json, &cfg)?;
        Ok(Self(GameSession::new(timeline, cfg)?))
    }
}

/// Index from timeline entity id to the scene entity tagged with it.
#[derive(Resource, Default)]
pub struct EntityIndex {
    pub map: HashMap<EntityId, Entity>,
}

/// Outputs staged by control/tick systems, applied in a separate system
/// (keeps ordering explicit: Compute -> Apply).
#[derive(Resource, Default)]
pub struct PendingOutputs {
    pub changes: Vec<EntityChange>,
    pub events: Vec<TimelineEvent>,
}

impl PendingOutputs {
    pub fn stage(&mut self, out: &Outputs) {
        self.changes.extend(out.changes.iter().cloned());
        self.events.extend(out.events.iter().cloned());
    }
}

/// Host-side requests: start screen button, viewport click, progress bar, fps select.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum TimelineControl {
    Start,
    Restart,
    Toggle,
    Seek(f64),
    SetFps(f64),
    SetSmooth(bool),
}

/// Timeline events forwarded to the rest of the app.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TimelineEventMessage(pub TimelineEvent);
