use bevy::prelude::*;
use coinfall_timeline_core::EntityId;

/// Marks a scene entity driven by the timeline entity with the same id.
/// The host spawns visuals for each setup entity and tags them with this.
#[derive(Component, Debug, Clone)]
pub struct TimelineEntity {
    pub id: EntityId,
}

impl TimelineEntity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self { id: id.into() }
    }
}
