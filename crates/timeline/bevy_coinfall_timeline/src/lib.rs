use bevy::prelude::*;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::TimelineEntity;
pub use resources::{
    EntityIndex, PendingOutputs, TimelineControl, TimelineEventMessage, TimelineSession,
};

/// Ordering handle so host systems can run before or after timeline playback.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimelineSystems;

/// Drives `TimelineEntity`-tagged entities from the `TimelineSession` resource.
/// The session is inserted by the host once a recording is available; until
/// then the systems are idle.
pub struct CoinfallTimelinePlugin;

impl Plugin for CoinfallTimelinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityIndex>()
            .init_resource::<PendingOutputs>()
            .add_event::<TimelineControl>()
            .add_event::<TimelineEventMessage>()
            .add_systems(
                Update,
                (
                    systems::build_entity_index_system,
                    systems::control_system,
                    systems::tick_session_system,
                    systems::apply_outputs_system,
                )
                    .chain()
                    .in_set(TimelineSystems),
            );
    }
}
