use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::TimelineEntity;
use crate::resources::{
    EntityIndex, PendingOutputs, TimelineControl, TimelineEventMessage, TimelineSession,
};
use coinfall_timeline_core::{EntityDelta, EntityId};

/// Rebuilds the id -> Entity index from every tagged entity.
pub fn build_entity_index_system(
    tagged: Query<(Entity, &TimelineEntity)>,
    mut index: ResMut<EntityIndex>,
) {
    let mut map: HashMap<EntityId, Entity> = HashMap::new();
    for (entity, tag) in tagged.iter() {
        if map.insert(tag.id.clone(), entity).is_some() {
            warn!("timeline id '{}' is tagged on more than one entity", tag.id);
        }
    }
    index.map = map;
}

/// Applies host control requests to the session and stages whatever they produce.
pub fn control_system(
    mut controls: EventReader<TimelineControl>,
    session: Option<ResMut<TimelineSession>>,
    mut pending: ResMut<PendingOutputs>,
) {
    let Some(mut session) = session else {
        controls.clear();
        return;
    };
    for control in controls.read() {
        let result = match control {
            TimelineControl::Start => session.0.start(),
            TimelineControl::Restart => session.0.restart(),
            TimelineControl::Toggle => session.0.toggle().map(|_| ()),
            TimelineControl::SetFps(fps) => session.0.set_fps(*fps),
            TimelineControl::SetSmooth(on) => {
                session.0.set_smooth(*on);
                Ok(())
            }
            TimelineControl::Seek(p) => session.0.seek(*p).map(|out| pending.stage(out)),
        };
        if let Err(e) = result {
            warn!("timeline control {control:?} ignored: {e}");
        }
    }
}

/// Advances the session by the frame's delta time.
pub fn tick_session_system(
    session: Option<ResMut<TimelineSession>>,
    time: Res<Time>,
    mut pending: ResMut<PendingOutputs>,
) {
    let Some(mut session) = session else {
        return;
    };
    let dt_ms = time.delta_seconds_f64() * 1000.0;
    let out = session.0.update(dt_ms);
    pending.stage(out);
}

fn apply_delta(delta: &EntityDelta, tf: &mut Transform, vis: Option<Mut<Visibility>>) {
    if let Some(x) = delta.x {
        tf.translation.x = x as f32;
    }
    if let Some(y) = delta.y {
        tf.translation.y = y as f32;
    }
    if let Some(r) = delta.rotation {
        tf.rotation = Quat::from_rotation_z(r as f32);
    }
    if let Some(sx) = delta.scale_x {
        tf.scale.x = sx as f32;
    }
    if let Some(sy) = delta.scale_y {
        tf.scale.y = sy as f32;
    }
    // Collected coins leave the scene; a backward scrub brings them back.
    if let (Some(collected), Some(mut vis)) = (delta.collected, vis) {
        *vis = if collected {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

/// Writes staged entity changes into Transform/Visibility and forwards events.
pub fn apply_outputs_system(
    index: Res<EntityIndex>,
    mut pending: ResMut<PendingOutputs>,
    mut q: Query<(&mut Transform, Option<&mut Visibility>)>,
    mut writer: EventWriter<TimelineEventMessage>,
) {
    for change in pending.changes.drain(..) {
        let Some(&entity) = index.map.get(&change.id) else {
            continue;
        };
        if let Ok((mut tf, vis)) = q.get_mut(entity) {
            apply_delta(&change.delta, &mut tf, vis);
        }
    }
    for ev in pending.events.drain(..) {
        writer.send(TimelineEventMessage(ev));
    }
}
