//! Interpolation between recorded frames for smooth playback.

use crate::data::{EntityDelta, EntityPatch, EntityState};

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
fn towards(from: f64, to: Option<f64>, t: f64) -> Option<f64> {
    to.filter(|v| *v != from).map(|v| lerp(from, v, t))
}

/// Transform fields of `state` moved `t` of the way towards the next
/// recorded `patch`. Discrete fields (collected, flipped, variant) never blend.
pub fn blend(state: &EntityState, next: &EntityPatch, t: f64) -> Option<EntityDelta> {
    let d = EntityDelta {
        x: towards(state.x, next.x, t),
        y: towards(state.y, next.y, t),
        rotation: towards(state.rotation, next.rotation, t),
        scale_x: towards(state.scale_x, next.scale_x, t),
        scale_y: towards(state.scale_y, next.scale_y, t),
        ..EntityDelta::default()
    };
    (!d.is_empty()).then_some(d)
}

/// Delta putting fields that were shown blended, and are not blended by
/// `keep`, back to the resolved `state`.
pub fn settle(
    state: &EntityState,
    shown: &EntityDelta,
    keep: Option<&EntityDelta>,
) -> Option<EntityDelta> {
    let back = |field: fn(&EntityDelta) -> Option<f64>, value: f64| {
        (field(shown).is_some() && keep.and_then(field).is_none()).then_some(value)
    };
    let d = EntityDelta {
        x: back(|d| d.x, state.x),
        y: back(|d| d.y, state.y),
        rotation: back(|d| d.rotation, state.rotation),
        scale_x: back(|d| d.scale_x, state.scale_x),
        scale_y: back(|d| d.scale_y, state.scale_y),
        ..EntityDelta::default()
    };
    (!d.is_empty()).then_some(d)
}
