//! Live entity map mirrored from the timeline.

use indexmap::IndexMap;

use crate::data::{EntityId, EntityState, Frame};
use crate::outputs::EntityChange;

/// Current resolved state of every entity, in setup declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    entities: IndexMap<EntityId, EntityState>,
}

impl Roster {
    /// Roster as declared by the setup entities.
    pub fn from_states(states: &[EntityState]) -> Self {
        let entities = states
            .iter()
            .map(|s| (s.id.clone(), s.clone()))
            .collect();
        Self { entities }
    }

    /// Apply every patch of `frame` whose id is known. Collected coins keep
    /// accepting updates so the map always mirrors the recorded data.
    pub fn apply_frame(&mut self, frame: &Frame) -> Vec<EntityChange> {
        let mut changes = Vec::new();
        for patch in &frame.entities {
            let Some(id) = patch.id.as_ref() else {
                continue;
            };
            let Some(state) = self.entities.get_mut(id) else {
                continue;
            };
            if let Some(delta) = state.apply(patch) {
                changes.push(EntityChange {
                    id: id.clone(),
                    delta,
                });
            }
        }
        changes
    }

    /// Changes that turn `self` into `target`. Both rosters must come from the
    /// same timeline.
    pub fn diff(&self, target: &Roster) -> Vec<EntityChange> {
        self.entities
            .iter()
            .filter_map(|(id, cur)| {
                let next = target.entities.get(id)?;
                cur.diff(next).map(|delta| EntityChange {
                    id: id.clone(),
                    delta,
                })
            })
            .collect()
    }

    pub fn get(&self, id: &EntityId) -> Option<&EntityState> {
        self.entities.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn snapshot(&self) -> Vec<EntityState> {
        self.entities.values().cloned().collect()
    }
}
