//! Recorded timeline data model.
//!
//! A timeline is a list of [`Frame`]s. Each frame carries partial entity
//! states ([`EntityPatch`]) where any omitted field means "unchanged", plus
//! the cumulative score at that frame. The first frame of a recording is the
//! setup frame and declares the roster.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Stable entity identifier, unique across the whole timeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What an entity is, taken from its recorded `label`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    Character,
    Coin,
    Balloon,
    Cloud,
    Other(String),
}

impl EntityKind {
    pub fn label(&self) -> &str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Coin => "coin",
            EntityKind::Balloon => "balloon",
            EntityKind::Cloud => "cloud",
            EntityKind::Other(s) => s,
        }
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "character" => EntityKind::Character,
            "coin" => EntityKind::Coin,
            "balloon" => EntityKind::Balloon,
            "cloud" => EntityKind::Cloud,
            _ => EntityKind::Other(s),
        }
    }
}

impl From<EntityKind> for String {
    fn from(k: EntityKind) -> Self {
        match k {
            EntityKind::Other(s) => s,
            other => other.label().to_string(),
        }
    }
}

/// Partial entity state as recorded in a frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<EntityKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,
}

impl EntityPatch {
    /// Patch addressing `id` with no fields set.
    pub fn for_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn collected(mut self) -> Self {
        self.collected = Some(true);
        self
    }

    pub fn flipped(mut self) -> Self {
        self.flipped = Some(true);
        self
    }
}

/// Fields that changed on one entity when a patch was applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,
}

impl EntityDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fully resolved state of one entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState {
    pub id: EntityId,
    #[serde(rename = "label")]
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub collected: bool,
    pub flipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,
}

fn write_field<T: PartialEq + Copy>(slot: &mut T, incoming: Option<T>, changed: &mut Option<T>) {
    if let Some(v) = incoming {
        if *slot != v {
            *slot = v;
            *changed = Some(v);
        }
    }
}

impl EntityState {
    /// Build the initial state from a setup-frame patch. `index` is the
    /// position within the setup frame and only used for error reporting.
    pub fn from_setup(index: usize, patch: &EntityPatch) -> Result<Self> {
        let id = patch
            .id
            .clone()
            .ok_or_else(|| TimelineError::InvalidSetupEntity {
                index,
                field: "id".into(),
            })?;
        let kind = patch
            .label
            .clone()
            .ok_or_else(|| TimelineError::InvalidSetupEntity {
                index,
                field: "label".into(),
            })?;
        Ok(Self {
            id,
            kind,
            x: patch.x.unwrap_or(0.0),
            y: patch.y.unwrap_or(0.0),
            rotation: patch.rotation.unwrap_or(0.0),
            scale_x: patch.scale_x.unwrap_or(1.0),
            scale_y: patch.scale_y.unwrap_or(1.0),
            collected: patch.collected.unwrap_or(false),
            flipped: patch.flipped.unwrap_or(false),
            variant: patch.variant,
        })
    }

    /// Write every present field of `patch`; returns the fields that changed.
    /// Identity (`id`, `label`) is never rewritten by playback frames.
    pub fn apply(&mut self, patch: &EntityPatch) -> Option<EntityDelta> {
        let mut d = EntityDelta::default();
        write_field(&mut self.x, patch.x, &mut d.x);
        write_field(&mut self.y, patch.y, &mut d.y);
        write_field(&mut self.rotation, patch.rotation, &mut d.rotation);
        write_field(&mut self.scale_x, patch.scale_x, &mut d.scale_x);
        write_field(&mut self.scale_y, patch.scale_y, &mut d.scale_y);
        write_field(&mut self.collected, patch.collected, &mut d.collected);
        write_field(&mut self.flipped, patch.flipped, &mut d.flipped);
        if patch.variant.is_some() && self.variant != patch.variant {
            self.variant = patch.variant;
            d.variant = patch.variant;
        }
        if d.is_empty() {
            None
        } else {
            Some(d)
        }
    }

    /// Delta that turns `self` into `other` (same entity assumed). A variant
    /// reset to `None` is not representable and is ignored.
    pub fn diff(&self, other: &EntityState) -> Option<EntityDelta> {
        fn changed<T: PartialEq + Copy>(a: T, b: T) -> Option<T> {
            (a != b).then_some(b)
        }
        let d = EntityDelta {
            x: changed(self.x, other.x),
            y: changed(self.y, other.y),
            rotation: changed(self.rotation, other.rotation),
            scale_x: changed(self.scale_x, other.scale_x),
            scale_y: changed(self.scale_y, other.scale_y),
            collected: changed(self.collected, other.collected),
            flipped: changed(self.flipped, other.flipped),
            variant: if self.variant != other.variant {
                other.variant
            } else {
                None
            },
        };
        if d.is_empty() {
            None
        } else {
            Some(d)
        }
    }
}

/// One recorded frame: partial entity states and the cumulative score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    pub entities: Vec<EntityPatch>,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin() -> EntityState {
        let patch: EntityPatch = serde_json::from_str(
            r#"{ "id": "c1", "label": "coin", "x": 10, "y": 20, "variant": 2 }"#,
        )
        .unwrap();
        EntityState::from_setup(0, &patch).unwrap()
    }

    #[test]
    fn setup_defaults_missing_fields() {
        let c = coin();
        assert_eq!(c.kind, EntityKind::Coin);
        assert_eq!(c.rotation, 0.0);
        assert_eq!(c.scale_x, 1.0);
        assert_eq!(c.scale_y, 1.0);
        assert!(!c.collected);
        assert_eq!(c.variant, Some(2));
    }

    #[test]
    fn setup_requires_id_and_label() {
        let err = EntityState::from_setup(4, &EntityPatch::default()).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidSetupEntity {
                index: 4,
                field: "id".into()
            }
        );
        let err = EntityState::from_setup(1, &EntityPatch::for_id("a")).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidSetupEntity { field, .. } if field == "label"));
    }

    #[test]
    fn apply_reports_only_changed_fields() {
        let mut c = coin();
        let d = c.apply(&EntityPatch::for_id("c1").at(10.0, 25.0)).unwrap();
        assert_eq!(d.x, None);
        assert_eq!(d.y, Some(25.0));
        assert_eq!(c.y, 25.0);
        assert!(c.apply(&EntityPatch::for_id("c1").at(10.0, 25.0)).is_none());
    }

    #[test]
    fn diff_round_trips_state() {
        let a = coin();
        let mut b = a.clone();
        b.apply(&EntityPatch::for_id("c1").at(1.0, 2.0).collected());
        let d = a.diff(&b).unwrap();
        assert_eq!(d.x, Some(1.0));
        assert_eq!(d.collected, Some(true));
        assert_eq!(d.rotation, None);
        assert!(a.diff(&a).is_none());
    }

    #[test]
    fn unknown_labels_are_preserved() {
        let k: EntityKind = serde_json::from_str(r#""kite""#).unwrap();
        assert_eq!(k, EntityKind::Other("kite".into()));
        assert_eq!(serde_json::to_string(&k).unwrap(), r#""kite""#);
        assert_eq!(
            serde_json::to_string(&EntityKind::Balloon).unwrap(),
            r#""balloon""#
        );
    }

    #[test]
    fn frame_parses_camel_case() {
        let f: Frame = serde_json::from_str(
            r#"{ "entities": [ { "id": "p", "scaleX": -1, "flipped": true } ], "score": 1.5 }"#,
        )
        .unwrap();
        assert_eq!(f.entities[0].scale_x, Some(-1.0));
        assert_eq!(f.entities[0].flipped, Some(true));
        assert_eq!(f.score, 1.5);
    }
}
