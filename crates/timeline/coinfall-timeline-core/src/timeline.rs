//! Timeline store: setup frame plus ordered playback frames.

use hashbrown::HashSet;
use log::warn;

use crate::config::Config;
use crate::data::{EntityId, EntityState, Frame};
use crate::error::{Result, TimelineError};

/// A validated recording. The setup frame is kept apart from playback data;
/// frame indices always refer to playback frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    setup: Frame,
    roster: Vec<EntityState>,
    frames: Vec<Frame>,
}

impl Timeline {
    /// Split `frames` into setup and playback data and validate ids.
    pub fn from_frames(frames: Vec<Frame>, cfg: &Config) -> Result<Self> {
        let mut iter = frames.into_iter();
        let setup = iter.next().ok_or(TimelineError::EmptyTimeline)?;
        let frames: Vec<Frame> = iter.collect();
        if frames.is_empty() {
            return Err(TimelineError::NoPlaybackFrames);
        }

        let mut roster = Vec::with_capacity(setup.entities.len());
        let mut known: HashSet<EntityId> = HashSet::with_capacity(setup.entities.len());
        for (i, patch) in setup.entities.iter().enumerate() {
            let state = EntityState::from_setup(i, patch)?;
            if !known.insert(state.id.clone()) {
                return Err(TimelineError::DuplicateEntity {
                    id: state.id.0.clone(),
                });
            }
            roster.push(state);
        }

        for (fi, frame) in frames.iter().enumerate() {
            for patch in &frame.entities {
                let Some(id) = patch.id.as_ref() else {
                    if cfg.strict_ids {
                        return Err(TimelineError::MissingEntityId { frame: fi });
                    }
                    warn!("frame {fi}: entity patch without id is ignored");
                    continue;
                };
                if !known.contains(id) {
                    if cfg.strict_ids {
                        return Err(TimelineError::UnknownEntity {
                            frame: fi,
                            id: id.0.clone(),
                        });
                    }
                    warn!("frame {fi}: patch for unknown entity '{id}' is ignored");
                }
            }
        }

        Ok(Self {
            setup,
            roster,
            frames,
        })
    }

    pub fn setup(&self) -> &Frame {
        &self.setup
    }

    /// Setup entities resolved to full states, in declaration order.
    pub fn roster(&self) -> &[EntityState] {
        &self.roster
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Number of playback frames (setup excluded).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn initial_score(&self) -> f64 {
        self.setup.score
    }

    pub fn final_score(&self) -> f64 {
        self.frames.last().map_or(self.setup.score, |f| f.score)
    }
}

/// Parse a recorded timeline (a JSON array of frames).
pub fn parse_timeline_json(s: &str, cfg: &Config) -> Result<Timeline> {
    let frames: Vec<Frame> = serde_json::from_str(s)?;
    Timeline::from_frames(frames, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EntityKind;

    const SMALL: &str = r#"[
        { "entities": [
            { "id": "p", "label": "character", "x": 0, "y": 0 },
            { "id": "c1", "label": "coin", "x": 5, "y": 5, "variant": 2 }
          ], "score": 0 },
        { "entities": [ { "id": "p", "y": 1 } ], "score": 0.1 },
        { "entities": [ { "id": "p", "y": 2 }, { "id": "c1", "collected": true } ], "score": 0.2 }
    ]"#;

    #[test]
    fn splits_setup_from_playback() {
        let t = parse_timeline_json(SMALL, &Config::default()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.roster().len(), 2);
        assert_eq!(t.roster()[1].kind, EntityKind::Coin);
        assert_eq!(t.frame(1).unwrap().score, 0.2);
        assert_eq!(t.final_score(), 0.2);
        assert_eq!(t.initial_score(), 0.0);
    }

    #[test]
    fn rejects_empty_and_setup_only() {
        let cfg = Config::default();
        assert_eq!(
            parse_timeline_json("[]", &cfg).unwrap_err(),
            TimelineError::EmptyTimeline
        );
        assert_eq!(
            parse_timeline_json(r#"[{ "entities": [], "score": 0 }]"#, &cfg).unwrap_err(),
            TimelineError::NoPlaybackFrames
        );
    }

    #[test]
    fn rejects_duplicate_setup_ids() {
        let json = r#"[
            { "entities": [ { "id": "a", "label": "coin" }, { "id": "a", "label": "cloud" } ] },
            { "entities": [] }
        ]"#;
        let err = parse_timeline_json(json, &Config::default()).unwrap_err();
        assert_eq!(err, TimelineError::DuplicateEntity { id: "a".into() });
    }

    #[test]
    fn unknown_ids_depend_on_strictness() {
        let json = r#"[
            { "entities": [ { "id": "a", "label": "balloon" } ] },
            { "entities": [ { "id": "ghost", "x": 1 } ] }
        ]"#;
        assert!(parse_timeline_json(json, &Config::default()).is_ok());
        let strict = Config {
            strict_ids: true,
            ..Config::default()
        };
        assert_eq!(
            parse_timeline_json(json, &strict).unwrap_err(),
            TimelineError::UnknownEntity {
                frame: 0,
                id: "ghost".into()
            }
        );
    }

    #[test]
    fn id_less_patches_depend_on_strictness() {
        let json = r#"[
            { "entities": [ { "id": "a", "label": "balloon" } ] },
            { "entities": [ { "id": "a", "x": 1 } ] },
            { "entities": [ { "x": 2 } ] }
        ]"#;
        let t = parse_timeline_json(json, &Config::default()).unwrap();
        assert_eq!(t.len(), 2);
        let strict = Config {
            strict_ids: true,
            ..Config::default()
        };
        let err = parse_timeline_json(json, &strict).unwrap_err();
        assert_eq!(err, TimelineError::MissingEntityId { frame: 1 });
        assert_eq!(err.category(), "data");
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = parse_timeline_json("{ not json", &Config::default()).unwrap_err();
        assert_eq!(err.category(), "serialization");
    }
}
