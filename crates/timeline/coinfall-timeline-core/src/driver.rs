//! Playback driver: progress, frame index and entity state application.
//!
//! Methods:
//! - play / pause / toggle, set_fps / set_frame_duration / set_speed
//! - update (ticked time → progress), seek (manual scrub)
//! - set_smooth (interpolate transforms between recorded frames)
//!
//! Progress is the single source of truth. Both ticked time and scrubbing
//! write it, and every write funnels through `apply_progress`, which moves
//! the live roster to the frame the new progress maps onto.

use hashbrown::HashSet;
use indexmap::IndexMap;
use log::{debug, warn};

use crate::blend::{blend, settle};
use crate::checkpoints::Checkpoints;
use crate::clock::{
    clamp_progress, frame_duration_from_fps, frame_index_for_progress, progress_for_frame,
    total_duration_ms, validate_frame_duration,
};
use crate::coins::coin_variant;
use crate::config::{Config, EventPolicy};
use crate::data::{EntityDelta, EntityId, EntityKind, Frame};
use crate::error::{Result, TimelineError};
use crate::outputs::{EntityChange, FlipDirection, Outputs, TimelineEvent};
use crate::roster::Roster;
use crate::timeline::Timeline;

/// Guards for one-shot events so revisiting a frame does not re-fire them.
#[derive(Debug, Default)]
struct FiredEvents {
    coins: HashSet<EntityId>,
    flips: HashSet<(usize, EntityId)>,
}

impl FiredEvents {
    fn contains(&self, ev: &TimelineEvent) -> bool {
        match ev {
            TimelineEvent::CoinCollected { id, .. } => self.coins.contains(id),
            TimelineEvent::Flipped { id, frame, .. } => self.flips.contains(&(*frame, id.clone())),
            _ => false,
        }
    }

    fn mark(&mut self, ev: &TimelineEvent) {
        match ev {
            TimelineEvent::CoinCollected { id, .. } => {
                self.coins.insert(id.clone());
            }
            TimelineEvent::Flipped { id, frame, .. } => {
                self.flips.insert((*frame, id.clone()));
            }
            _ => {}
        }
    }
}

#[derive(Debug)]
pub struct PlaybackDriver {
    cfg: Config,
    timeline: Timeline,
    checkpoints: Checkpoints,
    roster: Roster,

    progress: f64,
    applied: Option<usize>,
    score: f64,
    frame_duration_ms: f64,
    speed: f64,
    smooth: bool,
    /// Interpolated fields adapters currently show, per entity.
    blended: IndexMap<EntityId, EntityDelta>,

    playing: bool,
    started: bool,
    ended: bool,

    fired: FiredEvents,
    /// Events raised by control calls, flushed into the next outputs.
    pending: Vec<TimelineEvent>,
    /// Entity changes raised outside a tick (reset, smoothing off).
    staged: Vec<EntityChange>,
    outputs: Outputs,
}

impl PlaybackDriver {
    pub fn new(timeline: Timeline, cfg: Config) -> Result<Self> {
        let frame_duration_ms = validate_frame_duration(cfg.frame_duration_ms)?;
        if !cfg.speed.is_finite() || cfg.speed < 0.0 {
            return Err(TimelineError::InvalidRate {
                reason: format!("speed must be finite and >= 0, got {}", cfg.speed),
            });
        }
        let checkpoints = Checkpoints::build(&timeline, cfg.checkpoint_interval);
        let roster = Roster::from_states(timeline.roster());
        let score = timeline.initial_score();
        debug!(
            "timeline loaded: {} frames, {} entities, {} checkpoints",
            timeline.len(),
            roster.len(),
            checkpoints.len()
        );
        let mut driver = Self {
            speed: cfg.speed,
            smooth: cfg.smooth,
            blended: IndexMap::new(),
            cfg,
            timeline,
            checkpoints,
            roster,
            progress: 0.0,
            applied: None,
            score,
            frame_duration_ms,
            playing: false,
            started: false,
            ended: false,
            fired: FiredEvents::default(),
            pending: Vec::new(),
            staged: Vec::new(),
            outputs: Outputs::default(),
        };
        driver.sync_status();
        Ok(driver)
    }

    /// Rewind to the setup state: progress 0, guards cleared, not playing.
    /// The changes that take the scene back to setup are flushed into the
    /// next outputs.
    pub fn reset(&mut self) {
        let setup = Roster::from_states(self.timeline.roster());
        let mut changes = self.roster.diff(&setup);
        for (id, shown) in self.blended.drain(..) {
            if let Some(delta) = setup.get(&id).and_then(|s| settle(s, &shown, None)) {
                changes.push(EntityChange { id, delta });
            }
        }
        self.roster = setup;
        self.progress = 0.0;
        self.applied = None;
        self.score = self.timeline.initial_score();
        self.playing = false;
        self.started = false;
        self.ended = false;
        self.fired = FiredEvents::default();
        self.pending.clear();
        self.staged = changes;
        self.outputs.clear();
        self.sync_status();
    }

    /// Start or resume ticking. Returns false when already at the end.
    pub fn play(&mut self) -> bool {
        if self.playing {
            return true;
        }
        if self.progress >= 1.0 {
            debug!("play ignored: playback already at the end");
            return false;
        }
        self.playing = true;
        if self.started {
            self.pending.push(TimelineEvent::PlaybackResumed);
        } else {
            self.started = true;
            self.pending.push(TimelineEvent::PlaybackStarted);
        }
        true
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.pending.push(TimelineEvent::PlaybackPaused);
    }

    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
        self.playing
    }

    /// Change the per-frame duration. Progress is preserved, so the visible
    /// frame does not jump.
    pub fn set_frame_duration(&mut self, ms: f64) -> Result<()> {
        self.frame_duration_ms = validate_frame_duration(ms)?;
        self.pending.push(TimelineEvent::SpeedChanged {
            frame_duration_ms: self.frame_duration_ms,
            speed: self.speed,
        });
        Ok(())
    }

    /// Interpolate transforms between the current and the next recorded
    /// frame. Turning it off settles blended entities on their recorded state
    /// in the next outputs.
    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
        if !smooth {
            for (id, shown) in std::mem::take(&mut self.blended) {
                if let Some(delta) = self.roster.get(&id).and_then(|s| settle(s, &shown, None)) {
                    self.staged.push(EntityChange { id, delta });
                }
            }
        }
    }

    pub fn set_fps(&mut self, fps: f64) -> Result<()> {
        self.set_frame_duration(frame_duration_from_fps(fps)?)
    }

    /// Multiplier applied to ticked time; `0` freezes without pausing.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(TimelineError::InvalidRate {
                reason: format!("speed must be finite and >= 0, got {speed}"),
            });
        }
        self.speed = speed;
        self.pending.push(TimelineEvent::SpeedChanged {
            frame_duration_ms: self.frame_duration_ms,
            speed,
        });
        Ok(())
    }

    /// Advance by `dt_ms` of wall-clock time when playing.
    pub fn update(&mut self, dt_ms: f64) -> &Outputs {
        self.begin_tick();
        if self.playing && dt_ms.is_finite() && dt_ms > 0.0 {
            let total = self.total_duration_ms();
            let next = self.progress + dt_ms * self.speed / total;
            self.apply_progress(next);
        }
        self.sync_status();
        &self.outputs
    }

    /// Scrub to `progress` (clamped to [0, 1]).
    pub fn seek(&mut self, progress: f64) -> &Outputs {
        self.begin_tick();
        self.apply_progress(progress);
        self.sync_status();
        &self.outputs
    }

    /// Scrub onto playback frame `index`.
    pub fn seek_frame(&mut self, index: usize) -> &Outputs {
        let p = progress_for_frame(index, self.timeline.len());
        self.seek(p)
    }

    fn begin_tick(&mut self) {
        self.outputs.clear();
        self.outputs.changes.append(&mut self.staged);
        for ev in std::mem::take(&mut self.pending) {
            self.emit(ev);
        }
    }

    fn sync_status(&mut self) {
        self.outputs.progress = self.progress;
        self.outputs.frame_index = self.applied;
        self.outputs.score = self.score;
        self.outputs.playing = self.playing;
    }

    /// Returns false when the event was dropped by the per-tick budget.
    fn emit(&mut self, ev: TimelineEvent) -> bool {
        if self.outputs.events.len() >= self.cfg.max_events_per_tick {
            warn!("event budget exceeded, dropping {ev:?}");
            return false;
        }
        self.outputs.push_event(ev);
        true
    }

    fn apply_progress(&mut self, progress: f64) {
        self.progress = clamp_progress(progress);
        let target = frame_index_for_progress(self.progress, self.timeline.len());

        if target != self.applied {
            if let Some(to) = target {
                let prev = self.applied;
                match prev {
                    Some(from) if to < from => self.rewind_to(to),
                    from => self.advance_to(from, to),
                }
                let from = self.applied;
                self.applied = Some(to);
                debug!("frame {from:?} -> {to}");
                self.emit(TimelineEvent::FrameChanged { from, to });
                self.update_score(to);
            }
        }

        if self.progress < 1.0 {
            self.ended = false;
        } else if !self.ended {
            self.ended = true;
            self.playing = false;
            debug!("playback ended with score {}", self.score);
            self.emit(TimelineEvent::PlaybackEnded { score: self.score });
        }

        self.refresh_blend();
    }

    /// Apply every frame after `from` up to and including `to`, so nothing
    /// recorded in skipped frames is lost.
    fn advance_to(&mut self, from: Option<usize>, to: usize) {
        let start = from.map_or(0, |f| f + 1);
        for index in start..=to {
            let Some(frame) = self.timeline.frame(index) else {
                break;
            };
            let changes = self.roster.apply_frame(frame);
            let events = frame_events(&self.roster, index, frame);
            self.outputs.changes.extend(changes);
            let every_visit = self.cfg.event_policy == EventPolicy::EveryVisit;
            for ev in events {
                if !every_visit && self.fired.contains(&ev) {
                    continue;
                }
                // Events dropped by the budget stay unmarked.
                if self.emit(ev.clone()) {
                    self.fired.mark(&ev);
                }
            }
        }
    }

    /// Jump backward: rebuild the roster from checkpoints and emit only the
    /// resulting state differences.
    fn rewind_to(&mut self, to: usize) {
        let resolved = self.checkpoints.resolve(&self.timeline, Some(to));
        let changes = self.roster.diff(&resolved);
        self.roster = resolved;
        self.outputs.changes.extend(changes);
    }

    /// Re-derive interpolated transforms for the current progress and emit
    /// them, settling fields that are no longer blended.
    fn refresh_blend(&mut self) {
        let mut next_blend = IndexMap::new();
        if let (true, Some(index)) = (self.smooth, self.applied) {
            if let Some(next) = self.timeline.frame(index + 1) {
                let t = (self.progress * self.timeline.len() as f64 - index as f64).clamp(0.0, 1.0);
                for patch in &next.entities {
                    let Some(id) = patch.id.as_ref() else {
                        continue;
                    };
                    let Some(state) = self.roster.get(id) else {
                        continue;
                    };
                    if let Some(delta) = blend(state, patch, t) {
                        next_blend.insert(id.clone(), delta);
                    }
                }
            }
        }

        let previous = std::mem::replace(&mut self.blended, next_blend);
        for (id, shown) in &previous {
            let Some(state) = self.roster.get(id) else {
                continue;
            };
            if let Some(delta) = settle(state, shown, self.blended.get(id)) {
                self.outputs.push_change(EntityChange {
                    id: id.clone(),
                    delta,
                });
            }
        }
        for (id, delta) in &self.blended {
            self.outputs.push_change(EntityChange {
                id: id.clone(),
                delta: delta.clone(),
            });
        }
    }

    fn update_score(&mut self, index: usize) {
        let new = self
            .timeline
            .frame(index)
            .map_or(self.timeline.initial_score(), |f| f.score);
        if new != self.score {
            let old = self.score;
            self.score = new;
            self.emit(TimelineEvent::ScoreChanged { old, new });
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Last applied playback frame.
    pub fn frame_index(&self) -> Option<usize> {
        self.applied
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.applied.and_then(|i| self.timeline.frame(i))
    }

    pub fn frame_count(&self) -> usize {
        self.timeline.len()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.ended
    }

    pub fn frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn total_duration_ms(&self) -> f64 {
        total_duration_ms(self.timeline.len(), self.frame_duration_ms)
    }
}

/// One-shot events raised by applying `frame` at `index`, before guarding.
fn frame_events(roster: &Roster, index: usize, frame: &Frame) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    for patch in &frame.entities {
        let Some(id) = patch.id.as_ref() else {
            continue;
        };
        let Some(state) = roster.get(id) else {
            continue;
        };
        match state.kind {
            EntityKind::Coin if patch.collected == Some(true) => {
                let v = coin_variant(state.variant);
                events.push(TimelineEvent::CoinCollected {
                    id: id.clone(),
                    variant: v.id,
                    value: v.value,
                });
            }
            EntityKind::Character if patch.flipped == Some(true) => {
                events.push(TimelineEvent::Flipped {
                    id: id.clone(),
                    direction: FlipDirection::Left,
                    frame: index,
                });
            }
            _ => {}
        }
    }
    events
}
