//! Pre-resolved roster snapshots for random access into a timeline.
//!
//! Playback frames are partial, so the state at frame `n` depends on every
//! frame before it. Checkpoints store the full roster every `interval`
//! frames; resolving an index replays at most `interval` frames.

use crate::roster::Roster;
use crate::timeline::Timeline;

#[derive(Clone, Debug)]
pub struct Checkpoints {
    interval: usize,
    /// `snapshots[k]` has the first `k * interval` frames applied.
    snapshots: Vec<Roster>,
}

impl Checkpoints {
    pub fn build(timeline: &Timeline, interval: usize) -> Self {
        let interval = interval.max(1);
        let mut roster = Roster::from_states(timeline.roster());
        let mut snapshots = Vec::with_capacity(timeline.len() / interval + 1);
        for (i, frame) in timeline.frames().iter().enumerate() {
            if i % interval == 0 {
                snapshots.push(roster.clone());
            }
            roster.apply_frame(frame);
        }
        if snapshots.is_empty() {
            snapshots.push(roster);
        }
        Self {
            interval,
            snapshots,
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Roster after applying frames `0..=index`, or the setup roster for `None`.
    pub fn resolve(&self, timeline: &Timeline, index: Option<usize>) -> Roster {
        let applied = index.map_or(0, |i| (i + 1).min(timeline.len()));
        let k = (applied / self.interval).min(self.snapshots.len() - 1);
        let mut roster = self.snapshots[k].clone();
        for frame in &timeline.frames()[k * self.interval..applied] {
            roster.apply_frame(frame);
        }
        roster
    }
}
