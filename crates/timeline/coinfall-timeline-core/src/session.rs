//! Game flow around a playback driver: start screen, run, game over.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::EntityId;
use crate::driver::PlaybackDriver;
use crate::error::{Result, TimelineError};
use crate::outputs::{Outputs, TimelineEvent};
use crate::timeline::Timeline;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting on the start screen.
    Idle,
    Running,
    GameOver,
}

/// Per-run tallies kept alongside the recorded score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub collected: Vec<EntityId>,
    /// Sum of collected coin values, each coin counted once.
    pub reward: f64,
    pub flips: u32,
    pub score: f64,
}

impl RunStats {
    fn observe(&mut self, ev: &TimelineEvent) {
        match ev {
            TimelineEvent::CoinCollected { id, value, .. } => {
                if !self.collected.contains(id) {
                    self.collected.push(id.clone());
                    self.reward += value;
                }
            }
            TimelineEvent::Flipped { .. } => self.flips += 1,
            TimelineEvent::ScoreChanged { new, .. } => self.score = *new,
            TimelineEvent::PlaybackEnded { score } => self.score = *score,
            _ => {}
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    driver: PlaybackDriver,
    phase: Phase,
    stats: RunStats,
}

impl GameSession {
    pub fn new(timeline: Timeline, cfg: Config) -> Result<Self> {
        Ok(Self {
            driver: PlaybackDriver::new(timeline, cfg)?,
            phase: Phase::Idle,
            stats: RunStats::default(),
        })
    }

    /// Swap in a new recording. Refused while playback is running; keeps the
    /// current playback rate and smoothing. Entity ids change with the
    /// recording, so hosts respawn their scene from the new setup roster
    /// instead of expecting changes for the old one.
    pub fn load_timeline(&mut self, timeline: Timeline) -> Result<()> {
        if self.driver.is_playing() {
            return Err(TimelineError::Busy);
        }
        let mut cfg = self.driver.config().clone();
        cfg.frame_duration_ms = self.driver.frame_duration_ms();
        cfg.speed = self.driver.speed();
        cfg.smooth = self.driver.is_smooth();
        self.driver = PlaybackDriver::new(timeline, cfg)?;
        self.phase = Phase::Idle;
        self.stats = RunStats::default();
        debug!("session: timeline loaded, back to idle");
        Ok(())
    }

    /// Leave the start screen (or a finished run) and begin playing.
    pub fn start(&mut self) -> Result<()> {
        if self.phase == Phase::Running {
            return Err(self.phase_error("running"));
        }
        self.driver.reset();
        self.stats = RunStats {
            score: self.driver.score(),
            ..RunStats::default()
        };
        self.phase = Phase::Running;
        self.driver.play();
        debug!("session: run started");
        Ok(())
    }

    pub fn restart(&mut self) -> Result<()> {
        if self.phase != Phase::GameOver {
            return Err(self.phase_error("restart"));
        }
        self.start()
    }

    /// Pointer-down on the scene: pause when playing, resume otherwise.
    pub fn toggle(&mut self) -> Result<bool> {
        self.require_running("toggle")?;
        Ok(self.driver.toggle())
    }

    pub fn play(&mut self) -> Result<bool> {
        self.require_running("play")?;
        Ok(self.driver.play())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.require_running("pause")?;
        self.driver.pause();
        Ok(())
    }

    pub fn set_fps(&mut self, fps: f64) -> Result<()> {
        self.driver.set_fps(fps)
    }

    pub fn set_frame_duration(&mut self, ms: f64) -> Result<()> {
        self.driver.set_frame_duration(ms)
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.driver.set_speed(speed)
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.driver.set_smooth(smooth);
    }

    pub fn update(&mut self, dt_ms: f64) -> &Outputs {
        self.driver.update(dt_ms);
        self.observe_outputs();
        self.driver.outputs()
    }

    /// Progress-bar scrub; only meaningful during a run.
    pub fn seek(&mut self, progress: f64) -> Result<&Outputs> {
        self.require_running("seek")?;
        self.driver.seek(progress);
        self.observe_outputs();
        Ok(self.driver.outputs())
    }

    fn observe_outputs(&mut self) {
        for ev in &self.driver.outputs().events {
            self.stats.observe(ev);
            if matches!(ev, TimelineEvent::PlaybackEnded { .. }) {
                self.phase = Phase::GameOver;
                debug!("session: game over");
            }
        }
    }

    fn require_running(&self, requested: &str) -> Result<()> {
        if self.phase == Phase::Running {
            Ok(())
        } else {
            Err(self.phase_error(requested))
        }
    }

    fn phase_error(&self, requested: &str) -> TimelineError {
        TimelineError::InvalidPhase {
            current: format!("{:?}", self.phase),
            requested: requested.to_string(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn driver(&self) -> &PlaybackDriver {
        &self.driver
    }
}
