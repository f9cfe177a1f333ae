use std::fmt::Display;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use coinfall_timeline_core::{
    parse_timeline_json, Config, Frame, GameSession, Outputs, Phase, Timeline,
};

#[wasm_bindgen]
pub struct CoinfallTimeline {
    session: GameSession,
    cfg: Config,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_err(context: &str, e: impl Display) -> JsError {
    JsError::new(&format!("{context}: {e}"))
}

fn timeline_from_js(data: JsValue, cfg: &Config) -> Result<Timeline, JsError> {
    if jsvalue_is_undefined_or_null(&data) {
        return Err(JsError::new("timeline: data is null/undefined"));
    }
    let frames: Vec<Frame> = swb::from_value(data).map_err(|e| js_err("timeline parse error", e))?;
    Timeline::from_frames(frames, cfg).map_err(|e| js_err("timeline error", e))
}

fn outputs_to_js(out: &Outputs) -> Result<JsValue, JsError> {
    swb::to_value(out).map_err(|e| js_err("outputs error", e))
}

#[wasm_bindgen]
impl CoinfallTimeline {
    /// Create a session from recorded frames (array, setup frame first) and an
    /// optional JSON config object (undefined/null for defaults).
    /// Example:
    ///   new CoinfallTimeline(frames, { frame_duration_ms: 1000 / 60 })
    #[wasm_bindgen(constructor)]
    pub fn new(timeline: JsValue, config: JsValue) -> Result<CoinfallTimeline, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| js_err("config error", e))?
        };
        let timeline = timeline_from_js(timeline, &cfg)?;
        let session =
            GameSession::new(timeline, cfg.clone()).map_err(|e| js_err("session error", e))?;
        Ok(CoinfallTimeline { session, cfg })
    }

    /// Replace the recording. Fails while playback is running.
    #[wasm_bindgen(js_name = load_timeline)]
    pub fn load_timeline(&mut self, data: JsValue) -> Result<(), JsError> {
        let timeline = timeline_from_js(data, &self.cfg)?;
        self.session
            .load_timeline(timeline)
            .map_err(|e| js_err("load_timeline", e))
    }

    /// Replace the recording from JSON text (e.g. an uploaded file).
    #[wasm_bindgen(js_name = load_timeline_json)]
    pub fn load_timeline_json(&mut self, text: &str) -> Result<(), JsError> {
        let timeline =
            parse_timeline_json(text, &self.cfg).map_err(|e| js_err("load_timeline_json", e))?;
        self.session
            .load_timeline(timeline)
            .map_err(|e| js_err("load_timeline_json", e))
    }

    pub fn start(&mut self) -> Result<(), JsError> {
        self.session.start().map_err(|e| js_err("start", e))
    }

    pub fn restart(&mut self) -> Result<(), JsError> {
        self.session.restart().map_err(|e| js_err("restart", e))
    }

    /// Returns whether playback is running after the toggle.
    pub fn toggle(&mut self) -> Result<bool, JsError> {
        self.session.toggle().map_err(|e| js_err("toggle", e))
    }

    pub fn play(&mut self) -> Result<bool, JsError> {
        self.session.play().map_err(|e| js_err("play", e))
    }

    pub fn pause(&mut self) -> Result<(), JsError> {
        self.session.pause().map_err(|e| js_err("pause", e))
    }

    /// Scrub to a progress ratio in [0, 1]. Returns Outputs JSON.
    pub fn seek(&mut self, progress: f64) -> Result<JsValue, JsError> {
        let out = self.session.seek(progress).map_err(|e| js_err("seek", e))?;
        outputs_to_js(out)
    }

    #[wasm_bindgen(js_name = set_fps)]
    pub fn set_fps(&mut self, fps: f64) -> Result<(), JsError> {
        self.session.set_fps(fps).map_err(|e| js_err("set_fps", e))
    }

    #[wasm_bindgen(js_name = set_frame_duration)]
    pub fn set_frame_duration(&mut self, ms: f64) -> Result<(), JsError> {
        self.session
            .set_frame_duration(ms)
            .map_err(|e| js_err("set_frame_duration", e))
    }

    #[wasm_bindgen(js_name = set_speed)]
    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsError> {
        self.session
            .set_speed(speed)
            .map_err(|e| js_err("set_speed", e))
    }

    /// Interpolate transforms between recorded frames (the "smooth" toggle).
    #[wasm_bindgen(js_name = set_smooth)]
    pub fn set_smooth(&mut self, smooth: bool) {
        self.session.set_smooth(smooth);
    }

    #[wasm_bindgen(js_name = is_smooth)]
    pub fn is_smooth(&self) -> bool {
        self.session.driver().is_smooth()
    }

    /// Step playback by dt (milliseconds). Returns Outputs JSON.
    pub fn update(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        let out = self.session.update(dt_ms);
        outputs_to_js(out)
    }

    /// Setup roster (initial placement and identity of every entity).
    #[wasm_bindgen(js_name = setup_entities)]
    pub fn setup_entities(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.session.driver().timeline().roster())
            .map_err(|e| js_err("setup_entities", e))
    }

    /// Current resolved state of every entity.
    pub fn entities(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.session.driver().roster().snapshot())
            .map_err(|e| js_err("entities", e))
    }

    pub fn stats(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.session.stats()).map_err(|e| js_err("stats", e))
    }

    pub fn phase(&self) -> String {
        match self.session.phase() {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn progress(&self) -> f64 {
        self.session.driver().progress()
    }

    #[wasm_bindgen(js_name = frame_index)]
    pub fn frame_index(&self) -> Option<u32> {
        self.session.driver().frame_index().map(|i| i as u32)
    }

    #[wasm_bindgen(js_name = frame_count)]
    pub fn frame_count(&self) -> u32 {
        self.session.driver().frame_count() as u32
    }

    #[wasm_bindgen(js_name = is_playing)]
    pub fn is_playing(&self) -> bool {
        self.session.driver().is_playing()
    }

    pub fn score(&self) -> f64 {
        self.session.driver().score()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
