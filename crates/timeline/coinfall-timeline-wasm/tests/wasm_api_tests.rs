#![cfg(target_arch = "wasm32")]
use coinfall_timeline_wasm::{abi_version, CoinfallTimeline};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const FALLING_RUN: &str = include_str!("../../../../fixtures/timelines/falling-run.json");

// Plain JS objects, as the game hands over after JSON.parse.
fn frames_js() -> JsValue {
    js_sys::JSON::parse(FALLING_RUN).unwrap()
}

fn config_js() -> JsValue {
    js_sys::JSON::parse(r#"{ "frame_duration_ms": 10 }"#).unwrap()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_default_config() {
    let t = CoinfallTimeline::new(frames_js(), JsValue::UNDEFINED);
    assert!(t.is_ok());
    let t = t.unwrap();
    assert_eq!(t.frame_count(), 12);
    assert_eq!(t.phase(), "idle");
    assert_eq!(t.frame_index(), None);
}

#[wasm_bindgen_test]
fn rejects_missing_timeline() {
    assert!(CoinfallTimeline::new(JsValue::NULL, JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn start_update_and_finish() {
    let mut t = CoinfallTimeline::new(frames_js(), config_js()).unwrap();
    t.start().unwrap();
    assert!(t.is_playing());

    let out = t.update(5.0).unwrap();
    assert_eq!(get(&out, "frame_index").as_f64(), Some(0.0));
    let changes = js_sys::Array::from(&get(&out, "changes"));
    assert_eq!(changes.length(), 1);

    t.update(1_000.0).unwrap();
    assert_eq!(t.phase(), "game_over");
    assert_eq!(t.score(), 30.5);
    let stats = t.stats().unwrap();
    assert_eq!(get(&stats, "reward").as_f64(), Some(25.0));
    t.restart().unwrap();
    assert_eq!(t.phase(), "running");
}

#[wasm_bindgen_test]
fn upload_refused_while_playing() {
    let mut t = CoinfallTimeline::new(frames_js(), config_js()).unwrap();
    t.start().unwrap();
    assert!(t.load_timeline_json(FALLING_RUN).is_err());
    t.pause().unwrap();
    assert!(t.load_timeline_json(FALLING_RUN).is_ok());
    assert!(t.load_timeline_json("[]").is_err());
}

#[wasm_bindgen_test]
fn setup_entities_lists_roster() {
    let t = CoinfallTimeline::new(frames_js(), JsValue::UNDEFINED).unwrap();
    let roster = js_sys::Array::from(&t.setup_entities().unwrap());
    assert_eq!(roster.length(), 5);
    let first = roster.get(0);
    assert_eq!(get(&first, "label").as_string().as_deref(), Some("character"));
}

#[wasm_bindgen_test]
fn smooth_toggle_blends_between_frames() {
    let mut t = CoinfallTimeline::new(frames_js(), config_js()).unwrap();
    assert!(!t.is_smooth());
    t.set_smooth(true);
    assert!(t.is_smooth());
    t.start().unwrap();
    t.pause().unwrap();
    // Halfway through frame 0: p.y sits between 10 and 20.
    let out = t.seek(0.5 / 12.0).unwrap();
    let changes = js_sys::Array::from(&get(&out, "changes"));
    let last = changes.get(changes.length() - 1);
    let y = get(&get(&last, "delta"), "y").as_f64().unwrap();
    assert!((y - 15.0).abs() < 1e-9);
}
