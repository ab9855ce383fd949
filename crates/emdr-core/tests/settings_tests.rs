// Host-side tests for the settings record and its persistence contract.

use emdr_core::{
    hex_to_rgb, load_settings, parse_int_prefix, save_settings, KeyValueStore, MemoryStore,
    Settings, StoreError, SETTINGS_STORAGE_KEY,
};
use serde_json::Value;

fn sample() -> Settings {
    Settings {
        box_size: 300,
        ball_size: 20,
        ball_speed: 150,
        ball_color: "#ff5722".into(),
        bg_color: "#ffffff".into(),
        sound_enabled: true,
    }
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("no storage".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Rejected("quota".into()))
    }
}

#[test]
fn defaults_match_the_panel() {
    assert_eq!(Settings::default(), sample());
}

#[test]
fn record_uses_control_names_and_raw_values() {
    let json = sample().to_json().unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["boxSize"], "300");
    assert_eq!(v["ballSize"], "20");
    assert_eq!(v["ballSpeed"], "150");
    assert_eq!(v["ballColor"], "#ff5722");
    assert_eq!(v["bgColor"], "#ffffff");
    assert_eq!(v["soundEnabled"], true);
    assert_eq!(v.as_object().unwrap().len(), 6);
}

#[test]
fn save_then_load_round_trips_every_field() {
    let mut store = MemoryStore::new();
    let saved = Settings {
        box_size: 640,
        ball_size: 48,
        ball_speed: 420,
        ball_color: "#00ff00".into(),
        bg_color: "#101010".into(),
        sound_enabled: false,
    };
    save_settings(&mut store, &saved).unwrap();
    assert_eq!(load_settings(&store), Some(saved));
}

#[test]
fn save_overwrites_previous_record() {
    let mut store = MemoryStore::new();
    save_settings(&mut store, &sample()).unwrap();
    let mut next = sample();
    next.ball_speed = 999;
    save_settings(&mut store, &next).unwrap();
    assert_eq!(load_settings(&store).unwrap().ball_speed, 999);
}

#[test]
fn nothing_saved_loads_nothing() {
    assert_eq!(load_settings(&MemoryStore::new()), None);
}

#[test]
fn unparsable_or_non_object_records_are_ignored() {
    for raw in ["{not json", "null", "42", "\"text\"", "true"] {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_STORAGE_KEY, raw).unwrap();
        assert_eq!(load_settings(&store), None, "record {raw:?}");
    }
}

#[test]
fn broken_backend_loads_nothing_and_reports_save_failure() {
    assert_eq!(load_settings(&BrokenStore), None);
    let err = save_settings(&mut BrokenStore, &sample()).unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}

#[test]
fn numbers_and_numeric_strings_both_load() {
    let raw = r##"{"boxSize":500,"ballSize":"30","ballSpeed":"75.9","ballColor":"#123456","bgColor":"#abcdef","soundEnabled":true}"##;
    let s = Settings::from_json(raw).unwrap();
    assert_eq!((s.box_size, s.ball_size, s.ball_speed), (500, 30, 75));
}

#[test]
fn partial_record_is_not_merged_with_defaults() {
    let s = Settings::from_json(r#"{"boxSize":"400"}"#).unwrap();
    assert_eq!(s.box_size, 400);
    assert_eq!(s.ball_size, 0);
    assert_eq!(s.ball_speed, 0);
    assert_eq!(s.ball_color, "");
    assert_eq!(s.bg_color, "");
    assert!(!s.sound_enabled);
    assert!(s.is_stationary());
}

#[test]
fn malformed_values_flow_through_unvalidated() {
    let raw = r#"{"boxSize":"wide","ballSize":"25px","ballSpeed":null,"ballColor":"tomato","bgColor":7,"soundEnabled":1}"#;
    let s = Settings::from_json(raw).unwrap();
    assert_eq!(s.box_size, 0);
    assert_eq!(s.ball_size, 25);
    assert_eq!(s.ball_speed, 0);
    assert_eq!(s.ball_color, "tomato");
    assert_eq!(s.bg_color, "7");
    assert!(s.sound_enabled);
}

#[test]
fn oversized_box_is_kept_as_saved() {
    let raw = r##"{"boxSize":"100000","ballSize":"20","ballSpeed":"150","ballColor":"#ff5722","bgColor":"#ffffff","soundEnabled":false}"##;
    assert_eq!(Settings::from_json(raw).unwrap().box_size, 100_000);
}

#[test]
fn parse_int_prefix_follows_control_semantics() {
    assert_eq!(parse_int_prefix("300"), Some(300));
    assert_eq!(parse_int_prefix("  42px"), Some(42));
    assert_eq!(parse_int_prefix("-7"), Some(-7));
    assert_eq!(parse_int_prefix("+8"), Some(8));
    assert_eq!(parse_int_prefix("12.9"), Some(12));
    assert_eq!(parse_int_prefix(""), None);
    assert_eq!(parse_int_prefix("px"), None);
    assert_eq!(parse_int_prefix("-"), None);
    assert_eq!(parse_int_prefix("99999999999"), Some(i32::MAX));
}

#[test]
fn derived_helpers() {
    let s = sample();
    assert_eq!(s.travel_distance(), 280);
    assert_eq!(s.ball_radius(), 10.0);
    assert!(!s.is_stationary());
}

#[test]
fn hex_colors_parse_long_and_short_forms() {
    assert_eq!(hex_to_rgb("#ff0000"), Some([1.0, 0.0, 0.0]));
    assert_eq!(hex_to_rgb("#fff"), Some([1.0, 1.0, 1.0]));
    let [r, g, b] = hex_to_rgb("#ff5722").unwrap();
    assert!((r - 1.0).abs() < 1e-6);
    assert!((g - 87.0 / 255.0).abs() < 1e-6);
    assert!((b - 34.0 / 255.0).abs() < 1e-6);
    assert_eq!(hex_to_rgb("tomato"), None);
    assert_eq!(hex_to_rgb("#12345"), None);
    assert_eq!(hex_to_rgb("#gg0000"), None);
}
