// Host-side tests for the desktop keyboard bindings.

use emdr_core::{
    apply_command, command_for_key, grown_box_size, load_settings, BallController, BallRenderer,
    FileStore, KeyCommand, KeyValueStore, MemoryStore, Settings, SoundCue, StoreError,
    BALL_SIZE_STEP, BOX_SIZE_STEP, SETTINGS_STORAGE_KEY, SPEED_STEP,
};
use std::cell::Cell;
use std::rc::Rc;

struct NullRenderer;

impl BallRenderer for NullRenderer {
    fn configure(&mut self, _settings: &Settings, _half_cycle_secs: Option<f64>) {}

    fn set_visible(&mut self, _visible: bool) {}
}

struct CountingSound(Rc<Cell<u32>>);

impl SoundCue for CountingSound {
    fn play(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

fn controller(settings: Settings) -> BallController {
    let plays = Rc::new(Cell::new(0));
    BallController::simulated(settings, Box::new(NullRenderer), Box::new(CountingSound(plays)))
}

fn press(c: &mut BallController, store: &mut dyn KeyValueStore, key: &str, max_box: Option<i32>) {
    let command = command_for_key(key).unwrap_or_else(|| panic!("{key:?} is not bound"));
    apply_command(command, c, store, max_box).unwrap();
}

struct RejectingStore;

impl KeyValueStore for RejectingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Rejected("read-only".into()))
    }
}

#[test]
fn bound_keys_map_to_commands() {
    let cases = [
        (" ", KeyCommand::TogglePause),
        ("h", KeyCommand::ToggleBall),
        ("H", KeyCommand::ToggleBall),
        ("s", KeyCommand::Save),
        ("ArrowLeft", KeyCommand::Slower),
        ("ArrowRight", KeyCommand::Faster),
        ("ArrowUp", KeyCommand::GrowBox),
        ("ArrowDown", KeyCommand::ShrinkBox),
        ("[", KeyCommand::ShrinkBall),
        ("]", KeyCommand::GrowBall),
        ("M", KeyCommand::ToggleSound),
        ("r", KeyCommand::Reverse),
    ];
    for (key, command) in cases {
        assert_eq!(command_for_key(key), Some(command), "key {key:?}");
    }
}

#[test]
fn unbound_keys_are_ignored() {
    for key in ["x", "Enter", "1", "", "Escape"] {
        assert_eq!(command_for_key(key), None, "key {key:?}");
    }
}

#[test]
fn steps_adjust_speed_and_sizes() {
    let mut c = controller(Settings::default());
    let mut store = MemoryStore::new();
    let start = c.settings().clone();

    press(&mut c, &mut store, "ArrowRight", None);
    assert_eq!(c.settings().ball_speed, start.ball_speed + SPEED_STEP);
    press(&mut c, &mut store, "ArrowLeft", None);
    press(&mut c, &mut store, "ArrowLeft", None);
    assert_eq!(c.settings().ball_speed, start.ball_speed - SPEED_STEP);

    press(&mut c, &mut store, "ArrowUp", None);
    assert_eq!(c.settings().box_size, start.box_size + BOX_SIZE_STEP);
    press(&mut c, &mut store, "ArrowDown", None);
    assert_eq!(c.settings().box_size, start.box_size);

    press(&mut c, &mut store, "]", None);
    assert_eq!(c.settings().ball_size, start.ball_size + BALL_SIZE_STEP);
    press(&mut c, &mut store, "[", None);
    assert_eq!(c.settings().ball_size, start.ball_size);
}

#[test]
fn shrinking_stops_at_zero() {
    let mut c = controller(Settings {
        box_size: 5,
        ball_size: 1,
        ball_speed: 3,
        ..Settings::default()
    });
    let mut store = MemoryStore::new();
    press(&mut c, &mut store, "ArrowLeft", None);
    press(&mut c, &mut store, "ArrowDown", None);
    press(&mut c, &mut store, "[", None);
    assert_eq!(c.settings().ball_speed, 0);
    assert_eq!(c.settings().box_size, 0);
    assert_eq!(c.settings().ball_size, 0);
    assert_eq!(c.half_cycle_secs(), None);
}

#[test]
fn extreme_saved_values_saturate_instead_of_overflowing() {
    let mut c = controller(Settings::default());
    let mut store = MemoryStore::new();
    store
        .set(
            SETTINGS_STORAGE_KEY,
            r##"{"boxSize":"-99999999999","ballSize":"99999999999","ballSpeed":"99999999999","ballColor":"#000000","bgColor":"#ffffff","soundEnabled":true}"##,
        )
        .unwrap();
    assert!(c.load(&store));
    assert_eq!(c.settings().ball_speed, i32::MAX);
    assert_eq!(c.settings().box_size, i32::MIN);
    assert_eq!(c.settings().ball_size, i32::MAX);

    press(&mut c, &mut store, "ArrowRight", None);
    assert_eq!(c.settings().ball_speed, i32::MAX);
    press(&mut c, &mut store, "]", None);
    assert_eq!(c.settings().ball_size, i32::MAX);
    press(&mut c, &mut store, "ArrowDown", None);
    assert_eq!(c.settings().box_size, 0);

    let mut c = controller(Settings {
        box_size: i32::MAX,
        ball_speed: i32::MIN,
        ball_size: i32::MIN,
        ..Settings::default()
    });
    press(&mut c, &mut store, "ArrowUp", None);
    assert_eq!(c.settings().box_size, i32::MAX);
    press(&mut c, &mut store, "ArrowLeft", None);
    assert_eq!(c.settings().ball_speed, 0);
    press(&mut c, &mut store, "[", None);
    assert_eq!(c.settings().ball_size, 0);
}

#[test]
fn box_growth_is_capped_by_monitor_width() {
    assert_eq!(grown_box_size(300, None), 300 + BOX_SIZE_STEP);
    assert_eq!(grown_box_size(300, Some(1920)), 300 + BOX_SIZE_STEP);
    assert_eq!(grown_box_size(1910, Some(1920)), 1920);
    assert_eq!(grown_box_size(1920, Some(1920)), 1920);

    let mut c = controller(Settings {
        box_size: 1910,
        ..Settings::default()
    });
    let mut store = MemoryStore::new();
    press(&mut c, &mut store, "ArrowUp", Some(1920));
    assert_eq!(c.settings().box_size, 1920);
    press(&mut c, &mut store, "ArrowUp", Some(1920));
    assert_eq!(c.settings().box_size, 1920);
}

#[test]
fn oversized_box_is_left_alone_when_growing() {
    assert_eq!(grown_box_size(2500, Some(1920)), 2500);

    let mut c = controller(Settings {
        box_size: 2500,
        ..Settings::default()
    });
    let mut store = MemoryStore::new();
    press(&mut c, &mut store, "ArrowUp", Some(1920));
    assert_eq!(c.settings().box_size, 2500);
    press(&mut c, &mut store, "ArrowDown", Some(1920));
    assert_eq!(c.settings().box_size, 2500 - BOX_SIZE_STEP);
}

#[test]
fn toggles_flip_state() {
    let mut c = controller(Settings::default());
    let mut store = MemoryStore::new();

    press(&mut c, &mut store, " ", None);
    assert!(c.is_paused());
    press(&mut c, &mut store, " ", None);
    assert!(!c.is_paused());

    press(&mut c, &mut store, "h", None);
    assert!(!c.is_ball_visible());
    press(&mut c, &mut store, "H", None);
    assert!(c.is_ball_visible());

    let sound = c.settings().sound_enabled;
    press(&mut c, &mut store, "m", None);
    assert_eq!(c.settings().sound_enabled, !sound);
}

#[test]
fn reverse_flips_direction() {
    let mut c = controller(Settings::default());
    let mut store = MemoryStore::new();
    let before = c.motion_state().map(|m| m.direction);
    press(&mut c, &mut store, "r", None);
    let after = c.motion_state().map(|m| m.direction);
    assert_eq!(after, before.map(|d| d.reversed()));
}

#[test]
fn save_writes_current_settings() {
    let mut c = controller(Settings::default());
    let mut store = MemoryStore::new();
    press(&mut c, &mut store, "ArrowRight", None);
    press(&mut c, &mut store, "s", None);
    assert_eq!(load_settings(&store).as_ref(), Some(c.settings()));
}

#[test]
fn save_failure_is_reported() {
    let mut c = controller(Settings::default());
    let err = apply_command(KeyCommand::Save, &mut c, &mut RejectingStore, None).unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}

#[test]
fn extreme_file_record_survives_key_presses() {
    let path = std::env::temp_dir().join(format!("emdr-keys-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let mut store = FileStore::new(&path);
    store
        .set(
            SETTINGS_STORAGE_KEY,
            r#"{"boxSize":"-99999999999","ballSpeed":"99999999999"}"#,
        )
        .unwrap();

    let mut c = controller(Settings::default());
    assert!(c.load(&store));
    press(&mut c, &mut store, "ArrowRight", None);
    press(&mut c, &mut store, "ArrowDown", None);
    assert_eq!(c.settings().ball_speed, i32::MAX);
    assert_eq!(c.settings().box_size, 0);
    let _ = std::fs::remove_file(&path);
}
