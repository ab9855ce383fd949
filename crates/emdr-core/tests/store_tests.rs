use emdr_core::{load_settings, save_settings, FileStore, KeyValueStore, Settings, SETTINGS_STORAGE_KEY};
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("emdr-store-{}-{name}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn missing_file_reads_as_empty() {
    let store = FileStore::new(scratch("missing"));
    assert_eq!(store.get(SETTINGS_STORAGE_KEY).unwrap(), None);
    assert_eq!(load_settings(&store), None);
}

#[test]
fn settings_round_trip_through_file() {
    let path = scratch("round-trip");
    let mut store = FileStore::new(&path);
    let saved = Settings {
        box_size: 640,
        ball_size: 32,
        ball_speed: 275,
        ball_color: "#00ff88".into(),
        bg_color: "#101010".into(),
        sound_enabled: false,
    };
    save_settings(&mut store, &saved).unwrap();
    assert!(path.exists());

    let reopened = FileStore::new(&path);
    assert_eq!(load_settings(&reopened), Some(saved));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn other_keys_survive_a_write() {
    let path = scratch("other-keys");
    let mut store = FileStore::new(&path);
    store.set("unrelated", "keep me").unwrap();
    store.set(SETTINGS_STORAGE_KEY, "{}").unwrap();
    assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("keep me"));
    assert_eq!(store.get(SETTINGS_STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn non_object_file_is_an_error_on_read_and_replaced_on_write() {
    let path = scratch("not-object");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let mut store = FileStore::new(&path);
    assert!(store.get(SETTINGS_STORAGE_KEY).is_err());
    assert_eq!(load_settings(&store), None);

    save_settings(&mut store, &Settings::default()).unwrap();
    assert_eq!(load_settings(&store), Some(Settings::default()));
    let _ = std::fs::remove_file(&path);
}
