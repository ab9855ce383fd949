// Shared tuning constants used by both web and native frontends.

// Built-in defaults applied before any saved record is loaded
pub const DEFAULT_BOX_SIZE: i32 = 300; // px
pub const DEFAULT_BALL_SIZE: i32 = 20; // px (diameter)
pub const DEFAULT_BALL_SPEED: i32 = 150; // px per second
pub const DEFAULT_BALL_COLOR: &str = "#ff5722";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";
pub const DEFAULT_SOUND_ENABLED: bool = true;

// Persistence
pub const SETTINGS_STORAGE_KEY: &str = "emdr-defaults";

// Cue timing: the plink is scheduled this long before the predicted bounce
pub const SOUND_OFFSET_MS: u64 = 50;

// Control panel fades out after this long without pointer movement
pub const PANEL_IDLE_TIMEOUT_MS: u64 = 2000;

// Synthesized plink
pub const TONE_FREQUENCY_HZ: f32 = 880.0;
pub const TONE_DURATION_SEC: f32 = 0.12;
pub const TONE_GAIN: f32 = 0.3;
pub const TONE_ATTACK_SEC: f32 = 0.005;

// Native keyboard step sizes
pub const SPEED_STEP: i32 = 10;
pub const BOX_SIZE_STEP: i32 = 20;
pub const BALL_SIZE_STEP: i32 = 2;
