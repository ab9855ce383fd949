// Element ids and class names the page is expected to provide

pub const BALL_ID: &str = "ball";
pub const CANVAS_ID: &str = "ball-canvas";
pub const PLINK_AUDIO_ID: &str = "plink-sound";

pub const BOX_SIZE_INPUT_ID: &str = "box-size";
pub const BALL_SIZE_INPUT_ID: &str = "ball-size";
pub const BALL_SPEED_INPUT_ID: &str = "ball-speed";
pub const BALL_COLOR_INPUT_ID: &str = "ball-color";
pub const BG_COLOR_INPUT_ID: &str = "bg-color";
pub const SOUND_ENABLED_INPUT_ID: &str = "sound-enabled";

pub const BOX_SIZE_LABEL_ID: &str = "box-size-value";
pub const BALL_SIZE_LABEL_ID: &str = "ball-size-value";
pub const BALL_SPEED_LABEL_ID: &str = "ball-speed-value";
pub const BALL_COLOR_LABEL_ID: &str = "ball-color-value";
pub const BG_COLOR_LABEL_ID: &str = "bg-color-value";

pub const SAVE_BUTTON_ID: &str = "save-defaults";
pub const PAUSE_BUTTON_ID: &str = "pause-ball";
pub const TOGGLE_BALL_BUTTON_ID: &str = "toggle-ball";

pub const CONTROLS_SELECTOR: &str = ".controls";
pub const FADE_OUT_CLASS: &str = "fade-out";

// <body data-motion="css|canvas" data-sound="sample|tone">
pub const MOTION_ATTR: &str = "data-motion";
pub const SOUND_ATTR: &str = "data-sound";

// CSS custom properties driven by the settings
pub const CSS_BOX_SIZE: &str = "--box-size";
pub const CSS_BALL_SIZE: &str = "--ball-size";
pub const CSS_BALL_SPEED: &str = "--ball-speed";
pub const CSS_BALL_COLOR: &str = "--ball-color";
pub const CSS_BG_COLOR: &str = "--bg-color";
