// Page configuration and label formatting. Pure functions only, so the
// host-side tests can include this file directly.

use emdr_core::MotionMode;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundChoice {
    /// `<audio>` element holding a recorded plink
    Sample,
    /// WebAudio oscillator one-shot
    Tone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageConfig {
    pub motion: MotionMode,
    pub sound: SoundChoice,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            motion: MotionMode::Animated,
            sound: SoundChoice::Sample,
        }
    }
}

impl PageConfig {
    /// Build from the `data-motion` / `data-sound` attribute values.
    /// Missing or unknown values fall back to the CSS + sample variant.
    pub fn from_attrs(motion: Option<&str>, sound: Option<&str>) -> Self {
        let defaults = Self::default();
        let motion = match motion.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("css") | Some("animated") => MotionMode::Animated,
            Some("canvas") | Some("simulated") => MotionMode::Simulated,
            None => defaults.motion,
            Some(other) => {
                log::warn!("[config] unknown motion '{other}', using css");
                defaults.motion
            }
        };
        let sound = match sound.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("sample") | Some("audio") => SoundChoice::Sample,
            Some("tone") | Some("synth") => SoundChoice::Tone,
            None => defaults.sound,
            Some(other) => {
                log::warn!("[config] unknown sound '{other}', using sample");
                defaults.sound
            }
        };
        Self { motion, sound }
    }
}

#[inline]
pub fn px_label(raw: &str) -> String {
    format!("{raw}px")
}

#[inline]
pub fn speed_label(speed: i32) -> String {
    format!("{speed}px/s")
}

/// Value for the `--ball-speed` custom property.
pub fn css_seconds(half_cycle_secs: Option<f64>) -> String {
    match half_cycle_secs {
        Some(secs) => format!("{secs}s"),
        None => "0s".to_string(),
    }
}

/// Browser timer delay in whole milliseconds, saturating at `u32::MAX`.
#[inline]
pub fn timer_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

#[inline]
pub fn pause_button_label(paused: bool) -> &'static str {
    if paused {
        "Resume"
    } else {
        "Pause"
    }
}

#[inline]
pub fn ball_button_label(visible: bool) -> &'static str {
    if visible {
        "Remove Ball"
    } else {
        "Show Ball"
    }
}
