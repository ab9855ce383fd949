//! The flat settings record shared by every frontend.
//!
//! The persisted form mirrors the raw control values of the settings panel:
//! sizes and speed are written as numeric strings, colors as hex strings and
//! sound as a boolean. Reading is lenient: a field that is missing
//! or does not parse is not replaced by its default; numeric fields become
//! `0` (which leaves the ball stationary), colors are kept verbatim.

use crate::constants::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, with = "control_number")]
    pub box_size: i32,
    #[serde(default, with = "control_number")]
    pub ball_size: i32,
    #[serde(default, with = "control_number")]
    pub ball_speed: i32,
    #[serde(default, deserialize_with = "control_text")]
    pub ball_color: String,
    #[serde(default, deserialize_with = "control_text")]
    pub bg_color: String,
    #[serde(default, deserialize_with = "control_checked")]
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            ball_size: DEFAULT_BALL_SIZE,
            ball_speed: DEFAULT_BALL_SPEED,
            ball_color: DEFAULT_BALL_COLOR.to_string(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
            sound_enabled: DEFAULT_SOUND_ENABLED,
        }
    }
}

impl Settings {
    /// Distance the ball's center can travel between the two walls.
    #[inline]
    pub fn travel_distance(&self) -> i64 {
        self.box_size as i64 - self.ball_size as i64
    }

    #[inline]
    pub fn ball_radius(&self) -> f64 {
        self.ball_size as f64 / 2.0
    }

    /// True when the configuration leaves no room to move or no speed to move with.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.travel_distance() <= 0 || self.ball_speed <= 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Parse the leading integer of a control value the way a browser's
/// `parseInt(value, 10)` does: leading whitespace and an optional sign are
/// accepted, parsing stops at the first non-digit, and no digits at all is
/// `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        value = (value * 10 + (b - b'0') as i64).min(i32::MAX as i64 + 1);
    }
    let value = if negative { -value } else { value };
    Some(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Interpret an arbitrary JSON value as a numeric control value.
pub fn numeric_control_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i32),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Truthiness of a JSON value assigned to a checkbox's `checked` flag.
pub fn checked_control_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

mod control_number {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let parsed = super::numeric_control_value(&raw);
        if parsed.is_none() {
            log::warn!("[settings] numeric field {raw} is not a number; using 0");
        }
        Ok(parsed.unwrap_or(0))
    }
}

fn control_text<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn control_checked<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(checked_control_value(&raw))
}

/// Parse `#rrggbb` (or `#rgb`) into 0..1 RGB components.
///
/// Colors are stored unvalidated, so anything else yields `None` and the
/// caller decides what a broken color looks like.
pub fn hex_to_rgb(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    match digits.len() {
        6 => Some([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ]),
        3 => {
            let short = |i: usize| {
                let c = &digits[i..i + 1];
                channel(&format!("{c}{c}"))
            };
            Some([short(0)?, short(1)?, short(2)?])
        }
        _ => None,
    }
}
