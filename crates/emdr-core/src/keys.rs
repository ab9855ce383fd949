//! Keyboard bindings for frontends without on-screen controls.
//!
//! Keys are named the way `KeyboardEvent.key` names them (`" "`,
//! `"ArrowLeft"`, `"h"`), so a frontend only has to translate its own key
//! type into that string.

use crate::constants::{BALL_SIZE_STEP, BOX_SIZE_STEP, SPEED_STEP};
use crate::controller::BallController;
use crate::store::{KeyValueStore, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePause,
    ToggleBall,
    Save,
    Slower,
    Faster,
    GrowBox,
    ShrinkBox,
    ShrinkBall,
    GrowBall,
    ToggleSound,
    Reverse,
}

#[inline]
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    match key {
        " " | "Space" => Some(KeyCommand::TogglePause),
        "h" | "H" => Some(KeyCommand::ToggleBall),
        "s" | "S" => Some(KeyCommand::Save),
        "ArrowLeft" => Some(KeyCommand::Slower),
        "ArrowRight" => Some(KeyCommand::Faster),
        "ArrowUp" => Some(KeyCommand::GrowBox),
        "ArrowDown" => Some(KeyCommand::ShrinkBox),
        "[" => Some(KeyCommand::ShrinkBall),
        "]" => Some(KeyCommand::GrowBall),
        "m" | "M" => Some(KeyCommand::ToggleSound),
        "r" | "R" => Some(KeyCommand::Reverse),
        _ => None,
    }
}

/// Box size after one `GrowBox` step. `max_box` caps growth but never
/// shrinks a box that is already wider.
pub fn grown_box_size(box_size: i32, max_box: Option<i32>) -> i32 {
    let next = box_size.saturating_add(BOX_SIZE_STEP);
    match max_box {
        Some(max) if box_size >= max => box_size,
        Some(max) => next.min(max),
        None => next,
    }
}

/// Apply one command. Steps saturate, and shrinking stops at zero, so
/// extreme values loaded from a saved record cannot overflow.
pub fn apply_command(
    command: KeyCommand,
    controller: &mut BallController,
    store: &mut dyn KeyValueStore,
    max_box: Option<i32>,
) -> Result<(), StoreError> {
    let s = controller.settings();
    let (speed, box_size, ball_size, sound) =
        (s.ball_speed, s.box_size, s.ball_size, s.sound_enabled);
    match command {
        KeyCommand::TogglePause => {
            controller.toggle_pause();
        }
        KeyCommand::ToggleBall => {
            controller.toggle_ball_visible();
        }
        KeyCommand::Save => controller.save(store)?,
        KeyCommand::Slower => controller.set_speed(speed.saturating_sub(SPEED_STEP).max(0)),
        KeyCommand::Faster => controller.set_speed(speed.saturating_add(SPEED_STEP)),
        KeyCommand::GrowBox => controller.set_box_size(grown_box_size(box_size, max_box)),
        KeyCommand::ShrinkBox => {
            controller.set_box_size(box_size.saturating_sub(BOX_SIZE_STEP).max(0))
        }
        KeyCommand::ShrinkBall => {
            controller.set_ball_size(ball_size.saturating_sub(BALL_SIZE_STEP).max(0))
        }
        KeyCommand::GrowBall => controller.set_ball_size(ball_size.saturating_add(BALL_SIZE_STEP)),
        KeyCommand::ToggleSound => controller.set_sound_enabled(!sound),
        KeyCommand::Reverse => controller.reverse(),
    }
    Ok(())
}
