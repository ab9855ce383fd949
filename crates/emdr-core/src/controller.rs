//! The single owner of settings, motion and toggles.
//!
//! Frontends plug in a rendering strategy ([`BallRenderer`]) and a sound
//! strategy ([`SoundCue`]) and pick how motion is driven:
//!
//! * [`BallController::animated`]: the renderer animates on its own from the
//!   derived half-cycle and a repeating [`CueTimer`] predicts each bounce.
//! * [`BallController::simulated`]: the frontend calls
//!   [`BallController::frame`] once per display frame; the
//!   [`BounceSimulation`] detects each bounce exactly and the plink plays in
//!   that frame.
//!
//! The frame loop and the cue timer are independent callers into the same
//! controller. Neither blocks.

use crate::settings::Settings;
use crate::simulation::{BounceSimulation, MotionState};
use crate::store::{self, KeyValueStore, StoreError};
use crate::timing::{self, CueSchedule, CueTimer};
use glam::Vec2;
use instant::Instant;

/// Everything an immediate-mode surface needs to draw one frame.
#[derive(Clone, Debug)]
pub struct BallFrame<'a> {
    pub box_size: f32,
    pub center: Vec2,
    pub radius: f32,
    pub color: &'a str,
    pub background: &'a str,
}

pub trait BallRenderer {
    /// Settings or the derived half-cycle changed. `half_cycle_secs` is
    /// `None` when the ball cannot move.
    fn configure(&mut self, settings: &Settings, half_cycle_secs: Option<f64>);

    /// Draw one frame. Only called for frame-driven motion.
    fn draw(&mut self, _frame: &BallFrame<'_>) {}

    fn set_paused(&mut self, _paused: bool) {}

    /// Show or remove the ball from the scene. Motion is unaffected.
    fn set_visible(&mut self, visible: bool);
}

/// Fire-and-forget "play one plink".
pub trait SoundCue {
    fn play(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    Animated,
    Simulated,
}

enum Motion {
    Animated(CueSchedule),
    Simulated(BounceSimulation),
}

pub struct BallController {
    settings: Settings,
    motion: Motion,
    renderer: Box<dyn BallRenderer>,
    sound: Box<dyn SoundCue>,
    paused: bool,
    ball_visible: bool,
    plinks: u64,
}

impl BallController {
    pub fn animated(
        settings: Settings,
        renderer: Box<dyn BallRenderer>,
        sound: Box<dyn SoundCue>,
        timer: Box<dyn CueTimer>,
    ) -> Self {
        let motion = Motion::Animated(CueSchedule::new(timer));
        Self::build(settings, motion, renderer, sound)
    }

    pub fn simulated(
        settings: Settings,
        renderer: Box<dyn BallRenderer>,
        sound: Box<dyn SoundCue>,
    ) -> Self {
        let motion = Motion::Simulated(BounceSimulation::new(&settings));
        Self::build(settings, motion, renderer, sound)
    }

    fn build(
        settings: Settings,
        motion: Motion,
        renderer: Box<dyn BallRenderer>,
        sound: Box<dyn SoundCue>,
    ) -> Self {
        let mut controller = Self {
            settings,
            motion,
            renderer,
            sound,
            paused: false,
            ball_visible: true,
            plinks: 0,
        };
        controller.retime();
        controller
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> MotionMode {
        match self.motion {
            Motion::Animated(_) => MotionMode::Animated,
            Motion::Simulated(_) => MotionMode::Simulated,
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_ball_visible(&self) -> bool {
        self.ball_visible
    }

    /// Number of plinks actually played (sound enabled at the time).
    #[inline]
    pub fn plinks(&self) -> u64 {
        self.plinks
    }

    pub fn half_cycle_secs(&self) -> Option<f64> {
        timing::half_cycle_secs(&self.settings)
    }

    /// Period of the outstanding cue timer, if one is scheduled.
    pub fn cue_period(&self) -> Option<std::time::Duration> {
        match &self.motion {
            Motion::Animated(schedule) => schedule.active_period(),
            Motion::Simulated(_) => None,
        }
    }

    pub fn motion_state(&self) -> Option<&MotionState> {
        match &self.motion {
            Motion::Simulated(sim) => Some(&sim.motion),
            Motion::Animated(_) => None,
        }
    }

    // ---------------- Control changes ----------------

    pub fn set_box_size(&mut self, box_size: i32) {
        self.settings.box_size = box_size;
        if let Motion::Simulated(sim) = &mut self.motion {
            sim.set_box_size(box_size);
        }
        self.retime();
    }

    pub fn set_ball_size(&mut self, ball_size: i32) {
        self.settings.ball_size = ball_size;
        if let Motion::Simulated(sim) = &mut self.motion {
            sim.set_ball_size(ball_size);
        }
        self.retime();
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.settings.ball_speed = speed;
        if let Motion::Simulated(sim) = &mut self.motion {
            sim.set_speed(speed);
        }
        self.retime();
    }

    pub fn set_ball_color(&mut self, color: impl Into<String>) {
        self.settings.ball_color = color.into();
        self.reconfigure();
    }

    pub fn set_bg_color(&mut self, color: impl Into<String>) {
        self.settings.bg_color = color.into();
        self.reconfigure();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
    }

    /// Replace every field at once, as when saved defaults are loaded.
    pub fn apply_settings(&mut self, settings: Settings) {
        if let Motion::Simulated(sim) = &mut self.motion {
            sim.set_box_size(settings.box_size);
            sim.set_ball_size(settings.ball_size);
            sim.set_speed(settings.ball_speed);
        }
        self.settings = settings;
        self.retime();
    }

    // ---------------- Toggles ----------------

    /// Freeze or resume motion and cue scheduling. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.renderer.set_paused(self.paused);
        if let Motion::Animated(schedule) = &mut self.motion {
            if self.paused {
                schedule.cancel();
            } else {
                schedule.resume();
            }
        }
        log::info!("[motion] {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Show or remove the ball. Returns the new visibility.
    pub fn toggle_ball_visible(&mut self) -> bool {
        self.ball_visible = !self.ball_visible;
        self.renderer.set_visible(self.ball_visible);
        self.ball_visible
    }

    /// Manual reversal (a click). Only frame-driven motion can reverse.
    pub fn reverse(&mut self) {
        match &mut self.motion {
            Motion::Simulated(sim) => sim.reverse(),
            Motion::Animated(_) => log::debug!("[motion] reverse ignored for animated motion"),
        }
    }

    // ---------------- Callbacks ----------------

    /// Per-frame callback for frame-driven motion.
    pub fn frame(&mut self, now: Instant) {
        let Motion::Simulated(sim) = &mut self.motion else {
            return;
        };
        let bounce = if self.paused {
            sim.hold(now);
            None
        } else {
            sim.step(now)
        };
        let frame = BallFrame {
            box_size: sim.box_size() as f32,
            center: sim.center(),
            radius: sim.radius() as f32,
            color: &self.settings.ball_color,
            background: &self.settings.bg_color,
        };
        self.renderer.draw(&frame);
        if let Some(b) = bounce {
            log::trace!("[motion] bounce {:?} at {:.1}", b.wall, b.position);
            self.play_plink();
        }
    }

    /// Repeating cue timer callback for animated motion.
    pub fn on_cue(&mut self) {
        if !self.paused {
            self.play_plink();
        }
    }

    // ---------------- Persistence ----------------

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store::save_settings(store, &self.settings)
    }

    /// Apply saved defaults if present. Returns true if a record was applied.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> bool {
        match store::load_settings(store) {
            Some(settings) => {
                self.apply_settings(settings);
                true
            }
            None => false,
        }
    }

    fn play_plink(&mut self) {
        if self.settings.sound_enabled {
            self.sound.play();
            self.plinks += 1;
        }
    }

    fn reconfigure(&mut self) {
        let half = timing::half_cycle_secs(&self.settings);
        self.renderer.configure(&self.settings, half);
    }

    fn retime(&mut self) {
        self.reconfigure();
        let running = !self.paused;
        if let Motion::Animated(schedule) = &mut self.motion {
            schedule.reschedule(&self.settings, running);
        }
    }
}
