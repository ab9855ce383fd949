//! Animation-timing derivation for renderers that animate on their own
//! (a CSS keyframe animation), plus the recurring sound-cue schedule that
//! predicts each bounce instead of detecting it.
//!
//! The cue repeats every `half_cycle - SOUND_OFFSET_MS`. It is never
//! re-synchronized with an in-flight animation cycle, so a parameter change
//! mid-cycle can make the cue land early or late until the animation and the
//! timer happen to line up again.

use crate::constants::SOUND_OFFSET_MS;
use crate::settings::Settings;
use std::time::Duration;

/// One-way traversal time in seconds, `(box - ball) / speed`.
///
/// `None` when there is no distance to travel or no speed to travel with.
pub fn half_cycle_secs(settings: &Settings) -> Option<f64> {
    let distance = settings.travel_distance();
    let speed = settings.ball_speed;
    if distance <= 0 || speed <= 0 {
        return None;
    }
    Some(distance as f64 / speed as f64)
}

#[inline]
pub fn half_cycle(settings: &Settings) -> Option<Duration> {
    half_cycle_secs(settings).map(Duration::from_secs_f64)
}

/// Period of the repeating cue for a given half-cycle. Half-cycles shorter
/// than the offset give a zero period, which timers treat as "as soon as
/// possible".
#[inline]
pub fn cue_period(half_cycle: Duration) -> Duration {
    half_cycle.saturating_sub(Duration::from_millis(SOUND_OFFSET_MS))
}

/// A repeating platform timer that invokes the controller's cue callback.
pub trait CueTimer {
    /// Start firing every `period`. Called only when no timer is outstanding.
    fn start(&mut self, period: Duration);
    fn cancel(&mut self);
}

/// Cancel-and-reschedule bookkeeping around a [`CueTimer`]. At most one timer
/// is ever outstanding.
pub struct CueSchedule {
    timer: Box<dyn CueTimer>,
    half_cycle: Option<Duration>,
    active_period: Option<Duration>,
}

impl CueSchedule {
    pub fn new(timer: Box<dyn CueTimer>) -> Self {
        Self {
            timer,
            half_cycle: None,
            active_period: None,
        }
    }

    /// Recompute the half-cycle from `settings`, cancel the outstanding
    /// timer and, if `running`, schedule a new one.
    pub fn reschedule(&mut self, settings: &Settings, running: bool) {
        self.half_cycle = half_cycle(settings);
        self.cancel();
        if running {
            self.start_current();
        }
    }

    /// Restart the timer from the last derived half-cycle (used on resume).
    pub fn resume(&mut self) {
        self.cancel();
        self.start_current();
    }

    pub fn cancel(&mut self) {
        if self.active_period.take().is_some() {
            self.timer.cancel();
        }
    }

    #[inline]
    pub fn half_cycle(&self) -> Option<Duration> {
        self.half_cycle
    }

    #[inline]
    pub fn active_period(&self) -> Option<Duration> {
        self.active_period
    }

    fn start_current(&mut self) {
        if let Some(half) = self.half_cycle {
            let period = cue_period(half);
            log::debug!("[sound] cue every {} ms", period.as_millis());
            self.timer.start(period);
            self.active_period = Some(period);
        }
    }
}
