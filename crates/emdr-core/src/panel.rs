//! Settings panel auto-hide.
//!
//! Every pointer movement shows the panel and restarts a one-shot idle timer;
//! when the timer fires the panel hides.

use crate::constants::PANEL_IDLE_TIMEOUT_MS;
use instant::Instant;
use std::time::Duration;

pub trait IdleTimer {
    /// Fire once after `delay`. Called only after any previous timer was cancelled.
    fn start(&mut self, delay: Duration);
    fn cancel(&mut self);
}

pub struct ControlPanel {
    timer: Box<dyn IdleTimer>,
    timeout: Duration,
    visible: bool,
}

impl ControlPanel {
    pub fn new(timer: Box<dyn IdleTimer>) -> Self {
        Self::with_timeout(timer, Duration::from_millis(PANEL_IDLE_TIMEOUT_MS))
    }

    pub fn with_timeout(timer: Box<dyn IdleTimer>, timeout: Duration) -> Self {
        Self {
            timer,
            timeout,
            visible: true,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true if the panel was hidden and is now shown.
    pub fn on_pointer_move(&mut self) -> bool {
        self.timer.cancel();
        self.timer.start(self.timeout);
        let changed = !self.visible;
        self.visible = true;
        if changed {
            log::debug!("[panel] shown");
        }
        changed
    }

    /// Idle timer callback. Returns true if the panel was visible and is now hidden.
    pub fn on_idle_timeout(&mut self) -> bool {
        let changed = self.visible;
        self.visible = false;
        if changed {
            log::debug!("[panel] hidden after {} ms idle", self.timeout.as_millis());
        }
        changed
    }
}

/// Poll-driven [`IdleTimer`] for frontends that already run a frame loop.
///
/// Cloning shares the same deadline, so one clone can be handed to the panel
/// while the frame loop keeps the other to poll.
#[derive(Clone, Default)]
pub struct DeadlineTimer {
    deadline: std::rc::Rc<std::cell::Cell<Option<Instant>>>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&self, now: Instant) -> bool {
        match self.deadline.get() {
            Some(deadline) if now >= deadline => {
                self.deadline.set(None);
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.get()
    }
}

impl IdleTimer for DeadlineTimer {
    fn start(&mut self, delay: Duration) {
        self.deadline.set(Some(Instant::now() + delay));
    }

    fn cancel(&mut self) {
        self.deadline.set(None);
    }
}
