use crate::config::timer_millis;
use emdr_core::{BallController, CueTimer};
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

/// Repeating browser interval that calls back into the controller.
pub struct IntervalCue {
    controller: Weak<RefCell<BallController>>,
    interval: Option<Interval>,
}

impl IntervalCue {
    pub fn new(controller: Weak<RefCell<BallController>>) -> Self {
        Self {
            controller,
            interval: None,
        }
    }
}

impl CueTimer for IntervalCue {
    fn start(&mut self, period: Duration) {
        let controller = self.controller.clone();
        self.interval = Some(Interval::new(timer_millis(period), move || {
            if let Some(c) = controller.upgrade() {
                // a cue that lands while a control handler runs is dropped
                if let Ok(mut c) = c.try_borrow_mut() {
                    c.on_cue();
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(interval) = self.interval.take() {
            interval.cancel();
        }
    }
}
