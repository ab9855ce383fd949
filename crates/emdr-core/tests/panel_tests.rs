// Host-side tests for the settings panel idle timer.

use emdr_core::{ControlPanel, DeadlineTimer, IdleTimer, PANEL_IDLE_TIMEOUT_MS};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// One-shot timer on a virtual millisecond clock.
#[derive(Clone, Default)]
struct VirtualTimer {
    now_ms: Rc<Cell<u64>>,
    deadline_ms: Rc<Cell<Option<u64>>>,
    starts: Rc<RefCell<Vec<Duration>>>,
}

impl IdleTimer for VirtualTimer {
    fn start(&mut self, delay: Duration) {
        assert!(self.deadline_ms.get().is_none(), "idle timer started twice");
        self.deadline_ms
            .set(Some(self.now_ms.get() + delay.as_millis() as u64));
        self.starts.borrow_mut().push(delay);
    }

    fn cancel(&mut self) {
        self.deadline_ms.set(None);
    }
}

impl VirtualTimer {
    /// Move the clock forward, firing the timer into `panel` if it is due.
    fn advance_to(&self, t_ms: u64, panel: &mut ControlPanel) -> bool {
        self.now_ms.set(t_ms);
        match self.deadline_ms.get() {
            Some(deadline) if deadline <= t_ms => {
                self.deadline_ms.set(None);
                panel.on_idle_timeout()
            }
            _ => false,
        }
    }
}

#[test]
fn panel_starts_visible_and_hides_after_idle_timeout() {
    let timer = VirtualTimer::default();
    let mut panel = ControlPanel::new(Box::new(timer.clone()));
    assert!(panel.is_visible());

    panel.on_pointer_move();
    assert_eq!(
        *timer.starts.borrow(),
        vec![Duration::from_millis(PANEL_IDLE_TIMEOUT_MS)]
    );
    assert!(!timer.advance_to(1999, &mut panel));
    assert!(panel.is_visible());
    assert!(timer.advance_to(2000, &mut panel));
    assert!(!panel.is_visible());
}

#[test]
fn movement_before_expiry_restarts_the_timer() {
    let timer = VirtualTimer::default();
    let mut panel = ControlPanel::new(Box::new(timer.clone()));
    panel.on_pointer_move();
    timer.advance_to(1500, &mut panel);
    panel.on_pointer_move();

    assert!(!timer.advance_to(2000, &mut panel));
    assert!(!timer.advance_to(3499, &mut panel));
    assert!(panel.is_visible());
    assert!(timer.advance_to(3500, &mut panel));
    assert!(!panel.is_visible());
    assert_eq!(timer.starts.borrow().len(), 2);
}

#[test]
fn movement_after_hiding_shows_again() {
    let timer = VirtualTimer::default();
    let mut panel = ControlPanel::new(Box::new(timer.clone()));
    panel.on_pointer_move();
    timer.advance_to(2000, &mut panel);
    assert!(!panel.is_visible());

    assert!(panel.on_pointer_move());
    assert!(panel.is_visible());
    assert!(!panel.on_pointer_move());
    assert!(timer.advance_to(4500, &mut panel));
}

#[test]
fn deadline_timer_fires_once_after_delay() {
    let mut timer = DeadlineTimer::new();
    let poller = timer.clone();
    let before = Instant::now();
    timer.start(Duration::from_millis(2000));

    assert!(!poller.poll(before + Duration::from_millis(1999)));
    assert!(poller.poll(Instant::now() + Duration::from_millis(2001)));
    assert!(!poller.poll(Instant::now() + Duration::from_millis(5000)));
    assert!(poller.deadline().is_none());
}

#[test]
fn deadline_timer_cancel_prevents_firing() {
    let mut timer = DeadlineTimer::new();
    let poller = timer.clone();
    timer.start(Duration::from_millis(10));
    timer.cancel();
    assert!(!poller.poll(Instant::now() + Duration::from_secs(1)));
}

#[test]
fn panel_drives_deadline_timer() {
    let timer = DeadlineTimer::new();
    let mut panel = ControlPanel::with_timeout(Box::new(timer.clone()), Duration::from_millis(50));
    panel.on_pointer_move();
    assert!(timer.deadline().is_some());
    if timer.poll(Instant::now() + Duration::from_millis(60)) {
        panel.on_idle_timeout();
    }
    assert!(!panel.is_visible());
}
