use crate::config::timer_millis;
use crate::constants::{CONTROLS_SELECTOR, FADE_OUT_CLASS};
use emdr_core::{ControlPanel, IdleTimer};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use web_sys as web;

#[inline]
fn controls(document: &web::Document) -> Option<web::Element> {
    document.query_selector(CONTROLS_SELECTOR).ok().flatten()
}

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = controls(document) {
        let _ = el.class_list().remove_1(FADE_OUT_CLASS);
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = controls(document) {
        let _ = el.class_list().add_1(FADE_OUT_CLASS);
    }
}

/// One-shot browser timeout that hides the panel when it fires.
pub struct TimeoutIdle {
    document: web::Document,
    panel: Weak<RefCell<ControlPanel>>,
    pending: Option<Timeout>,
}

impl IdleTimer for TimeoutIdle {
    fn start(&mut self, delay: Duration) {
        let document = self.document.clone();
        let panel = self.panel.clone();
        self.pending = Some(Timeout::new(timer_millis(delay), move || {
            let Some(panel) = panel.upgrade() else {
                return;
            };
            let hidden = match panel.try_borrow_mut() {
                Ok(mut p) => p.on_idle_timeout(),
                Err(_) => return,
            };
            if hidden {
                hide(&document);
            }
        }));
    }

    fn cancel(&mut self) {
        // dropping a gloo Timeout clears it
        self.pending = None;
    }
}

/// Build the panel and wire pointer movement to it; starts the first idle timer.
pub fn wire_panel(document: &web::Document) -> Rc<RefCell<ControlPanel>> {
    let panel = Rc::new_cyclic(|weak: &Weak<RefCell<ControlPanel>>| {
        RefCell::new(ControlPanel::new(Box::new(TimeoutIdle {
            document: document.clone(),
            panel: weak.clone(),
            pending: None,
        })))
    });
    {
        let panel = panel.clone();
        let doc = document.clone();
        crate::dom::add_document_listener(document, "mousemove", move || {
            if let Ok(mut p) = panel.try_borrow_mut() {
                p.on_pointer_move();
            }
            show(&doc);
        });
    }
    panel.borrow_mut().on_pointer_move();
    show(document);
    panel
}
