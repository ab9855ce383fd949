use emdr_core::BallController;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn request_frame(window: &web::Window, f: &Closure<dyn FnMut()>) {
    if let Err(e) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
        log::error!("[motion] requestAnimationFrame error: {:?}", e);
    }
}

/// Self-rescheduling requestAnimationFrame loop feeding the controller.
/// Each invocation measures dt from the previous one inside the simulation.
pub fn start_frame_loop(controller: Rc<RefCell<BallController>>) {
    let Some(window) = web::window() else {
        log::error!("[motion] no window for frame loop");
        return;
    };
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let window_tick = window.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Ok(mut c) = controller.try_borrow_mut() {
            c.frame(Instant::now());
        }
        if let Some(f) = tick_clone.borrow().as_ref() {
            request_frame(&window_tick, f);
        }
    }) as Box<dyn FnMut()>));
    if let Some(f) = tick.borrow().as_ref() {
        request_frame(&window, f);
    }
}
