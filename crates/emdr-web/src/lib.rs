#![cfg(target_arch = "wasm32")]
mod audio;
mod config;
mod constants;
mod controls;
mod cue;
mod dom;
mod frame;
mod overlay;
mod render;
mod storage;

use config::{PageConfig, SoundChoice};
use constants::*;
use emdr_core::{BallController, BallRenderer, MotionMode, SoundCue};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("emdr-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn page_config(document: &web::Document) -> PageConfig {
    let body = document.body();
    let attr = |name: &str| body.as_ref().and_then(|b| b.get_attribute(name));
    PageConfig::from_attrs(attr(MOTION_ATTR).as_deref(), attr(SOUND_ATTR).as_deref())
}

fn build_sound(document: &web::Document, choice: SoundChoice) -> Box<dyn SoundCue> {
    match choice {
        SoundChoice::Sample => match dom::typed_by_id::<web::HtmlAudioElement>(document, PLINK_AUDIO_ID) {
            Ok(audio) => Box::new(audio::SampleSound::new(audio)),
            Err(e) => {
                log::warn!("[sound] {e}; falling back to synthesized tone");
                Box::new(audio::ToneSound::new())
            }
        },
        SoundChoice::Tone => Box::new(audio::ToneSound::new()),
    }
}

// Hide whichever surface the chosen motion strategy does not draw on
fn hide_element(document: &web::Document, id: &str) {
    if let Ok(el) = dom::typed_by_id::<web::HtmlElement>(document, id) {
        let _ = el.style().set_property("display", "none");
    }
}

fn build_renderer(
    document: &web::Document,
    motion: MotionMode,
) -> anyhow::Result<Box<dyn BallRenderer>> {
    Ok(match motion {
        MotionMode::Animated => {
            hide_element(document, CANVAS_ID);
            let ball = dom::typed_by_id::<web::HtmlElement>(document, BALL_ID)?;
            Box::new(render::CssRenderer::new(document.clone(), ball))
        }
        MotionMode::Simulated => {
            hide_element(document, BALL_ID);
            let canvas = dom::typed_by_id::<web::HtmlCanvasElement>(document, CANVAS_ID)?;
            Box::new(render::CanvasRenderer::new(document.clone(), canvas)?)
        }
    })
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let config = page_config(&document);
    log::info!("[config] motion={:?} sound={:?}", config.motion, config.sound);

    controls::limit_box_size_to_screen(&document);
    let settings = controls::read_settings(&document);
    let sound = build_sound(&document, config.sound);
    let renderer = build_renderer(&document, config.motion)?;

    let controller = match config.motion {
        MotionMode::Animated => Rc::new_cyclic(|weak: &Weak<RefCell<BallController>>| {
            let timer = Box::new(cue::IntervalCue::new(weak.clone()));
            RefCell::new(BallController::animated(settings, renderer, sound, timer))
        }),
        MotionMode::Simulated => Rc::new(RefCell::new(BallController::simulated(
            settings, renderer, sound,
        ))),
    };

    let store = match storage::LocalStore::open() {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("[settings] {e}");
            None
        }
    };
    let loaded = match &store {
        Some(s) => controller.borrow_mut().load(s),
        None => false,
    };
    if loaded {
        controls::sync_controls(&document, controller.borrow().settings());
    } else {
        controls::sync_labels(&document, controller.borrow().settings());
    }

    controls::wire_controls(&document, controller.clone(), store);

    if config.motion == MotionMode::Simulated {
        let c = controller.clone();
        dom::add_click_listener(&document, CANVAS_ID, move || c.borrow_mut().reverse());
    }

    // Listener closures are forgotten; the panel lives as long as the page
    let _panel = overlay::wire_panel(&document);

    if config.motion == MotionMode::Simulated {
        frame::start_frame_loop(controller);
    }
    Ok(())
}
