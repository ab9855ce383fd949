use crate::config::{ball_button_label, pause_button_label, px_label, speed_label};
use crate::constants::*;
use crate::dom::{self, add_change_listener, add_click_listener, add_input_listener, input_by_id, set_text};
use crate::storage::LocalStore;
use emdr_core::{parse_int_prefix, BallController, KeyValueStore, Settings};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[inline]
fn numeric(input: &web::HtmlInputElement) -> i32 {
    parse_int_prefix(&input.value()).unwrap_or(0)
}

/// Current values of the panel's controls; missing controls keep the built-in default.
pub fn read_settings(document: &web::Document) -> Settings {
    let mut s = Settings::default();
    if let Some(i) = input_by_id(document, BOX_SIZE_INPUT_ID) {
        s.box_size = numeric(&i);
    }
    if let Some(i) = input_by_id(document, BALL_SIZE_INPUT_ID) {
        s.ball_size = numeric(&i);
    }
    if let Some(i) = input_by_id(document, BALL_SPEED_INPUT_ID) {
        s.ball_speed = numeric(&i);
    }
    if let Some(i) = input_by_id(document, BALL_COLOR_INPUT_ID) {
        s.ball_color = i.value();
    }
    if let Some(i) = input_by_id(document, BG_COLOR_INPUT_ID) {
        s.bg_color = i.value();
    }
    if let Some(i) = input_by_id(document, SOUND_ENABLED_INPUT_ID) {
        s.sound_enabled = i.checked();
    }
    s
}

/// Push `settings` into the controls and their value labels.
pub fn sync_controls(document: &web::Document, settings: &Settings) {
    let numbers = [
        (BOX_SIZE_INPUT_ID, settings.box_size),
        (BALL_SIZE_INPUT_ID, settings.ball_size),
        (BALL_SPEED_INPUT_ID, settings.ball_speed),
    ];
    // inputs show the parsed value, not the raw saved string
    for (id, value) in numbers {
        if let Some(i) = input_by_id(document, id) {
            i.set_value(&value.to_string());
        }
    }
    for (id, value) in [
        (BALL_COLOR_INPUT_ID, &settings.ball_color),
        (BG_COLOR_INPUT_ID, &settings.bg_color),
    ] {
        if let Some(i) = input_by_id(document, id) {
            i.set_value(value);
        }
    }
    if let Some(i) = input_by_id(document, SOUND_ENABLED_INPUT_ID) {
        i.set_checked(settings.sound_enabled);
    }
    sync_labels(document, settings);
}

pub fn sync_labels(document: &web::Document, settings: &Settings) {
    set_text(document, BOX_SIZE_LABEL_ID, &px_label(&settings.box_size.to_string()));
    set_text(document, BALL_SIZE_LABEL_ID, &px_label(&settings.ball_size.to_string()));
    set_text(document, BALL_SPEED_LABEL_ID, &speed_label(settings.ball_speed));
    set_text(document, BALL_COLOR_LABEL_ID, &settings.ball_color);
    set_text(document, BG_COLOR_LABEL_ID, &settings.bg_color);
}

/// Bound the box-size control by the display width.
pub fn limit_box_size_to_screen(document: &web::Document) {
    if let (Some(input), Some(width)) = (input_by_id(document, BOX_SIZE_INPUT_ID), dom::screen_width()) {
        input.set_max(&width.to_string());
    }
}

pub fn wire_controls(
    document: &web::Document,
    controller: Rc<RefCell<BallController>>,
    mut store: Option<LocalStore>,
) {
    {
        let c = controller.clone();
        let doc = document.clone();
        add_input_listener(document, BOX_SIZE_INPUT_ID, move |input| {
            c.borrow_mut().set_box_size(numeric(input));
            set_text(&doc, BOX_SIZE_LABEL_ID, &px_label(&input.value()));
        });
    }
    {
        let c = controller.clone();
        let doc = document.clone();
        add_input_listener(document, BALL_SIZE_INPUT_ID, move |input| {
            c.borrow_mut().set_ball_size(numeric(input));
            set_text(&doc, BALL_SIZE_LABEL_ID, &px_label(&input.value()));
        });
    }
    {
        let c = controller.clone();
        let doc = document.clone();
        add_input_listener(document, BALL_SPEED_INPUT_ID, move |input| {
            let speed = numeric(input);
            c.borrow_mut().set_speed(speed);
            set_text(&doc, BALL_SPEED_LABEL_ID, &speed_label(speed));
        });
    }
    {
        let c = controller.clone();
        let doc = document.clone();
        add_input_listener(document, BALL_COLOR_INPUT_ID, move |input| {
            let color = input.value();
            set_text(&doc, BALL_COLOR_LABEL_ID, &color);
            c.borrow_mut().set_ball_color(color);
        });
    }
    {
        let c = controller.clone();
        let doc = document.clone();
        add_input_listener(document, BG_COLOR_INPUT_ID, move |input| {
            let color = input.value();
            set_text(&doc, BG_COLOR_LABEL_ID, &color);
            c.borrow_mut().set_bg_color(color);
        });
    }
    {
        let c = controller.clone();
        add_change_listener(document, SOUND_ENABLED_INPUT_ID, move |input| {
            c.borrow_mut().set_sound_enabled(input.checked());
        });
    }
    {
        let c = controller.clone();
        add_click_listener(document, SAVE_BUTTON_ID, move || {
            let Some(backend) = store.as_mut() else {
                log::warn!("[settings] no storage available; defaults not saved");
                return;
            };
            if let Err(e) = c.borrow().save(backend as &mut dyn KeyValueStore) {
                log::error!("[settings] save failed: {e}");
            }
        });
    }
    {
        let c = controller.clone();
        let doc = document.clone();
        add_click_listener(document, PAUSE_BUTTON_ID, move || {
            let paused = c.borrow_mut().toggle_pause();
            set_text(&doc, PAUSE_BUTTON_ID, pause_button_label(paused));
        });
    }
    {
        let c = controller;
        let doc = document.clone();
        add_click_listener(document, TOGGLE_BALL_BUTTON_ID, move || {
            let visible = c.borrow_mut().toggle_ball_visible();
            set_text(&doc, TOGGLE_BALL_BUTTON_ID, ball_button_label(visible));
        });
    }
}
