use crate::config::css_seconds;
use crate::constants::*;
use crate::dom::set_css_var;
use emdr_core::{BallRenderer, Settings};
use web_sys as web;

/// Drives a CSS keyframe animation through custom properties on the root
/// element; the browser does the per-frame work.
pub struct CssRenderer {
    document: web::Document,
    ball: web::HtmlElement,
}

impl CssRenderer {
    pub fn new(document: web::Document, ball: web::HtmlElement) -> Self {
        Self { document, ball }
    }
}

impl BallRenderer for CssRenderer {
    fn configure(&mut self, settings: &Settings, half_cycle_secs: Option<f64>) {
        let doc = &self.document;
        set_css_var(doc, CSS_BOX_SIZE, &format!("{}px", settings.box_size));
        set_css_var(doc, CSS_BALL_SIZE, &format!("{}px", settings.ball_size));
        set_css_var(doc, CSS_BALL_COLOR, &settings.ball_color);
        set_css_var(doc, CSS_BG_COLOR, &settings.bg_color);
        set_css_var(doc, CSS_BALL_SPEED, &css_seconds(half_cycle_secs));
    }

    fn set_paused(&mut self, paused: bool) {
        let state = if paused { "paused" } else { "running" };
        let _ = self.ball.style().set_property("animation-play-state", state);
    }

    fn set_visible(&mut self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.ball.style().set_property("display", display);
    }
}
