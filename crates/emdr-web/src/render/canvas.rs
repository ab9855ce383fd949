use crate::constants::{CSS_BG_COLOR, CSS_BOX_SIZE};
use crate::dom::set_css_var;
use emdr_core::{BallFrame, BallRenderer, Settings};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Immediate-mode 2D canvas redrawn every frame from the simulation.
pub struct CanvasRenderer {
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    visible: bool,
}

impl CanvasRenderer {
    pub fn new(document: web::Document, canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            document,
            canvas,
            ctx,
            visible: true,
        })
    }
}

impl BallRenderer for CanvasRenderer {
    fn configure(&mut self, settings: &Settings, _half_cycle_secs: Option<f64>) {
        let side = settings.box_size.max(1) as u32;
        if self.canvas.width() != side {
            self.canvas.set_width(side);
        }
        if self.canvas.height() != side {
            self.canvas.set_height(side);
        }
        set_css_var(&self.document, CSS_BOX_SIZE, &format!("{}px", settings.box_size));
        set_css_var(&self.document, CSS_BG_COLOR, &settings.bg_color);
    }

    fn draw(&mut self, frame: &BallFrame<'_>) {
        let side = frame.box_size as f64;
        #[allow(deprecated)]
        self.ctx.set_fill_style(&JsValue::from_str(frame.background));
        self.ctx.fill_rect(0.0, 0.0, side, side);
        if !self.visible || frame.radius <= 0.0 {
            return;
        }
        #[allow(deprecated)]
        self.ctx.set_fill_style(&JsValue::from_str(frame.color));
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                frame.center.x as f64,
                frame.center.y as f64,
                frame.radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
