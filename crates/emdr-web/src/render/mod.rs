mod canvas;
mod css;

pub use canvas::CanvasRenderer;
pub use css::CssRenderer;
