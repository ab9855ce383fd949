pub mod constants;
pub mod controller;
pub mod keys;
pub mod panel;
pub mod settings;
pub mod simulation;
pub mod store;
pub mod timing;

pub static BALL_WGSL: &str = include_str!("../shaders/ball.wgsl");

pub use constants::*;
pub use controller::*;
pub use keys::*;
pub use panel::*;
pub use settings::*;
pub use simulation::*;
pub use store::*;
pub use timing::*;
