mod app;
pub mod config;
mod effects;
pub mod logging;
mod render;

pub use app::{run_app, App, PlotJob, RunOutcome};
pub use effects::{map_event, EffectRunner};
pub use render::render;
