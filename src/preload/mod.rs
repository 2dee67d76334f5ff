// Preload module
// Contains: window planning around the focused entry, background preload worker

pub mod planner;
mod worker;

pub use planner::{image_window, plan, preload_radius, MAX_PRELOAD_RADIUS};
pub use worker::BackgroundPreloader;
