#[macro_use]
extern crate tracing;

pub mod animation;
pub mod carousel;
pub mod cli;
pub mod deal;
pub mod debounce;
pub mod gesture;
pub mod navigation;
pub mod oscillation;
pub mod provider;
pub mod script;
pub mod swipe_tracker;
pub mod utils;
