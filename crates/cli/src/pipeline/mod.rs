//! Flush run orchestration module.

mod input;
mod runner;
mod stats;

pub use input::load_items;
pub use runner::{FlushRunConfig, FlushRunner};
pub use stats::RunStats;
