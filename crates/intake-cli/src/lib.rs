//! CLI library components for provider intake.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod submit;
