//! Per-subsystem configuration structs with serde defaults.

mod engine_config;
mod learning_config;

pub use engine_config::EngineConfig;
pub use learning_config::LearningConfig;
