mod app;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

pub use app::{run_script, run_shell, ScriptOptions};
pub use config::AppConfig;
pub use logging::{initialize as initialize_logging, LogDestination};
