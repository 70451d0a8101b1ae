// Application state module
// State shared by every connection

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::handler::Pipeline;

/// Application state
pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,

    // Access logging switch, toggled at runtime by SIGUSR2
    pub access_log_enabled: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config, pipeline: Pipeline) -> Self {
        Self {
            config: config.clone(),
            pipeline,
            access_log_enabled: AtomicBool::new(config.logging.access_log),
        }
    }
}
