//! Application state

use common::Config;
use processor::EventHandler;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub event_handler: EventHandler,
}

impl AppState {
    pub fn new(config: Config, event_handler: EventHandler) -> Self {
        Self {
            config,
            event_handler,
        }
    }
}
