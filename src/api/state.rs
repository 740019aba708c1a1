//! Application state for the center payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::generative::ContentAssistant;
use crate::services::PayrollService;
use crate::store::DataStore;

/// Shared application state.
///
/// Contains the loaded center configuration, the row store and, when a text
/// generator is configured, the content assistant.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn DataStore>,
    assistant: Option<ContentAssistant>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: Arc<dyn DataStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            assistant: None,
        }
    }

    /// Enables the content endpoints.
    pub fn with_assistant(mut self, assistant: ContentAssistant) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the row store.
    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }

    /// A payroll service sharing this state's store and configuration.
    pub fn payroll(&self) -> PayrollService {
        PayrollService::new(Arc::clone(&self.store), Arc::clone(&self.config))
    }

    /// The content assistant, if one was configured.
    pub fn assistant(&self) -> Option<&ContentAssistant> {
        self.assistant.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
