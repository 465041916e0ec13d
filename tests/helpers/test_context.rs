//! Test context for unified test setup
//!
//! Builds an `AppController` over in-memory history and storage while keeping
//! shared handles, so tests can inspect what the controller wrote.

use std::sync::Arc;

use meditrip::config::Settings;
use meditrip::i18n::IdentityTranslator;
use meditrip::models::ChatSession;
use meditrip::routing::{HistoryBackend, MemoryHistory};
use meditrip::state::MemoryStore;
use meditrip::{AppController, InMemoryCatalog};

use super::test_data::test_catalog;

/// Test configuration options
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub initial_path: String,
    pub sandboxed_history: bool,
    pub max_sessions: usize,
    /// Raw value placed under the session key before the controller loads
    pub stored_sessions: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            initial_path: "/".to_string(),
            sandboxed_history: false,
            max_sessions: 50,
            stored_sessions: None,
        }
    }
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub controller: AppController,
    pub history: MemoryHistory,
    pub store: MemoryStore,
    pub settings: Settings,
}

impl TestContext {
    pub fn new() -> Self {
        Self::new_with_config(TestConfig::default())
    }

    pub fn at(path: &str) -> Self {
        Self::new_with_config(TestConfig {
            initial_path: path.to_string(),
            ..TestConfig::default()
        })
    }

    pub fn new_with_config(config: TestConfig) -> Self {
        Self::with_catalog(config, test_catalog())
    }

    pub fn with_catalog(config: TestConfig, catalog: InMemoryCatalog) -> Self {
        let mut settings = Settings::default();
        settings.storage.max_sessions = config.max_sessions;

        let history = if config.sandboxed_history {
            MemoryHistory::sandboxed(&config.initial_path)
        } else {
            MemoryHistory::new(&config.initial_path)
        };

        let store = MemoryStore::new();
        if let Some(raw) = &config.stored_sessions {
            store.insert_raw(&settings.storage.session_key, raw);
        }

        let controller = AppController::new(
            &settings,
            Arc::new(catalog),
            Box::new(history.clone()),
            Box::new(store.clone()),
            Arc::new(IdentityTranslator),
        );

        Self {
            controller,
            history,
            store,
            settings,
        }
    }

    /// Start a second controller over the same storage, as after a restart
    pub fn reopen(&self) -> AppController {
        AppController::new(
            &self.settings,
            Arc::new(test_catalog()),
            Box::new(MemoryHistory::new("/")),
            Box::new(self.store.clone()),
            Arc::new(IdentityTranslator),
        )
    }

    /// Path the host history currently shows
    pub fn address_bar(&self) -> String {
        self.history.current_path()
    }

    /// Sessions as currently persisted
    pub fn persisted_sessions(&self) -> Vec<ChatSession> {
        let raw = self
            .store
            .raw(&self.settings.storage.session_key)
            .expect("sessions should be persisted");
        serde_json::from_str(&raw).expect("persisted sessions should parse")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
