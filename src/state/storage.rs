//! Session storage implementation
//!
//! This module handles persistence of the chat session list in durable
//! key-value storage, including serialization, corrupt-value detection,
//! and backup/restore.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, error, info};

use crate::models::ChatSession;
use crate::utils::errors::{MeditripError, Result};

/// Durable string key-value storage offered by the host
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, like a full or disabled host storage
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Seed a raw value, bypassing write rejection
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.get() {
            return Err(MeditripError::StorageWrite(format!("store is read-only (key {})", key)));
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.key_path(key);
        let staging = self.dir.join(format!("{}.json.tmp", key));

        // Rename over the target so readers never see a half-written file
        std::fs::write(&staging, value)?;
        std::fs::rename(&staging, &target)?;
        Ok(())
    }
}

/// Serializes the session list under a single storage key
pub struct SessionPersistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl SessionPersistence {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the full session list
    pub fn save_sessions(&mut self, sessions: &[ChatSession]) -> Result<()> {
        debug!(key = %self.key, count = sessions.len(), "Saving sessions");

        let serialized = match serde_json::to_string(sessions) {
            Ok(data) => data,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize sessions");
                return Err(e.into());
            }
        };

        self.store.set(&self.key, &serialized)?;
        debug!(key = %self.key, data_length = serialized.len(), "Sessions saved");
        Ok(())
    }

    /// Read the session list back
    ///
    /// `Ok(None)` means nothing was stored yet; an unparsable value is
    /// reported as `PersistedStoreCorrupt`.
    pub fn load_sessions(&self) -> Result<Option<Vec<ChatSession>>> {
        let Some(data) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "No stored sessions");
            return Ok(None);
        };

        match serde_json::from_str::<Vec<ChatSession>>(&data) {
            Ok(sessions) => {
                debug!(key = %self.key, count = sessions.len(), "Sessions loaded");
                Ok(Some(sessions))
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "Stored sessions are unparsable");
                Err(MeditripError::PersistedStoreCorrupt(e.to_string()))
            }
        }
    }

    /// Backup sessions to a pretty JSON string
    pub fn backup(sessions: &[ChatSession]) -> Result<String> {
        let backup = serde_json::to_string_pretty(sessions)?;
        info!("Created backup of {} sessions", sessions.len());
        Ok(backup)
    }

    /// Parse a backup produced by [`SessionPersistence::backup`]
    pub fn parse_backup(backup_data: &str) -> Result<Vec<ChatSession>> {
        let sessions: Vec<ChatSession> = serde_json::from_str(backup_data)
            .map_err(|e| MeditripError::InvalidInput(format!("Invalid session backup: {}", e)))?;
        info!("Parsed backup of {} sessions", sessions.len());
        Ok(sessions)
    }
}

impl std::fmt::Debug for SessionPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
