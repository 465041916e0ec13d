//! Session store
//!
//! Owns the chat session list and the current-session pointer. Every change
//! to the list is written through to durable storage; a failed write is
//! logged and retried implicitly by the next mutation, which rewrites the
//! whole list.

use tracing::{debug, info, warn};

use super::storage::SessionPersistence;
use crate::config::Settings;
use crate::models::{ChatSession, FilterState, Message};
use crate::utils::errors::{MeditripError, Result};
use crate::utils::helpers::truncate_text;
use crate::utils::logging::{log_session_event, log_storage_failure};

/// Limits applied to session lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    pub default_title: String,
    pub title_max_chars: usize,
    pub max_sessions: usize,
}

impl SessionPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_title: settings.navigation.default_session_title.clone(),
            title_max_chars: settings.navigation.title_max_chars,
            max_sessions: settings.storage.max_sessions,
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            default_title: "New Conversation".to_string(),
            title_max_chars: 30,
            max_sessions: 50,
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    current_id: String,
    persistence: SessionPersistence,
    policy: SessionPolicy,
    pending_write: bool,
}

impl SessionStore {
    /// Read the persisted list, synthesizing a fresh session when it is
    /// missing, empty or unparsable
    ///
    /// Only an unparsable value is overwritten at load. If the store cannot
    /// be read at all, the fresh session stays in memory until the next
    /// mutation writes it.
    pub fn load(persistence: SessionPersistence, policy: SessionPolicy) -> Self {
        let (sessions, needs_write) = match persistence.load_sessions() {
            Ok(Some(sessions)) if !sessions.is_empty() => (sessions, false),
            Ok(_) => {
                debug!("No stored sessions, starting a fresh conversation");
                (vec![ChatSession::new(policy.default_title.clone())], true)
            }
            Err(e @ MeditripError::PersistedStoreCorrupt(_)) => {
                warn!(error = %e, "Discarding stored sessions and starting fresh");
                (vec![ChatSession::new(policy.default_title.clone())], true)
            }
            Err(e) => {
                log_storage_failure(persistence.key(), &e);
                (vec![ChatSession::new(policy.default_title.clone())], false)
            }
        };

        let current_id = sessions[0].id.clone();
        let mut store = Self {
            sessions,
            current_id,
            persistence,
            policy,
            pending_write: false,
        };

        let evicted = store.enforce_retention();
        if needs_write || evicted > 0 {
            store.persist();
        }

        info!(count = store.sessions.len(), current = %store.current_id, "Session store loaded");
        store
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    pub fn current(&self) -> &ChatSession {
        &self.sessions[self.current_index()]
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Whether the last write to durable storage failed
    pub fn has_pending_write(&self) -> bool {
        self.pending_write
    }

    /// Prepend an empty session and make it current
    pub fn create_session(&mut self) -> String {
        let session = ChatSession::new(self.policy.default_title.clone());
        let id = session.id.clone();

        self.sessions.insert(0, session);
        self.current_id = id.clone();
        self.enforce_retention();
        self.persist();

        log_session_event(&id, "created", None);
        id
    }

    /// Replace a session's message log
    ///
    /// Returns false (and changes nothing) if the session does not exist.
    pub fn update_messages(&mut self, session_id: &str, messages: Vec<Message>) -> bool {
        let max_chars = self.policy.title_max_chars;
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            debug!(session_id = session_id, "Message update for unknown session ignored");
            return false;
        };

        let was_empty = session.is_empty();
        session.messages = messages;
        if was_empty {
            let derived = session
                .first_user_message()
                .map(|m| truncate_text(&m.content, max_chars));
            if let Some(title) = derived {
                session.title = title;
            }
        }
        session.touch();

        let details = format!("{} messages", session.messages.len());
        log_session_event(session_id, "messages_updated", Some(&details));
        self.persist();
        true
    }

    /// Make `id` the current session
    pub fn select(&mut self, id: &str) -> Result<&ChatSession> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| MeditripError::SessionNotFound(id.to_string()))?;

        self.current_id = id.to_string();
        log_session_event(id, "selected", None);
        Ok(&self.sessions[index])
    }

    /// Freeze `filters` into the current session, renaming it when `rename`
    /// is a non-blank name
    pub fn snapshot_filters(&mut self, filters: FilterState, rename: Option<&str>) {
        let rename = rename.map(str::trim).filter(|name| !name.is_empty());
        let index = self.current_index();
        let session = &mut self.sessions[index];
        session.last_active_filters = Some(filters);
        if let Some(title) = rename {
            session.title = title.to_string();
        }
        session.touch();

        log_session_event(&self.current_id, "filters_saved", rename);
        self.persist();
    }

    /// Drop the current session's filter snapshot
    pub fn clear_filters(&mut self) {
        let index = self.current_index();
        let session = &mut self.sessions[index];
        if session.last_active_filters.take().is_some() {
            session.touch();
        }

        log_session_event(&self.current_id, "filters_cleared", None);
        self.persist();
    }

    /// Serialize every session as pretty JSON
    pub fn backup(&self) -> Result<String> {
        SessionPersistence::backup(&self.sessions)
    }

    /// Replace the session list with a backup, returning the number of
    /// sessions kept
    pub fn restore(&mut self, backup_data: &str) -> Result<usize> {
        let mut sessions = SessionPersistence::parse_backup(backup_data)?;
        if sessions.is_empty() {
            sessions.push(ChatSession::new(self.policy.default_title.clone()));
        }

        self.current_id = sessions[0].id.clone();
        self.sessions = sessions;
        self.enforce_retention();
        self.persist();

        info!(count = self.sessions.len(), "Sessions restored from backup");
        Ok(self.sessions.len())
    }

    /// Write the full list; failures are absorbed
    pub fn persist(&mut self) {
        match self.persistence.save_sessions(&self.sessions) {
            Ok(()) => {
                if self.pending_write {
                    info!(key = %self.persistence.key(), "Session storage write recovered");
                }
                self.pending_write = false;
            }
            Err(e) => {
                log_storage_failure(self.persistence.key(), &e);
                self.pending_write = true;
            }
        }
    }

    fn current_index(&self) -> usize {
        self.sessions
            .iter()
            .position(|s| s.id == self.current_id)
            .unwrap_or(0)
    }

    /// Evict least recently updated non-current sessions beyond the bound
    fn enforce_retention(&mut self) -> usize {
        let mut evicted = 0;
        while self.sessions.len() > self.policy.max_sessions.max(1) {
            let oldest = self
                .sessions
                .iter()
                .enumerate()
                .filter(|(_, s)| s.id != self.current_id)
                .min_by_key(|(_, s)| s.updated_at)
                .map(|(index, _)| index);

            let Some(index) = oldest else { break };
            let removed = self.sessions.remove(index);
            log_session_event(&removed.id, "evicted", Some(&removed.title));
            evicted += 1;
        }
        evicted
    }
}
