//! Filter synchronizer
//!
//! Holds the live marketplace filter and the query staged for the chat panel.
//! Snapshots of the live filter are frozen into the current session through
//! the session store; this module never touches the session list otherwise.

use tracing::debug;

use super::sessions::SessionStore;
use crate::models::{ChatSession, FilterState, FilterUpdate, GeoPoint};

#[derive(Debug, Clone, Default)]
pub struct FilterSynchronizer {
    live: FilterState,
    staged_query: Option<String>,
}

impl FilterSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter currently driving the marketplace view
    pub fn live(&self) -> &FilterState {
        &self.live
    }

    /// Merge `update` into the live filter and snapshot the result into the
    /// current session, renaming it when the update names a list
    pub fn apply(&mut self, update: &FilterUpdate, sessions: &mut SessionStore) -> &FilterState {
        let update = update.clone().normalized();
        self.live.merge(&update);
        sessions.snapshot_filters(self.live.clone(), update.ai_list_name.as_deref());
        debug!(query = %self.live.search_query, "Filters applied");
        &self.live
    }

    /// Reset to an empty query and drop the current session's snapshot
    pub fn clear(&mut self, sessions: &mut SessionStore) {
        self.reset();
        sessions.clear_filters();
    }

    pub fn reset(&mut self) {
        self.live = FilterState::default();
    }

    /// Replace the live filter with a stored snapshot
    pub fn restore(&mut self, snapshot: FilterState) {
        self.live = snapshot;
    }

    /// Merge the searcher's origin and location without snapshotting
    pub fn merge_location(&mut self, origin: Option<String>, location: Option<GeoPoint>) {
        self.live.merge(&FilterUpdate {
            user_origin: origin,
            user_location: location,
            ..FilterUpdate::default()
        });
    }

    pub fn stage_query(&mut self, query: impl Into<String>) {
        self.staged_query = Some(query.into());
    }

    pub fn staged_query(&self) -> Option<&str> {
        self.staged_query.as_deref()
    }

    /// Hand the staged query to the chat panel once
    ///
    /// The query is only delivered while `session` has no messages; it is
    /// consumed either way.
    pub fn take_staged_query(&mut self, session: &ChatSession) -> Option<String> {
        let query = self.staged_query.take()?;
        session.is_empty().then_some(query)
    }
}
