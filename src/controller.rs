//! Application controller
//!
//! `AppController` owns every piece of mutable view state: the page state
//! machine, the history adapter, the session store and the live filter. Its
//! methods are the only mutation entry points; the presentation layer reads
//! a [`ViewSnapshot`] and sends intents back.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::i18n::Translator;
use crate::models::{ChatSession, FilterState, FilterUpdate, GeoPoint, Message};
use crate::routing::{path, BackOutcome, HistoryAdapter, HistoryBackend};
use crate::services::Catalog;
use crate::state::{
    ContextSummary, FilterSynchronizer, KeyValueStore, NavigationIntent, Page, SessionPersistence,
    SessionPolicy, SessionStore, Transition, ViewContext, ViewStateMachine,
};
use crate::utils::errors::Result;
use crate::utils::helpers::normalize_whitespace;
use crate::utils::logging::log_navigation;

/// One entry of the breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Everything the presentation layer needs to render the current state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    /// Page that renders after the context guard
    pub page: Page,
    /// Page the state machine is on
    pub requested_page: Page,
    pub context: ContextSummary,
    pub chat_open: bool,
    pub filters: FilterState,
    pub current_session_id: String,
    pub current_session_title: String,
    pub path: String,
    pub breadcrumbs: Vec<Breadcrumb>,
}

pub struct AppController {
    catalog: Arc<dyn Catalog>,
    translator: Arc<dyn Translator>,
    machine: ViewStateMachine,
    history: HistoryAdapter,
    sessions: SessionStore,
    filters: FilterSynchronizer,
    chat_open: bool,
}

impl AppController {
    /// Build the controller and synchronize it with the host's current path
    pub fn new(
        settings: &Settings,
        catalog: Arc<dyn Catalog>,
        history: Box<dyn HistoryBackend>,
        store: Box<dyn KeyValueStore>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let persistence = SessionPersistence::new(store, settings.storage.session_key.clone());
        let sessions = SessionStore::load(persistence, SessionPolicy::from_settings(settings));

        let mut controller = Self {
            catalog,
            translator,
            machine: ViewStateMachine::new(),
            history: HistoryAdapter::new(history),
            sessions,
            filters: FilterSynchronizer::new(),
            chat_open: false,
        };

        let initial_path = controller.history.current_path();
        controller.sync_from_path(&initial_path, "initial_load");
        info!(path = %initial_path, page = %controller.machine.page(), "Controller initialized");
        controller
    }

    pub fn page(&self) -> Page {
        self.machine.page()
    }

    pub fn rendered_page(&self) -> Page {
        self.machine.rendered_page()
    }

    pub fn context(&self) -> &ViewContext {
        self.machine.context()
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.live()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn current_session(&self) -> &ChatSession {
        self.sessions.current()
    }

    pub fn chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn current_path(&self) -> String {
        self.history.current_path()
    }

    pub fn history(&self) -> &HistoryAdapter {
        &self.history
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    // ---- Navigation ----

    /// Handle a user navigation intent
    ///
    /// A hospital-scoped intent without a hospital in context is refused and
    /// leaves the state untouched.
    pub fn navigate(&mut self, intent: NavigationIntent) -> Result<Page> {
        let transition = self.machine.resolve(intent).map_err(|e| {
            warn!(page = %self.machine.page(), error = %e, "Navigation intent refused");
            e
        })?;
        Ok(self.commit(&transition))
    }

    /// Apply a user-initiated transition and mirror it into the address bar
    fn commit(&mut self, transition: &Transition) -> Page {
        let previous = self.machine.apply(transition);
        if transition.closes_chat_panel() {
            self.chat_open = false;
        }

        let path = path::format(transition);
        self.history.push_path(&path);

        let current = self.machine.page();
        log_navigation(&previous.to_string(), &current.to_string(), Some(&path), "user");
        current
    }

    /// Native back; without an earlier entry fall back to the marketplace
    pub fn go_back(&mut self) -> Page {
        match self.history.go_back() {
            BackOutcome::Popped(path) => {
                self.handle_pop_state(&path);
            }
            BackOutcome::NoPrevious => {
                debug!("No previous history entry, returning to marketplace");
                self.commit(&Transition::Marketplace);
            }
        }
        self.machine.page()
    }

    /// Native forward, if there is a later entry
    pub fn go_forward(&mut self) -> Page {
        if let Some(path) = self.history.go_forward() {
            self.handle_pop_state(&path);
        }
        self.machine.page()
    }

    /// Host back/forward event; returns whether the state changed
    pub fn handle_pop_state(&mut self, path: &str) -> bool {
        self.sync_from_path(path, "popstate")
    }

    /// Synchronize with a full location such as a pasted link
    pub fn load_location(&mut self, location: &str) -> Result<bool> {
        let path = path::location_path(location)?;
        Ok(self.sync_from_path(&path, "location"))
    }

    /// Forward synchronizer: path to state, no history write
    fn sync_from_path(&mut self, path: &str, origin: &str) -> bool {
        let Some(transition) = path::parse(path, self.catalog.as_ref()) else {
            debug!(path = path, origin = origin, "Path left state unchanged");
            return false;
        };

        if self.machine.is_current(&transition) {
            debug!(path = path, origin = origin, "Path already reflected in state");
            return false;
        }

        let previous = self.machine.apply(&transition);
        log_navigation(&previous.to_string(), &self.machine.page().to_string(), Some(path), origin);
        true
    }

    // ---- Sessions ----

    pub fn create_session(&mut self) -> String {
        self.sessions.create_session()
    }

    pub fn update_session_messages(&mut self, session_id: &str, messages: Vec<Message>) -> bool {
        self.sessions.update_messages(session_id, messages)
    }

    /// Switch sessions, restoring the marketplace filter the session saved
    pub fn select_session(&mut self, id: &str) -> Result<()> {
        let snapshot = self.sessions.select(id)?.last_active_filters.clone();

        match snapshot {
            Some(filters) => {
                self.filters.restore(filters);
                self.commit(&Transition::Marketplace);
            }
            None if self.machine.page() == Page::Marketplace => self.filters.reset(),
            None => {}
        }
        Ok(())
    }

    // ---- Filters ----

    /// Merge a partial filter, snapshot it into the current session and show
    /// the marketplace
    pub fn apply_filters(&mut self, update: FilterUpdate) -> FilterState {
        let merged = self.filters.apply(&update, &mut self.sessions).clone();
        self.commit(&Transition::Marketplace);
        merged
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear(&mut self.sessions);
    }

    /// Start a fresh conversation from a search box
    pub fn quick_search(&mut self, query: &str, origin: Option<String>, location: Option<GeoPoint>) -> String {
        let session_id = self.sessions.create_session();
        self.filters.stage_query(normalize_whitespace(query));
        self.filters.merge_location(origin, location);
        self.chat_open = true;

        if self.machine.page() != Page::HospitalPage {
            self.commit(&Transition::Marketplace);
        }
        session_id
    }

    /// Query staged by the last quick search, delivered once to an empty session
    pub fn take_initial_query(&mut self) -> Option<String> {
        self.filters.take_staged_query(self.sessions.current())
    }

    pub fn set_chat_open(&mut self, open: bool) {
        self.chat_open = open;
    }

    pub fn toggle_chat_panel(&mut self) -> bool {
        self.chat_open = !self.chat_open;
        self.chat_open
    }

    // ---- Backup ----

    pub fn backup_sessions(&self) -> Result<String> {
        self.sessions.backup()
    }

    /// Replace all sessions and adopt the filter saved by the new current one
    pub fn restore_sessions(&mut self, backup_data: &str) -> Result<usize> {
        let count = self.sessions.restore(backup_data)?;
        match self.sessions.current().last_active_filters.clone() {
            Some(filters) => self.filters.restore(filters),
            None => self.filters.reset(),
        }
        Ok(count)
    }

    // ---- Rendering ----

    pub fn view(&self) -> ViewSnapshot {
        let requested_page = self.machine.page();
        let page = self.machine.rendered_page();
        let session = self.sessions.current();

        ViewSnapshot {
            page,
            requested_page,
            context: self.machine.context().summary(),
            chat_open: self.chat_open,
            filters: self.filters.live().clone(),
            current_session_id: session.id.clone(),
            current_session_title: session.title.clone(),
            path: self.history.current_path(),
            breadcrumbs: self.breadcrumbs(),
        }
    }

    /// Trail from Home to the rendered page
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut cursor = match Transition::from_state(self.machine.page(), self.machine.context()) {
            Ok(transition) => transition,
            Err(_) => match self.machine.rendered_page() {
                Page::Marketplace => Transition::Marketplace,
                _ => Transition::Home,
            },
        };

        let mut trail = Vec::new();
        loop {
            trail.push(Breadcrumb {
                label: self.label(&cursor),
                path: path::format(&cursor),
            });
            if matches!(cursor, Transition::Home) {
                break;
            }
            cursor = cursor.parent();
        }
        trail.reverse();
        trail
    }

    fn label(&self, transition: &Transition) -> String {
        let t = |text: &str| self.translator.t(text);
        match transition {
            Transition::Home => t("Home"),
            Transition::Marketplace => t("Marketplace"),
            Transition::Hospital(hospital) => hospital.name.clone(),
            Transition::Gallery(_) => t("Virtual Tour"),
            Transition::Facilities(_) => t("Facilities"),
            Transition::FacilityDetails { facility, .. } => t(facility.as_str()),
            Transition::Insights(_) => t("Insights"),
            Transition::Article { title, .. } => t(title.as_str()),
            Transition::Research { title, .. } => t(title.as_str()),
            Transition::Specialization { specialization, .. } => t(specialization.as_str()),
            Transition::Treatment { treatment, .. } => t(treatment.as_str()),
            Transition::Doctors => t("Doctors"),
            Transition::Doctor(doctor) => doctor.name.clone(),
            Transition::Packages => t("Packages"),
            Transition::Package(package) => t(package.name.as_str()),
        }
    }
}

impl std::fmt::Debug for AppController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("page", &self.machine.page())
            .field("history", &self.history)
            .field("current_session", &self.sessions.current_id())
            .field("chat_open", &self.chat_open)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::IdentityTranslator;
    use crate::models::Hospital;
    use crate::routing::MemoryHistory;
    use crate::services::InMemoryCatalog;
    use crate::state::MemoryStore;

    fn controller_at(path: &str) -> (AppController, MemoryHistory) {
        let catalog = InMemoryCatalog::new(vec![Hospital::new("h1", "Sunway Medical")], vec![], vec![]);
        let history = MemoryHistory::new(path);
        let controller = AppController::new(
            &Settings::default(),
            Arc::new(catalog),
            Box::new(history.clone()),
            Box::new(MemoryStore::new()),
            Arc::new(IdentityTranslator),
        );
        (controller, history)
    }

    #[test]
    fn test_initial_path_is_synchronized() {
        let (controller, history) = controller_at("/hospitals/sunway-medical/insights");
        assert_eq!(controller.page(), Page::HospitalInsights);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_entity_navigation_closes_chat() {
        let (mut controller, history) = controller_at("/");
        controller.set_chat_open(true);

        let hospital = Arc::clone(&controller.catalog().list_hospitals()[0]);
        controller.navigate(NavigationIntent::NavigateToHospital(hospital)).unwrap();

        assert!(!controller.chat_open());
        assert_eq!(history.current_path(), "/hospitals/sunway-medical");
    }

    #[test]
    fn test_refused_intent_keeps_state() {
        let (mut controller, history) = controller_at("/doctors");
        assert!(controller.navigate(NavigationIntent::NavigateToFacilities).is_err());
        assert_eq!(controller.page(), Page::Doctors);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_breadcrumbs() {
        let (controller, _) = controller_at("/hospitals/sunway-medical/facilities/cardiac-icu");
        let labels: Vec<String> = controller.breadcrumbs().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Home", "Marketplace", "Sunway Medical", "Facilities", "Cardiac Icu"]);

        let last = controller.breadcrumbs().pop().unwrap();
        assert_eq!(last.path, "/hospitals/sunway-medical/facilities/cardiac-icu");
    }

    #[test]
    fn test_view_snapshot_serializes() {
        let (controller, _) = controller_at("/doctors");
        let value = serde_json::to_value(controller.view()).unwrap();
        assert_eq!(value["page"], "Doctors");
        assert_eq!(value["path"], "/doctors");
        assert_eq!(value["currentSessionTitle"], "New Conversation");
    }
}
