//! Session, filter and chat command handlers

use tracing::info;

use super::{Command, Outcome};
use crate::controller::AppController;
use crate::models::Message;
use crate::utils::errors::{MeditripError, Result};
use crate::utils::helpers::format_timestamp;

/// Handle session and filter commands
pub fn handle_session_command(controller: &mut AppController, command: Command) -> Result<Outcome> {
    let outcome = match command {
        Command::Search { query, origin, location } => {
            let session_id = controller.quick_search(&query, origin, location);
            info!(session_id = %session_id, "Quick search started a new session");
            Outcome::Render
        }
        Command::Filter(update) => {
            controller.apply_filters(update);
            Outcome::Render
        }
        Command::Clear => {
            controller.clear_filters();
            Outcome::Render
        }
        Command::New => {
            let session_id = controller.create_session();
            Outcome::Text(format!("Created session {}", session_id))
        }
        Command::Say(text) => {
            append_message(controller, Message::user(text));
            Outcome::Render
        }
        Command::Reply(text) => {
            append_message(controller, Message::assistant(text));
            Outcome::Render
        }
        Command::Select(id) => {
            controller.select_session(&id)?;
            Outcome::Render
        }
        Command::Sessions => Outcome::Text(list_sessions(controller)),
        Command::InitialQuery => match controller.take_initial_query() {
            Some(query) => Outcome::Text(format!("Initial query: {}", query)),
            None => Outcome::Text("No initial query pending".to_string()),
        },
        Command::Chat => {
            let open = controller.toggle_chat_panel();
            Outcome::Text(format!("Chat panel {}", if open { "opened" } else { "closed" }))
        }
        Command::Backup => Outcome::Text(controller.backup_sessions()?),
        Command::Restore(file) => {
            let data = std::fs::read_to_string(&file)?;
            let count = controller.restore_sessions(&data)?;
            Outcome::Text(format!("Restored {} sessions from {}", count, file))
        }
        other => {
            return Err(MeditripError::InvalidInput(format!(
                "not a session command: {:?}",
                other
            )))
        }
    };

    Ok(outcome)
}

/// Append to the current session's log, as the chat panel would
fn append_message(controller: &mut AppController, message: Message) {
    let session = controller.current_session();
    let session_id = session.id.clone();
    let mut messages = session.messages.clone();
    messages.push(message);
    controller.update_session_messages(&session_id, messages);
}

fn list_sessions(controller: &AppController) -> String {
    let current = controller.sessions().current_id();
    controller
        .sessions()
        .sessions()
        .iter()
        .map(|session| {
            format!(
                "{} {}  {}  ({} messages, updated {}){}",
                if session.id == current { "*" } else { " " },
                session.id,
                session.title,
                session.messages.len(),
                format_timestamp(session.updated_at),
                if session.last_active_filters.is_some() { " [filters]" } else { "" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::config::Settings;
    use crate::i18n::IdentityTranslator;
    use crate::models::FilterUpdate;
    use crate::routing::MemoryHistory;
    use crate::services::InMemoryCatalog;
    use crate::state::{MemoryStore, Page};

    fn controller() -> AppController {
        AppController::new(
            &Settings::default(),
            Arc::new(InMemoryCatalog::default()),
            Box::new(MemoryHistory::new("/doctors")),
            Box::new(MemoryStore::new()),
            Arc::new(IdentityTranslator),
        )
    }

    #[test]
    fn test_say_retitles_session() {
        let mut controller = controller();
        handle_session_command(&mut controller, Command::Say("Hip replacement options".to_string())).unwrap();
        assert_eq!(controller.current_session().title, "Hip replacement options");
        assert_eq!(controller.current_session().messages.len(), 1);
    }

    #[test]
    fn test_filter_moves_to_marketplace() {
        let mut controller = controller();
        handle_session_command(&mut controller, Command::Filter(FilterUpdate::query("ivf"))).unwrap();
        assert_eq!(controller.page(), Page::Marketplace);
        assert_eq!(controller.filters().search_query, "ivf");
    }

    #[test]
    fn test_session_listing_marks_current() {
        let mut controller = controller();
        handle_session_command(&mut controller, Command::New).unwrap();
        let listing = list_sessions(&controller);
        assert_eq!(listing.lines().count(), 2);
        assert!(listing.lines().next().unwrap().starts_with('*'));
    }

    #[test]
    fn test_initial_query_is_consumed() {
        let mut controller = controller();
        handle_session_command(
            &mut controller,
            Command::Search { query: "dental  veneers".to_string(), origin: None, location: None },
        )
        .unwrap();

        assert_eq!(
            handle_session_command(&mut controller, Command::InitialQuery).unwrap(),
            Outcome::Text("Initial query: dental veneers".to_string())
        );
        assert_eq!(
            handle_session_command(&mut controller, Command::InitialQuery).unwrap(),
            Outcome::Text("No initial query pending".to_string())
        );
    }
}
