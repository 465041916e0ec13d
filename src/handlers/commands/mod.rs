//! Command handlers module
//!
//! This module parses text commands (one per line) and dispatches them to the
//! navigation, session and help handlers.

pub mod navigation;
pub mod sessions;
pub mod help;

use tracing::{debug, error, warn};

use crate::controller::AppController;
use crate::models::{FilterUpdate, GeoPoint};
use crate::utils::errors::{MeditripError, Result};
use crate::utils::helpers::parse_key_value_pairs;

/// All available commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Synchronize with a location, as on initial load
    Load(String),
    /// Host back/forward event landing on a path
    Pop(String),
    Back,
    Forward,
    /// Logical parent of the current page
    Up,
    Home,
    Marketplace,
    Doctors,
    Packages,
    Hospital(String),
    Doctor(String),
    Package(String),
    Tour,
    Facilities,
    Facility(String),
    Insights,
    Article(String),
    Research(String),
    Specialization(String),
    Treatment(String),
    Search {
        query: String,
        origin: Option<String>,
        location: Option<GeoPoint>,
    },
    Filter(FilterUpdate),
    Clear,
    New,
    Say(String),
    Reply(String),
    Select(String),
    Sessions,
    InitialQuery,
    Chat,
    State,
    Backup,
    Restore(String),
    Help,
    Quit,
}

/// What the front end should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Render the current view
    Render,
    /// Print a message
    Text(String),
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let argument = |usage: &str| -> Result<String> {
            if rest.is_empty() {
                Err(MeditripError::InvalidInput(format!("usage: {}", usage)))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name.to_lowercase().as_str() {
            "load" | "open" => Command::Load(argument("load <location>")?),
            "pop" => Command::Pop(argument("pop <path>")?),
            "back" => Command::Back,
            "forward" => Command::Forward,
            "up" | "parent" => Command::Up,
            "home" => Command::Home,
            "marketplace" | "market" => Command::Marketplace,
            "doctors" => Command::Doctors,
            "packages" => Command::Packages,
            "hospital" => Command::Hospital(argument("hospital <slug>")?),
            "doctor" => Command::Doctor(argument("doctor <slug>")?),
            "package" => Command::Package(argument("package <slug>")?),
            "tour" | "gallery" => Command::Tour,
            "facilities" => Command::Facilities,
            "facility" => Command::Facility(argument("facility <name>")?),
            "insights" => Command::Insights,
            "article" => Command::Article(argument("article <title>")?),
            "research" => Command::Research(argument("research <title>")?),
            "specialization" | "spec" => Command::Specialization(argument("specialization <name>")?),
            "treatment" => Command::Treatment(argument("treatment <name>")?),
            "search" => parse_search(rest)?,
            "filter" => Command::Filter(parse_filter(rest)?),
            "clear" => Command::Clear,
            "new" => Command::New,
            "say" => Command::Say(argument("say <message>")?),
            "reply" => Command::Reply(argument("reply <message>")?),
            "select" => Command::Select(argument("select <session id>")?),
            "sessions" => Command::Sessions,
            "initial" => Command::InitialQuery,
            "chat" => Command::Chat,
            "state" | "view" => Command::State,
            "backup" => Command::Backup,
            "restore" => Command::Restore(argument("restore <file>")?),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(MeditripError::InvalidInput(format!("unknown command: {}", other))),
        };

        Ok(command)
    }
}

/// `search <words...> [origin=<city>] [lat=<f64> lng=<f64>]`
fn parse_search(rest: &str) -> Result<Command> {
    let pairs = parse_key_value_pairs(rest);
    let query = rest
        .split_whitespace()
        .filter(|word| !word.contains('='))
        .collect::<Vec<_>>()
        .join(" ");

    if query.is_empty() {
        return Err(MeditripError::InvalidInput("usage: search <query> [origin=..] [lat=.. lng=..]".to_string()));
    }

    let location = match (pairs.get("lat"), pairs.get("lng")) {
        (Some(lat), Some(lng)) => Some(GeoPoint {
            lat: parse_coordinate(lat)?,
            lng: parse_coordinate(lng)?,
        }),
        (None, None) => None,
        _ => return Err(MeditripError::InvalidInput("lat and lng must be given together".to_string())),
    };

    Ok(Command::Search {
        query,
        origin: pairs.get("origin").cloned(),
        location,
    })
}

fn parse_coordinate(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| MeditripError::InvalidInput(format!("invalid coordinate: {}", raw)))
}

/// `filter key=value ...`; `query`, `origin` and `list` (or their JSON names)
/// map to the named fields, every other key is an extra marketplace field
fn parse_filter(rest: &str) -> Result<FilterUpdate> {
    let pairs = parse_key_value_pairs(rest);
    if pairs.is_empty() {
        return Err(MeditripError::InvalidInput("usage: filter key=value ...".to_string()));
    }

    let mut update = FilterUpdate::default();
    for (key, value) in pairs {
        let key = match key.as_str() {
            "query" => "searchQuery".to_string(),
            "origin" => "userOrigin".to_string(),
            "list" => "aiListName".to_string(),
            _ => key,
        };
        update = update.with_field(key, value);
    }
    Ok(update)
}

/// Main command dispatcher
pub fn execute(controller: &mut AppController, command: Command) -> Result<Outcome> {
    debug!(?command, "Executing command");

    let result = match command {
        Command::Load(_)
        | Command::Pop(_)
        | Command::Back
        | Command::Forward
        | Command::Up
        | Command::Home
        | Command::Marketplace
        | Command::Doctors
        | Command::Packages
        | Command::Hospital(_)
        | Command::Doctor(_)
        | Command::Package(_)
        | Command::Tour
        | Command::Facilities
        | Command::Facility(_)
        | Command::Insights
        | Command::Article(_)
        | Command::Research(_)
        | Command::Specialization(_)
        | Command::Treatment(_) => navigation::handle_navigation(controller, command),
        Command::Search { .. }
        | Command::Filter(_)
        | Command::Clear
        | Command::New
        | Command::Say(_)
        | Command::Reply(_)
        | Command::Select(_)
        | Command::Sessions
        | Command::InitialQuery
        | Command::Chat
        | Command::Backup
        | Command::Restore(_) => sessions::handle_session_command(controller, command),
        Command::State => Ok(Outcome::Render),
        Command::Help => Ok(Outcome::Text(help::help_text().to_string())),
        Command::Quit => Ok(Outcome::Quit),
    };

    if let Err(e) = &result {
        if e.is_recoverable() {
            warn!(error = %e, severity = %e.severity(), "Command could not be completed");
        } else {
            error!(error = %e, severity = %e.severity(), "Error handling command");
        }
    }
    result
}
