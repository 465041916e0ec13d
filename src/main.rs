//! MediTrip navigator
//!
//! Command-line host for the navigation core: reads commands from stdin and
//! prints the resulting view as JSON.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use meditrip::{
    config::Settings,
    handlers::{execute, Command, Outcome},
    i18n::I18n,
    routing::MemoryHistory,
    services::InMemoryCatalog,
    state::FileStore,
    utils::logging,
    AppController,
};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load settings")?;
    settings.validate()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("print-config") {
        println!("{}", settings.to_toml()?);
        return Ok(());
    }

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;
    info!("Starting {}", meditrip::info());

    // Load catalog
    let catalog = match settings.catalog.path.as_deref() {
        Some(path) => InMemoryCatalog::from_json_file(path)
            .with_context(|| format!("failed to load catalog from {}", path))?,
        None => {
            warn!("No catalog configured, entity routes will not resolve");
            InMemoryCatalog::default()
        }
    };

    // Initialize i18n system
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations()?;
    let locale = std::env::var("LANG").ok();
    let language = i18n.set_language(locale.as_deref()).to_string();
    info!("Using language: {}", language);

    let initial_location = args.first().map(String::as_str).unwrap_or("/");
    let history = MemoryHistory::from_location(initial_location)?;
    let store = FileStore::new(&settings.storage.dir);

    let mut controller = AppController::new(
        &settings,
        Arc::new(catalog),
        Box::new(history),
        Box::new(store),
        Arc::new(i18n),
    );

    print_view(&controller)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match execute(&mut controller, command) {
            Ok(Outcome::Render) => print_view(&controller)?,
            Ok(Outcome::Text(text)) => println!("{}", text),
            Ok(Outcome::Quit) => break,
            Err(e) if e.is_recoverable() => eprintln!("{}", e),
            Err(e) => {
                error!(error = %e, "Unrecoverable command failure");
                return Err(e.into());
            }
        }
    }

    info!("MediTrip navigator has been shut down.");
    Ok(())
}

fn print_view(controller: &AppController) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &controller.view())?;
    writeln!(stdout)?;
    Ok(())
}
