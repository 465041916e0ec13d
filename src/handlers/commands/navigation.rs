//! Navigation command handlers

use tracing::info;

use super::{Command, Outcome};
use crate::controller::AppController;
use crate::routing::{resolve_doctor_by_slug, resolve_hospital_by_slug, resolve_package_by_slug};
use crate::state::NavigationIntent;
use crate::utils::errors::{MeditripError, Result};

/// Handle page navigation commands
pub fn handle_navigation(controller: &mut AppController, command: Command) -> Result<Outcome> {
    match command {
        Command::Load(location) => {
            if !controller.load_location(&location)? {
                info!(location = %location, "Location did not change the view");
            }
        }
        Command::Pop(path) => {
            controller.handle_pop_state(&path);
        }
        Command::Back => {
            controller.go_back();
        }
        Command::Forward => {
            controller.go_forward();
        }
        other => {
            let intent = intent_for(controller, other)?;
            controller.navigate(intent)?;
        }
    }

    Ok(Outcome::Render)
}

/// Map a command to the intent the presentation layer would emit
fn intent_for(controller: &AppController, command: Command) -> Result<NavigationIntent> {
    let catalog = controller.catalog();

    let intent = match command {
        Command::Up => NavigationIntent::Back,
        Command::Home => NavigationIntent::NavigateToHome,
        Command::Marketplace => NavigationIntent::NavigateToMarketplace,
        Command::Doctors => NavigationIntent::NavigateToDoctors,
        Command::Packages => NavigationIntent::NavigateToPackages,
        Command::Hospital(slug) => NavigationIntent::NavigateToHospital(resolve_hospital_by_slug(catalog, &slug)?),
        Command::Doctor(slug) => NavigationIntent::NavigateToDoctor(resolve_doctor_by_slug(catalog, &slug)?),
        Command::Package(slug) => NavigationIntent::NavigateToPackage(resolve_package_by_slug(catalog, &slug)?),
        Command::Tour => NavigationIntent::NavigateToGallery,
        Command::Facilities => NavigationIntent::NavigateToFacilities,
        Command::Facility(name) => NavigationIntent::NavigateToFacilityDetails(name),
        Command::Insights => NavigationIntent::NavigateToInsights,
        Command::Article(title) => NavigationIntent::NavigateToArticle(title),
        Command::Research(title) => NavigationIntent::NavigateToResearch(title),
        Command::Specialization(name) => NavigationIntent::NavigateToSpecialization(name),
        Command::Treatment(name) => NavigationIntent::NavigateToTreatment(name),
        other => {
            return Err(MeditripError::InvalidInput(format!(
                "not a navigation command: {:?}",
                other
            )))
        }
    };

    Ok(intent)
}
