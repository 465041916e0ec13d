//! View state machine
//!
//! A `Transition` fully determines the next `Page` and `ViewContext`; applying
//! it never patches the previous context, so re-applying the same transition
//! is a no-op. `NavigationIntent` is what the presentation layer emits; the
//! machine turns intents into transitions using the current context.

use std::sync::Arc;

use tracing::{debug, warn};

use super::context::{ContextField, Page, ViewContext};
use crate::models::{Doctor, Hospital, MedicalPackage};
use crate::routing::path::RESERVED_HOSPITAL_SEGMENTS;
use crate::routing::slug;
use crate::utils::errors::{MeditripError, Result};

/// A fully-resolved page change
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Home,
    Marketplace,
    Hospital(Arc<Hospital>),
    Gallery(Arc<Hospital>),
    Facilities(Arc<Hospital>),
    FacilityDetails { hospital: Arc<Hospital>, facility: String },
    Insights(Arc<Hospital>),
    Article { hospital: Arc<Hospital>, title: String },
    Research { hospital: Arc<Hospital>, title: String },
    Specialization { hospital: Arc<Hospital>, specialization: String },
    Treatment { hospital: Arc<Hospital>, specialization: String, treatment: String },
    Doctors,
    Doctor(Arc<Doctor>),
    Packages,
    Package(Arc<MedicalPackage>),
}

/// Navigation requests emitted by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationIntent {
    NavigateToHospital(Arc<Hospital>),
    NavigateToGallery,
    NavigateToFacilities,
    NavigateToFacilityDetails(String),
    NavigateToSpecialization(String),
    NavigateToTreatment(String),
    NavigateToInsights,
    NavigateToArticle(String),
    NavigateToResearch(String),
    NavigateToDoctor(Arc<Doctor>),
    NavigateToPackage(Arc<MedicalPackage>),
    NavigateToMarketplace,
    NavigateToDoctors,
    NavigateToPackages,
    NavigateToHome,
    /// Logical parent of the current page
    Back,
}

impl Transition {
    pub fn page(&self) -> Page {
        match self {
            Transition::Home => Page::Home,
            Transition::Marketplace => Page::Marketplace,
            Transition::Hospital(_) => Page::HospitalPage,
            Transition::Gallery(_) => Page::Gallery,
            Transition::Facilities(_) => Page::Facilities,
            Transition::FacilityDetails { .. } => Page::FacilityDetails,
            Transition::Insights(_) => Page::HospitalInsights,
            Transition::Article { .. } => Page::ArticleDetails,
            Transition::Research { .. } => Page::ResearchDetails,
            Transition::Specialization { .. } => Page::SpecializationDetails,
            Transition::Treatment { .. } => Page::TreatmentDetails,
            Transition::Doctors => Page::Doctors,
            Transition::Doctor(_) => Page::DoctorDetails,
            Transition::Packages => Page::Packages,
            Transition::Package(_) => Page::PackageDetails,
        }
    }

    /// The complete view context this transition establishes
    pub fn context(&self) -> ViewContext {
        let scoped = |hospital: &Arc<Hospital>| ViewContext {
            hospital: Some(Arc::clone(hospital)),
            ..ViewContext::default()
        };

        match self {
            Transition::Home
            | Transition::Marketplace
            | Transition::Doctors
            | Transition::Packages => ViewContext::default(),
            Transition::Hospital(hospital)
            | Transition::Gallery(hospital)
            | Transition::Facilities(hospital)
            | Transition::Insights(hospital) => scoped(hospital),
            Transition::FacilityDetails { hospital, facility } => ViewContext {
                facility_name: Some(facility.clone()),
                ..scoped(hospital)
            },
            Transition::Article { hospital, title } => ViewContext {
                article_title: Some(title.clone()),
                ..scoped(hospital)
            },
            Transition::Research { hospital, title } => ViewContext {
                research_title: Some(title.clone()),
                ..scoped(hospital)
            },
            Transition::Specialization { hospital, specialization } => ViewContext {
                specialization_name: Some(specialization.clone()),
                ..scoped(hospital)
            },
            Transition::Treatment { hospital, specialization, treatment } => ViewContext {
                specialization_name: Some(specialization.clone()),
                treatment_name: Some(treatment.clone()),
                ..scoped(hospital)
            },
            Transition::Doctor(doctor) => ViewContext {
                doctor: Some(Arc::clone(doctor)),
                ..ViewContext::default()
            },
            Transition::Package(package) => ViewContext {
                package: Some(Arc::clone(package)),
                ..ViewContext::default()
            },
        }
    }

    /// Entity detail transitions close the conversational side panel
    pub fn closes_chat_panel(&self) -> bool {
        !matches!(
            self,
            Transition::Home | Transition::Marketplace | Transition::Doctors | Transition::Packages
        )
    }

    /// Logical parent of the page this transition lands on
    pub fn parent(&self) -> Transition {
        match self {
            Transition::Treatment { hospital, specialization, .. } => Transition::Specialization {
                hospital: Arc::clone(hospital),
                specialization: specialization.clone(),
            },
            Transition::FacilityDetails { hospital, .. } => Transition::Facilities(Arc::clone(hospital)),
            Transition::Gallery(hospital)
            | Transition::Facilities(hospital)
            | Transition::Insights(hospital)
            | Transition::Article { hospital, .. }
            | Transition::Research { hospital, .. }
            | Transition::Specialization { hospital, .. } => Transition::Hospital(Arc::clone(hospital)),
            Transition::Hospital(_) => Transition::Marketplace,
            Transition::Doctor(_) => Transition::Doctors,
            Transition::Package(_) => Transition::Packages,
            Transition::Doctors
            | Transition::Packages
            | Transition::Marketplace
            | Transition::Home => Transition::Home,
        }
    }

    /// Rebuild the transition that produced `page` from a context
    pub fn from_state(page: Page, context: &ViewContext) -> Result<Transition> {
        let hospital = || require(page, ContextField::Hospital, context.hospital.clone());
        let name = |field: ContextField, value: &Option<String>| require(page, field, value.clone());

        Ok(match page {
            Page::Home => Transition::Home,
            Page::Marketplace => Transition::Marketplace,
            Page::Doctors => Transition::Doctors,
            Page::Packages => Transition::Packages,
            Page::HospitalPage => Transition::Hospital(hospital()?),
            Page::Gallery => Transition::Gallery(hospital()?),
            Page::Facilities => Transition::Facilities(hospital()?),
            Page::HospitalInsights => Transition::Insights(hospital()?),
            Page::FacilityDetails => Transition::FacilityDetails {
                hospital: hospital()?,
                facility: name(ContextField::FacilityName, &context.facility_name)?,
            },
            Page::ArticleDetails => Transition::Article {
                hospital: hospital()?,
                title: name(ContextField::ArticleTitle, &context.article_title)?,
            },
            Page::ResearchDetails => Transition::Research {
                hospital: hospital()?,
                title: name(ContextField::ResearchTitle, &context.research_title)?,
            },
            Page::SpecializationDetails => Transition::Specialization {
                hospital: hospital()?,
                specialization: name(ContextField::SpecializationName, &context.specialization_name)?,
            },
            Page::TreatmentDetails => Transition::Treatment {
                hospital: hospital()?,
                specialization: name(ContextField::SpecializationName, &context.specialization_name)?,
                treatment: name(ContextField::TreatmentName, &context.treatment_name)?,
            },
            Page::DoctorDetails => Transition::Doctor(require(page, ContextField::Doctor, context.doctor.clone())?),
            Page::PackageDetails => Transition::Package(require(page, ContextField::Package, context.package.clone())?),
        })
    }
}

/// Accept `name` only if it writes a path segment that parses back to `field`
fn path_name(field: ContextField, name: String) -> Result<String> {
    let token = slug::encode(&name);
    if token.is_empty() {
        return Err(MeditripError::InvalidInput(format!(
            "{} '{}' has no URL form",
            field.as_str(),
            name
        )));
    }
    if field == ContextField::SpecializationName && RESERVED_HOSPITAL_SEGMENTS.contains(&token.as_str()) {
        return Err(MeditripError::InvalidInput(format!(
            "specialization '{}' collides with the '{}' hospital page",
            name, token
        )));
    }
    Ok(name)
}

fn require<T>(page: Page, field: ContextField, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| MeditripError::MissingViewContext {
        page: page.to_string(),
        field: field.as_str(),
    })
}

/// Holds the active page and the context backing it
#[derive(Debug, Clone)]
pub struct ViewStateMachine {
    page: Page,
    context: ViewContext,
}

impl ViewStateMachine {
    /// Create a machine in the initial state (Home, empty context)
    pub fn new() -> Self {
        Self {
            page: Page::Home,
            context: ViewContext::default(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Page to render after the context guard
    pub fn rendered_page(&self) -> Page {
        self.context.renderable_page(self.page)
    }

    /// Turn an intent into a transition against the current context
    ///
    /// Hospital-scoped intents borrow the hospital (and, for treatments, the
    /// specialization) from the active context; if it is missing the intent
    /// is refused and the state is left untouched. Names that would write an
    /// empty or reserved path segment are refused as well.
    pub fn resolve(&self, intent: NavigationIntent) -> Result<Transition> {
        let hospital = |target: Page| require(target, ContextField::Hospital, self.context.hospital.clone());

        let transition = match intent {
            NavigationIntent::NavigateToHospital(hospital) => {
                path_name(ContextField::Hospital, hospital.name.clone())?;
                Transition::Hospital(hospital)
            }
            NavigationIntent::NavigateToGallery => Transition::Gallery(hospital(Page::Gallery)?),
            NavigationIntent::NavigateToFacilities => Transition::Facilities(hospital(Page::Facilities)?),
            NavigationIntent::NavigateToFacilityDetails(facility) => Transition::FacilityDetails {
                hospital: hospital(Page::FacilityDetails)?,
                facility: path_name(ContextField::FacilityName, facility)?,
            },
            NavigationIntent::NavigateToSpecialization(specialization) => Transition::Specialization {
                hospital: hospital(Page::SpecializationDetails)?,
                specialization: path_name(ContextField::SpecializationName, specialization)?,
            },
            NavigationIntent::NavigateToTreatment(treatment) => Transition::Treatment {
                hospital: hospital(Page::TreatmentDetails)?,
                specialization: require(
                    Page::TreatmentDetails,
                    ContextField::SpecializationName,
                    self.context.specialization_name.clone(),
                )?,
                treatment: path_name(ContextField::TreatmentName, treatment)?,
            },
            NavigationIntent::NavigateToInsights => Transition::Insights(hospital(Page::HospitalInsights)?),
            NavigationIntent::NavigateToArticle(title) => Transition::Article {
                hospital: hospital(Page::ArticleDetails)?,
                title: path_name(ContextField::ArticleTitle, title)?,
            },
            NavigationIntent::NavigateToResearch(title) => Transition::Research {
                hospital: hospital(Page::ResearchDetails)?,
                title: path_name(ContextField::ResearchTitle, title)?,
            },
            NavigationIntent::NavigateToDoctor(doctor) => {
                path_name(ContextField::Doctor, doctor.name.clone())?;
                Transition::Doctor(doctor)
            }
            NavigationIntent::NavigateToPackage(package) => {
                path_name(ContextField::Package, package.name.clone())?;
                Transition::Package(package)
            }
            NavigationIntent::NavigateToMarketplace => Transition::Marketplace,
            NavigationIntent::NavigateToDoctors => Transition::Doctors,
            NavigationIntent::NavigateToPackages => Transition::Packages,
            NavigationIntent::NavigateToHome => Transition::Home,
            NavigationIntent::Back => self.back_transition(),
        };

        Ok(transition)
    }

    /// Inverse of the transition that produced the current state
    pub fn back_transition(&self) -> Transition {
        match Transition::from_state(self.page, &self.context) {
            Ok(current) => current.parent(),
            Err(e) => {
                warn!(page = %self.page, error = %e, "Current state is not renderable, backing out to fallback");
                match self.page.fallback() {
                    Page::Marketplace => Transition::Marketplace,
                    _ => Transition::Home,
                }
            }
        }
    }

    /// Apply a transition, returning the page that was active before
    pub fn apply(&mut self, transition: &Transition) -> Page {
        let previous = self.page;
        self.context = transition.context();
        self.page = transition.page();
        debug!(from = %previous, to = %self.page, "View state updated");
        previous
    }

    /// Whether applying `transition` would leave page and context unchanged
    pub fn is_current(&self, transition: &Transition) -> bool {
        self.page == transition.page() && self.context == transition.context()
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
