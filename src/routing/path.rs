//! URL⇄State synchronizer
//!
//! `parse` maps a location path to the transition it addresses and `format`
//! builds the canonical path for a transition. Neither touches host history;
//! the controller wires them to the history adapter.
//!
//! Path grammar (segments are case-sensitive):
//!
//! ```text
//! /
//! /hospitals/{hospital}[/tour | /facilities[/{facility}] | /insights
//!                      | /articles/{article} | /research/{research}
//!                      | /{specialization}[/{treatment}]]
//! /doctors[/{doctor}]
//! /packages[/{package}]
//! ```

use std::borrow::Cow;

use tracing::debug;
use url::Url;

use super::resolver;
use super::slug;
use crate::models::Hospital;
use crate::services::Catalog;
use crate::state::machine::Transition;
use crate::utils::errors::{MeditripError, Result};

const HOSPITALS: &str = "hospitals";
const DOCTORS: &str = "doctors";
const PACKAGES: &str = "packages";
const TOUR: &str = "tour";
const FACILITIES: &str = "facilities";
const INSIGHTS: &str = "insights";
const ARTICLES: &str = "articles";
const RESEARCH: &str = "research";

/// Sub-page tokens that can never be read as a specialization slug
pub const RESERVED_HOSPITAL_SEGMENTS: [&str; 5] = [TOUR, FACILITIES, INSIGHTS, ARTICLES, RESEARCH];

/// Parse a location path into the transition it addresses
///
/// Returns `None` when nothing in the grammar matches or a slug does not
/// resolve against the catalog; the caller leaves its state untouched.
pub fn parse(path: &str, catalog: &dyn Catalog) -> Option<Transition> {
    let segments = split_segments(path);
    let parts: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();

    let transition = match parts.as_slice() {
        [] => Some(Transition::Home),
        [HOSPITALS, hospital_slug, rest @ ..] => parse_hospital_route(catalog, hospital_slug, rest),
        [DOCTORS] => Some(Transition::Doctors),
        [DOCTORS, doctor_slug] => resolver::resolve_doctor_by_slug(catalog, doctor_slug)
            .ok()
            .map(Transition::Doctor),
        [PACKAGES] => Some(Transition::Packages),
        [PACKAGES, package_slug] => resolver::resolve_package_by_slug(catalog, package_slug)
            .ok()
            .map(Transition::Package),
        _ => None,
    };

    if transition.is_none() {
        debug!(path = path, "No route matches path");
    }
    transition
}

fn parse_hospital_route(catalog: &dyn Catalog, hospital_slug: &str, rest: &[&str]) -> Option<Transition> {
    let hospital = resolver::resolve_hospital_by_slug(catalog, hospital_slug).ok()?;

    let transition = match rest {
        [] => Transition::Hospital(hospital),
        [TOUR] => Transition::Gallery(hospital),
        [FACILITIES] => Transition::Facilities(hospital),
        [FACILITIES, facility_slug] => {
            let facility = canonical_or_decoded(hospital.facility_by_slug(facility_slug), facility_slug);
            Transition::FacilityDetails { hospital, facility }
        }
        [INSIGHTS] => Transition::Insights(hospital),
        [ARTICLES, article_slug] => {
            let title = canonical_or_decoded(hospital.article_by_slug(article_slug), article_slug);
            Transition::Article { hospital, title }
        }
        [RESEARCH, research_slug] => {
            let title = canonical_or_decoded(hospital.research_by_slug(research_slug), research_slug);
            Transition::Research { hospital, title }
        }
        [ARTICLES] | [RESEARCH] => return None,
        [specialization_slug] => {
            let specialization = specialization_name(&hospital, specialization_slug);
            Transition::Specialization { hospital, specialization }
        }
        [specialization_slug, treatment_slug] if !RESERVED_HOSPITAL_SEGMENTS.contains(specialization_slug) => {
            let specialization = specialization_name(&hospital, specialization_slug);
            let treatment = hospital
                .specialization_by_slug(specialization_slug)
                .and_then(|s| s.treatment_by_slug(treatment_slug))
                .map(str::to_string)
                .unwrap_or_else(|| slug::decode(treatment_slug));
            Transition::Treatment { hospital, specialization, treatment }
        }
        _ => return None,
    };

    Some(transition)
}

fn specialization_name(hospital: &Hospital, specialization_slug: &str) -> String {
    hospital
        .specialization_by_slug(specialization_slug)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| slug::decode(specialization_slug))
}

fn canonical_or_decoded(canonical: Option<&str>, segment: &str) -> String {
    canonical
        .map(str::to_string)
        .unwrap_or_else(|| slug::decode(segment))
}

/// Split a path into non-empty, percent-decoded segments
fn split_segments(path: &str) -> Vec<Cow<'_, str>> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment)))
        .collect()
}

/// Build the canonical path for a transition
///
/// Marketplace has no address of its own and is mirrored as `/`.
pub fn format(transition: &Transition) -> String {
    match transition {
        Transition::Home | Transition::Marketplace => "/".to_string(),
        Transition::Hospital(hospital) => hospital_path(hospital),
        Transition::Gallery(hospital) => format!("{}/{}", hospital_path(hospital), TOUR),
        Transition::Facilities(hospital) => format!("{}/{}", hospital_path(hospital), FACILITIES),
        Transition::FacilityDetails { hospital, facility } => {
            format!("{}/{}/{}", hospital_path(hospital), FACILITIES, slug::encode(facility))
        }
        Transition::Insights(hospital) => format!("{}/{}", hospital_path(hospital), INSIGHTS),
        Transition::Article { hospital, title } => {
            format!("{}/{}/{}", hospital_path(hospital), ARTICLES, slug::encode(title))
        }
        Transition::Research { hospital, title } => {
            format!("{}/{}/{}", hospital_path(hospital), RESEARCH, slug::encode(title))
        }
        Transition::Specialization { hospital, specialization } => {
            format!("{}/{}", hospital_path(hospital), slug::encode(specialization))
        }
        Transition::Treatment { hospital, specialization, treatment } => format!(
            "{}/{}/{}",
            hospital_path(hospital),
            slug::encode(specialization),
            slug::encode(treatment)
        ),
        Transition::Doctors => format!("/{}", DOCTORS),
        Transition::Doctor(doctor) => format!("/{}/{}", DOCTORS, slug::encode(&doctor.name)),
        Transition::Packages => format!("/{}", PACKAGES),
        Transition::Package(package) => format!("/{}/{}", PACKAGES, slug::encode(&package.name)),
    }
}

fn hospital_path(hospital: &Hospital) -> String {
    format!("/{}/{}", HOSPITALS, hospital.slug())
}

/// Reduce a location (absolute URL or bare path) to its path component
pub fn location_path(location: &str) -> Result<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Ok("/".to_string());
    }

    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://localhost/")?;
            base.join(trimmed)?
        }
        Err(e) => return Err(MeditripError::UrlParse(e)),
    };

    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::models::{Doctor, MedicalPackage, Specialization};
    use crate::services::InMemoryCatalog;
    use crate::state::context::Page;
    use assert_matches::assert_matches;

    fn catalog() -> InMemoryCatalog {
        let mut gleneagles = Hospital::new("h2", "Gleneagles Penang");
        gleneagles.facilities = vec!["MRI (3T) Suite".to_string()];
        gleneagles.specializations = vec![Specialization {
            name: "Cardiology".to_string(),
            treatments: vec!["TAVI / TAVR".to_string()],
        }];

        InMemoryCatalog::new(
            vec![Hospital::new("h1", "Sunway Medical"), gleneagles],
            vec![Doctor::new("d1", "Dr. Aisha Rahman")],
            vec![MedicalPackage::new("p1", "Heart Screening")],
        )
    }

    #[test]
    fn test_root() {
        let catalog = catalog();
        assert_eq!(parse("/", &catalog), Some(Transition::Home));
        assert_eq!(parse("", &catalog), Some(Transition::Home));
    }

    #[test]
    fn test_facility_details_decodes_name() {
        let catalog = catalog();
        let transition = parse("/hospitals/sunway-medical/facilities/cardiac-icu", &catalog).unwrap();
        assert_eq!(transition.page(), Page::FacilityDetails);
        assert_matches!(
            transition,
            Transition::FacilityDetails { ref hospital, ref facility }
                if hospital.name == "Sunway Medical" && facility == "Cardiac Icu"
        );
    }

    #[test]
    fn test_listed_names_resolve_canonically() {
        let catalog = catalog();
        let facility = parse("/hospitals/gleneagles-penang/facilities/mri-3t-suite", &catalog).unwrap();
        assert_matches!(facility, Transition::FacilityDetails { ref facility, .. } if facility == "MRI (3T) Suite");

        let treatment = parse("/hospitals/gleneagles-penang/cardiology/tavi-tavr", &catalog).unwrap();
        assert_matches!(
            treatment,
            Transition::Treatment { ref specialization, ref treatment, .. }
                if specialization == "Cardiology" && treatment == "TAVI / TAVR"
        );
    }

    #[test]
    fn test_hospital_sub_pages() {
        let catalog = catalog();
        let page = |p: &str| parse(p, &catalog).map(|t| t.page());

        assert_eq!(page("/hospitals/sunway-medical"), Some(Page::HospitalPage));
        assert_eq!(page("/hospitals/sunway-medical/"), Some(Page::HospitalPage));
        assert_eq!(page("/hospitals/sunway-medical/tour"), Some(Page::Gallery));
        assert_eq!(page("/hospitals/sunway-medical/facilities"), Some(Page::Facilities));
        assert_eq!(page("/hospitals/sunway-medical/insights"), Some(Page::HospitalInsights));
        assert_eq!(page("/hospitals/sunway-medical/articles/robotic-surgery"), Some(Page::ArticleDetails));
        assert_eq!(page("/hospitals/sunway-medical/research/stem-cells"), Some(Page::ResearchDetails));
        assert_eq!(page("/hospitals/sunway-medical/oncology"), Some(Page::SpecializationDetails));
        assert_eq!(page("/hospitals/sunway-medical/oncology/proton-therapy"), Some(Page::TreatmentDetails));
    }

    #[test]
    fn test_unmatched_paths() {
        let catalog = catalog();
        assert_eq!(parse("/hospitals", &catalog), None);
        assert_eq!(parse("/hospitals/unknown-hospital", &catalog), None);
        assert_eq!(parse("/hospitals/unknown-hospital/tour", &catalog), None);
        assert_eq!(parse("/hospitals/sunway-medical/articles", &catalog), None);
        assert_eq!(parse("/hospitals/sunway-medical/tour/extra", &catalog), None);
        assert_eq!(parse("/hospitals/sunway-medical/a/b/c", &catalog), None);
        assert_eq!(parse("/doctors/nobody", &catalog), None);
        assert_eq!(parse("/packages/nothing", &catalog), None);
        assert_eq!(parse("/Doctors", &catalog), None);
        assert_eq!(parse("/about", &catalog), None);
    }

    #[test]
    fn test_list_and_detail_routes() {
        let catalog = catalog();
        assert_eq!(parse("/doctors", &catalog), Some(Transition::Doctors));
        assert_eq!(parse("/packages", &catalog), Some(Transition::Packages));
        assert_eq!(parse("/doctors/dr-aisha-rahman", &catalog).unwrap().page(), Page::DoctorDetails);
        assert_eq!(parse("/packages/heart-screening", &catalog).unwrap().page(), Page::PackageDetails);
    }

    #[test]
    fn test_percent_encoded_segments() {
        let catalog = catalog();
        let transition = parse("/hospitals/sunway-medical/articles/caf%C3%A9-talk", &catalog).unwrap();
        assert_matches!(transition, Transition::Article { ref title, .. } if title == "Café Talk");
    }

    #[test]
    fn test_format() {
        let hospital = Arc::new(Hospital::new("h1", "Sunway Medical"));
        assert_eq!(format(&Transition::Home), "/");
        assert_eq!(format(&Transition::Marketplace), "/");
        assert_eq!(format(&Transition::Gallery(hospital.clone())), "/hospitals/sunway-medical/tour");
        assert_eq!(
            format(&Transition::Treatment {
                hospital,
                specialization: "Orthopaedic Surgery".to_string(),
                treatment: "Knee Replacement".to_string(),
            }),
            "/hospitals/sunway-medical/orthopaedic-surgery/knee-replacement"
        );
        assert_eq!(
            format(&Transition::Doctor(Arc::new(Doctor::new("d1", "Dr. Aisha Rahman")))),
            "/doctors/dr-aisha-rahman"
        );
    }

    #[test]
    fn test_location_path() {
        assert_eq!(location_path("https://meditrip.example/doctors?page=2").unwrap(), "/doctors");
        assert_eq!(location_path("/hospitals/sunway-medical#top").unwrap(), "/hospitals/sunway-medical");
        assert_eq!(location_path("").unwrap(), "/");
        assert!(location_path("http://[::1").is_err());
    }
}
