//! Page and view context
//!
//! `Page` is the single active screen. `ViewContext` holds the catalog
//! entities and free-text names the active page is about. A detail page is
//! only renderable while every field it requires is populated.

use std::sync::Arc;

use serde::Serialize;

use crate::models::{Doctor, Hospital, MedicalPackage};
use crate::utils::errors::{MeditripError, Result};

/// The enumerated page states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Page {
    Home,
    Marketplace,
    HospitalPage,
    Doctors,
    DoctorDetails,
    Gallery,
    Facilities,
    FacilityDetails,
    Packages,
    PackageDetails,
    SpecializationDetails,
    HospitalInsights,
    ArticleDetails,
    ResearchDetails,
    TreatmentDetails,
}

/// A populated-or-not slot of the view context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextField {
    Hospital,
    FacilityName,
    Doctor,
    Package,
    SpecializationName,
    ArticleTitle,
    ResearchTitle,
    TreatmentName,
}

impl ContextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextField::Hospital => "hospital",
            ContextField::FacilityName => "facility_name",
            ContextField::Doctor => "doctor",
            ContextField::Package => "package",
            ContextField::SpecializationName => "specialization_name",
            ContextField::ArticleTitle => "article_title",
            ContextField::ResearchTitle => "research_title",
            ContextField::TreatmentName => "treatment_name",
        }
    }
}

impl Page {
    pub const ALL: [Page; 15] = [
        Page::Home,
        Page::Marketplace,
        Page::HospitalPage,
        Page::Doctors,
        Page::DoctorDetails,
        Page::Gallery,
        Page::Facilities,
        Page::FacilityDetails,
        Page::Packages,
        Page::PackageDetails,
        Page::SpecializationDetails,
        Page::HospitalInsights,
        Page::ArticleDetails,
        Page::ResearchDetails,
        Page::TreatmentDetails,
    ];

    /// Context fields that must be populated before this page renders
    pub fn required_fields(&self) -> &'static [ContextField] {
        use ContextField as F;
        match self {
            Page::Home | Page::Marketplace | Page::Doctors | Page::Packages => &[],
            Page::HospitalPage | Page::Gallery | Page::Facilities | Page::HospitalInsights => &[F::Hospital],
            Page::FacilityDetails => &[F::Hospital, F::FacilityName],
            Page::SpecializationDetails => &[F::Hospital, F::SpecializationName],
            Page::TreatmentDetails => &[F::Hospital, F::SpecializationName, F::TreatmentName],
            Page::ArticleDetails => &[F::Hospital, F::ArticleTitle],
            Page::ResearchDetails => &[F::Hospital, F::ResearchTitle],
            Page::DoctorDetails => &[F::Doctor],
            Page::PackageDetails => &[F::Package],
        }
    }

    /// Pages nested under `/hospitals/{slug}`
    pub fn is_hospital_scoped(&self) -> bool {
        self.required_fields().contains(&ContextField::Hospital)
    }

    /// Safe page to show when this one cannot render
    pub fn fallback(&self) -> Page {
        if self.is_hospital_scoped() {
            Page::Marketplace
        } else {
            Page::Home
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Entities and names backing the active page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewContext {
    pub hospital: Option<Arc<Hospital>>,
    pub facility_name: Option<String>,
    pub doctor: Option<Arc<Doctor>>,
    pub package: Option<Arc<MedicalPackage>>,
    pub specialization_name: Option<String>,
    pub article_title: Option<String>,
    pub research_title: Option<String>,
    pub treatment_name: Option<String>,
}

impl ViewContext {
    pub fn has(&self, field: ContextField) -> bool {
        match field {
            ContextField::Hospital => self.hospital.is_some(),
            ContextField::FacilityName => self.facility_name.is_some(),
            ContextField::Doctor => self.doctor.is_some(),
            ContextField::Package => self.package.is_some(),
            ContextField::SpecializationName => self.specialization_name.is_some(),
            ContextField::ArticleTitle => self.article_title.is_some(),
            ContextField::ResearchTitle => self.research_title.is_some(),
            ContextField::TreatmentName => self.treatment_name.is_some(),
        }
    }

    pub fn missing_field(&self, page: Page) -> Option<ContextField> {
        page.required_fields().iter().copied().find(|field| !self.has(*field))
    }

    pub fn satisfies(&self, page: Page) -> bool {
        self.missing_field(page).is_none()
    }

    /// Guard check before rendering `page`
    pub fn guard(&self, page: Page) -> Result<()> {
        match self.missing_field(page) {
            Some(field) => Err(MeditripError::MissingViewContext {
                page: page.to_string(),
                field: field.as_str(),
            }),
            None => Ok(()),
        }
    }

    /// The page that actually renders: `page` if guarded fields are present, else its fallback
    pub fn renderable_page(&self, page: Page) -> Page {
        if self.satisfies(page) {
            page
        } else {
            page.fallback()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Create a summary of the context for logging and render output
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            hospital_id: self.hospital.as_ref().map(|h| h.id.clone()),
            hospital_name: self.hospital.as_ref().map(|h| h.name.clone()),
            facility_name: self.facility_name.clone(),
            doctor_id: self.doctor.as_ref().map(|d| d.id.clone()),
            doctor_name: self.doctor.as_ref().map(|d| d.name.clone()),
            package_id: self.package.as_ref().map(|p| p.id.clone()),
            package_name: self.package.as_ref().map(|p| p.name.clone()),
            specialization_name: self.specialization_name.clone(),
            article_title: self.article_title.clone(),
            research_title: self.research_title.clone(),
            treatment_name: self.treatment_name.clone(),
        }
    }
}

/// Context summary for logging and render output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_context_only_renders_list_pages() {
        let context = ViewContext::default();
        for page in Page::ALL {
            let renderable = context.satisfies(page);
            assert_eq!(renderable, page.required_fields().is_empty(), "{page}");
            assert!(context.satisfies(context.renderable_page(page)));
        }
    }

    #[test]
    fn test_guard_reports_first_missing_field() {
        let context = ViewContext {
            hospital: Some(Arc::new(Hospital::new("h1", "Sunway Medical"))),
            specialization_name: Some("Cardiology".to_string()),
            ..ViewContext::default()
        };

        assert!(context.guard(Page::SpecializationDetails).is_ok());
        assert_matches!(
            context.guard(Page::TreatmentDetails),
            Err(MeditripError::MissingViewContext { field: "treatment_name", .. })
        );
    }

    #[test]
    fn test_fallbacks() {
        let context = ViewContext::default();
        assert_eq!(context.renderable_page(Page::Gallery), Page::Marketplace);
        assert_eq!(context.renderable_page(Page::DoctorDetails), Page::Home);
        assert_eq!(context.renderable_page(Page::Packages), Page::Packages);
    }

    #[test]
    fn test_summary_skips_empty_fields() {
        let context = ViewContext {
            doctor: Some(Arc::new(Doctor::new("d1", "Dr. Aisha Rahman"))),
            ..ViewContext::default()
        };
        let value = serde_json::to_value(context.summary()).unwrap();
        assert_eq!(value, serde_json::json!({"doctorId": "d1", "doctorName": "Dr. Aisha Rahman"}));
    }
}
