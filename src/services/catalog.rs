//! In-memory catalog of hospitals, doctors and packages
//!
//! The navigation core never owns catalog entities; it holds shared handles
//! to whatever the catalog hands out.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::models::{Doctor, Hospital, MedicalPackage};
use crate::utils::errors::Result;

/// Read-only catalog collaborator
pub trait Catalog {
    fn list_hospitals(&self) -> &[Arc<Hospital>];
    fn list_doctors(&self) -> &[Arc<Doctor>];
    fn list_packages(&self) -> &[Arc<MedicalPackage>];
}

/// Catalog backed by vectors loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    hospitals: Vec<Arc<Hospital>>,
    doctors: Vec<Arc<Doctor>>,
    packages: Vec<Arc<MedicalPackage>>,
}

/// On-disk catalog document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogDocument {
    hospitals: Vec<Hospital>,
    doctors: Vec<Doctor>,
    packages: Vec<MedicalPackage>,
}

impl InMemoryCatalog {
    pub fn new(hospitals: Vec<Hospital>, doctors: Vec<Doctor>, packages: Vec<MedicalPackage>) -> Self {
        Self {
            hospitals: hospitals.into_iter().map(Arc::new).collect(),
            doctors: doctors.into_iter().map(Arc::new).collect(),
            packages: packages.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parse a catalog from a JSON document with `hospitals`, `doctors` and `packages` arrays
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        debug!(
            hospitals = document.hospitals.len(),
            doctors = document.doctors.len(),
            packages = document.packages.len(),
            "Catalog document parsed"
        );
        Ok(Self::new(document.hospitals, document.doctors, document.packages))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!("Loaded catalog from {}", path.display());
        Ok(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty() && self.doctors.is_empty() && self.packages.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn list_hospitals(&self) -> &[Arc<Hospital>] {
        &self.hospitals
    }

    fn list_doctors(&self) -> &[Arc<Doctor>] {
        &self.doctors
    }

    fn list_packages(&self) -> &[Arc<MedicalPackage>] {
        &self.packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str() {
        let raw = r#"{
            "hospitals": [{"id": "h1", "name": "Sunway Medical", "facilities": ["Cardiac ICU"]}],
            "doctors": [{"id": "d1", "name": "Dr. Tan Wei Ming", "specialty": "Cardiology"}]
        }"#;

        let catalog = InMemoryCatalog::from_json_str(raw).unwrap();
        assert_eq!(catalog.list_hospitals().len(), 1);
        assert_eq!(catalog.list_hospitals()[0].facilities, vec!["Cardiac ICU".to_string()]);
        assert_eq!(catalog.list_doctors()[0].specialty.as_deref(), Some("Cardiology"));
        assert!(catalog.list_packages().is_empty());
    }

    #[test]
    fn test_rejects_malformed_document() {
        assert!(InMemoryCatalog::from_json_str("{\"hospitals\": 3}").is_err());
    }
}
