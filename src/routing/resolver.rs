//! Entity resolver
//!
//! Linear scans over the catalog comparing `slug::encode(name)` against a
//! path segment. Catalogs in this app hold tens of entries, so no index is kept.

use std::sync::Arc;

use tracing::debug;

use super::slug;
use crate::models::{Doctor, Hospital, MedicalPackage};
use crate::services::Catalog;
use crate::utils::errors::{EntityKind, MeditripError, Result};

pub fn resolve_hospital_by_slug(catalog: &dyn Catalog, hospital_slug: &str) -> Result<Arc<Hospital>> {
    find_by_slug(catalog.list_hospitals(), hospital_slug, |h| h.name.as_str())
        .ok_or_else(|| not_found(EntityKind::Hospital, hospital_slug))
}

pub fn resolve_doctor_by_slug(catalog: &dyn Catalog, doctor_slug: &str) -> Result<Arc<Doctor>> {
    find_by_slug(catalog.list_doctors(), doctor_slug, |d| d.name.as_str())
        .ok_or_else(|| not_found(EntityKind::Doctor, doctor_slug))
}

pub fn resolve_package_by_slug(catalog: &dyn Catalog, package_slug: &str) -> Result<Arc<MedicalPackage>> {
    find_by_slug(catalog.list_packages(), package_slug, |p| p.name.as_str())
        .ok_or_else(|| not_found(EntityKind::Package, package_slug))
}

fn find_by_slug<T>(entities: &[Arc<T>], wanted: &str, name: impl Fn(&T) -> &str) -> Option<Arc<T>> {
    entities
        .iter()
        .find(|entity| slug::encode(name(entity.as_ref())) == wanted)
        .cloned()
}

fn not_found(kind: EntityKind, wanted: &str) -> MeditripError {
    debug!(kind = %kind, slug = wanted, "No catalog entity matches slug");
    MeditripError::EntityNotFound {
        kind,
        slug: wanted.to_string(),
    }
}
