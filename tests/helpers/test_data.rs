//! Test data helpers for building catalogs

use meditrip::models::{Doctor, Hospital, MedicalPackage, Specialization};
use meditrip::InMemoryCatalog;

/// Hospital with no listed facilities, so facility names are decoded from slugs
pub fn sunway_medical() -> Hospital {
    let mut hospital = Hospital::new("h-sunway", "Sunway Medical");
    hospital.location = Some("Kuala Lumpur".to_string());
    hospital.specializations.push(Specialization {
        name: "Oncology".to_string(),
        treatments: Vec::new(),
    });
    hospital
}

/// Hospital with canonical names listed for its sub-pages
pub fn gleneagles_penang() -> Hospital {
    let mut hospital = Hospital::new("h-gleneagles", "Gleneagles Penang");
    hospital.location = Some("George Town".to_string());
    hospital.facilities = vec!["MRI (3T) Suite".to_string(), "Hybrid OR".to_string()];
    hospital.articles = vec!["What to Expect After TAVI".to_string()];
    hospital.research = vec!["CAR-T Outcomes 2024".to_string()];
    hospital.specializations = vec![Specialization {
        name: "Cardiology".to_string(),
        treatments: vec!["TAVI / TAVR".to_string(), "Coronary Bypass".to_string()],
    }];
    hospital
}

pub fn test_doctor() -> Doctor {
    let mut doctor = Doctor::new("d-rahman", "Dr. Aisha Rahman");
    doctor.specialty = Some("Cardiology".to_string());
    doctor.hospital_id = Some("h-gleneagles".to_string());
    doctor
}

pub fn test_package() -> MedicalPackage {
    let mut package = MedicalPackage::new("p-heart", "Executive Heart Screening");
    package.hospital_id = Some("h-sunway".to_string());
    package.price = Some(1450.0);
    package.currency = Some("MYR".to_string());
    package
}

/// Standard catalog used across integration tests
pub fn test_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(
        vec![sunway_medical(), gleneagles_penang()],
        vec![test_doctor(), Doctor::new("d-tan", "Dr. Tan Wei Ming")],
        vec![test_package(), MedicalPackage::new("p-ivf", "IVF Starter Cycle")],
    )
}

/// Catalog document in the on-disk JSON layout
pub fn test_catalog_json() -> &'static str {
    r#"{
        "hospitals": [
            { "id": "h-sunway", "name": "Sunway Medical", "location": "Kuala Lumpur",
              "specializations": [ { "name": "Oncology" } ] }
        ],
        "doctors": [ { "id": "d-rahman", "name": "Dr. Aisha Rahman" } ],
        "packages": [ { "id": "p-heart", "name": "Executive Heart Screening", "price": 1450.0 } ]
    }"#
}
