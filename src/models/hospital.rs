//! Hospital model

use serde::{Deserialize, Serialize};

use crate::routing::slug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(default)]
    pub research: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialization {
    pub name: String,
    #[serde(default)]
    pub treatments: Vec<String>,
}

impl Hospital {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: None,
            specializations: Vec::new(),
            facilities: Vec::new(),
            articles: Vec::new(),
            research: Vec::new(),
        }
    }

    pub fn slug(&self) -> String {
        slug::encode(&self.name)
    }

    /// Listed facility whose slug matches, if any
    pub fn facility_by_slug(&self, facility_slug: &str) -> Option<&str> {
        find_by_slug(&self.facilities, facility_slug)
    }

    pub fn specialization_by_slug(&self, specialization_slug: &str) -> Option<&Specialization> {
        self.specializations
            .iter()
            .find(|s| slug::encode(&s.name) == specialization_slug)
    }

    pub fn article_by_slug(&self, article_slug: &str) -> Option<&str> {
        find_by_slug(&self.articles, article_slug)
    }

    pub fn research_by_slug(&self, research_slug: &str) -> Option<&str> {
        find_by_slug(&self.research, research_slug)
    }
}

impl Specialization {
    pub fn treatment_by_slug(&self, treatment_slug: &str) -> Option<&str> {
        find_by_slug(&self.treatments, treatment_slug)
    }
}

fn find_by_slug<'a>(names: &'a [String], wanted: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|name| slug::encode(name) == wanted)
        .map(String::as_str)
}
