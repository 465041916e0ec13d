//! Marketplace filter model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

const SEARCH_QUERY: &str = "searchQuery";
const USER_ORIGIN: &str = "userOrigin";
const USER_LOCATION: &str = "userLocation";
const AI_LIST_NAME: &str = "aiListName";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Active marketplace search criteria
///
/// Marketplace-specific fields that the navigation core does not interpret
/// (country, budget, specialty, ...) are carried in `extra` and flattened
/// into the same JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub search_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_list_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial filter update; only populated fields are merged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_list_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FilterState {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..Self::default()
        }
    }

    /// Shallow merge: each populated field of `update` replaces ours
    ///
    /// Extra keys naming a typed field are merged into that field so the
    /// flattened JSON never carries the same key twice.
    pub fn merge(&mut self, update: &FilterUpdate) {
        if update.extra.keys().any(|key| is_typed_key(key)) {
            self.merge(&update.clone().normalized());
            return;
        }

        if let Some(query) = &update.search_query {
            self.search_query = query.clone();
        }
        if let Some(origin) = &update.user_origin {
            self.user_origin = Some(origin.clone());
        }
        if let Some(location) = update.user_location {
            self.user_location = Some(location);
        }
        if let Some(name) = &update.ai_list_name {
            self.ai_list_name = Some(name.clone());
        }
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl FilterUpdate {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Set a field by its JSON name; typed fields are routed to their slot
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key.into(), value.into());
        self
    }

    /// Move extra keys that name a typed field into that field
    pub fn normalized(mut self) -> Self {
        let extra = std::mem::take(&mut self.extra);
        for (key, value) in extra {
            self.set_field(key, value);
        }
        self
    }

    fn set_field(&mut self, key: String, value: Value) {
        match key.as_str() {
            SEARCH_QUERY => self.search_query = Some(text_value(value)),
            USER_ORIGIN => self.user_origin = Some(text_value(value)),
            AI_LIST_NAME => self.ai_list_name = Some(text_value(value)),
            USER_LOCATION => match serde_json::from_value::<GeoPoint>(value) {
                Ok(point) => self.user_location = Some(point),
                Err(e) => warn!(error = %e, "Ignoring malformed userLocation filter"),
            },
            _ => {
                self.extra.insert(key, value);
            }
        }
    }

    pub fn with_list_name(mut self, name: impl Into<String>) -> Self {
        self.ai_list_name = Some(name.into());
        self
    }
}

fn is_typed_key(key: &str) -> bool {
    matches!(key, SEARCH_QUERY | USER_ORIGIN | USER_LOCATION | AI_LIST_NAME)
}

fn text_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
