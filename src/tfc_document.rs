//! JSON:API response envelope.
//!
//! The service answers with `{"data": ..., "included": [...]}`. Documents are
//! decoded verbatim: unknown members (`links`, `meta`) are kept in `extra`
//! so nothing the service sent is lost.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::tfc_error::{TfcError, TfcResult};

/// Response envelope with a top-level `data` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<D = Resource> {
    /// Primary data: one resource or a list of resources.
    pub data: D,
    /// Related resources sideloaded with `?include=`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<Resource>>,
    /// Any other top-level member (`links`, `meta`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document whose `data` is a single resource.
pub type ResourceDocument = Document<Resource>;

/// Document whose `data` is a list of resources.
pub type CollectionDocument = Document<Vec<Resource>>;

/// A single JSON:API resource object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque resource ID (e.g. `run-CZcmD7eagjhyX0vN`).
    pub id: String,
    /// Resource type (e.g. `runs`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Attribute name to value.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Relationship name to relationship object, as sent (absent, empty or filled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Map<String, Value>>,
    /// Any other member (`links`, `meta`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Raw attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// ID of a to-one relationship (`relationships.<name>.data.id`).
    #[must_use]
    pub fn related_id(&self, relationship: &str) -> Option<&str> {
        self.relationships
            .as_ref()?
            .get(relationship)?
            .get("data")?
            .get("id")?
            .as_str()
    }

    /// IDs of a to-many relationship (`relationships.<name>.data[].id`).
    #[must_use]
    pub fn related_ids(&self, relationship: &str) -> Vec<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.get(relationship))
            .and_then(|r| r.get("data"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("id").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Decode the attributes into a typed view.
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::UnexpectedShape`] if the attributes do not match `T`.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> TfcResult<T> {
        serde_json::from_value(Value::Object(self.attributes.clone())).map_err(|e| {
            TfcError::UnexpectedShape(format!("{} {}: {e}", self.kind, self.id))
        })
    }
}

impl CollectionDocument {
    /// IDs of every resource in `data`, in response order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.data.iter().map(|r| r.id.as_str()).collect()
    }

    /// Find a resource in `data` by ID.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Resource> {
        self.data.iter().find(|r| r.id == id)
    }

    /// Pagination block from `meta.pagination`, when the service sent one.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        let raw = self.extra.get("meta")?.get("pagination")?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// `meta.pagination` block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Pagination {
    /// Page returned.
    pub current_page: u32,
    /// Previous page, if any.
    #[serde(default)]
    pub prev_page: Option<u32>,
    /// Next page, if any.
    #[serde(default)]
    pub next_page: Option<u32>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of items across pages.
    #[serde(default)]
    pub total_count: u32,
}
