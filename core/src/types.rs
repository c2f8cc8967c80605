//! Domain types for the database client resource and its search requests.
//!
//! # Design
//! `ClientAttributes` types only the fields the adapter reads or stamps
//! (`client_id` and `meta`). Every other attribute the service returns is
//! kept verbatim in `attributes` and written back unchanged, so fields this
//! crate does not know about survive a get/update cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `meta.resourceType` stamped on every created or updated client.
pub const RESOURCE_TYPE: &str = "dbClient";

/// A database client record as stored by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientAttributes {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ClientAttributes {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            meta: None,
            attributes: Map::new(),
        }
    }

    /// Set an opaque attribute, returning the updated record.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn client_name(&self) -> Option<&str> {
        self.get("client_name").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.get("status").and_then(Value::as_str)
    }

    /// Tags attached to the client; non-string entries are ignored.
    pub fn tags(&self) -> Vec<&str> {
        self.get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A `meta` timestamp as the service sent it.
///
/// RFC 3339 strings decode to `Instant`; any other encoding is kept as
/// `Raw` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Instant(DateTime<Utc>),
    Raw(Value),
}

impl Timestamp {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Instant(instant) => Some(*instant),
            Timestamp::Raw(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::Instant(instant)
    }
}

/// Resource metadata. The adapter stamps `resourceType`, `created` and
/// `lastModified` on writes; other members (`version`, `location`, ...) are
/// carried in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    /// Metadata for a newly created client: both timestamps are `now`.
    pub fn for_create(now: DateTime<Utc>) -> Self {
        Self::default().stamp_create(now)
    }

    /// Metadata for an update: only the modification time is set.
    pub fn for_update(now: DateTime<Utc>) -> Self {
        Self::default().stamp_update(now)
    }

    /// Stamp creation over existing metadata, keeping `extra`.
    pub fn stamp_create(mut self, now: DateTime<Utc>) -> Self {
        self.resource_type = Some(RESOURCE_TYPE.to_string());
        self.created = Some(now.into());
        self.last_modified = Some(now.into());
        self
    }

    /// Stamp an update over existing metadata, keeping `extra`. `created`
    /// is cleared; the store owns it.
    pub fn stamp_update(mut self, now: DateTime<Utc>) -> Self {
        self.resource_type = Some(RESOURCE_TYPE.to_string());
        self.created = None;
        self.last_modified = Some(now.into());
        self
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.as_ref().and_then(Timestamp::instant)
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified.as_ref().and_then(Timestamp::instant)
    }
}

/// Optional filters for list and count requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub client_name_filter: Option<String>,
    pub search_terms_filter: Option<String>,
    /// Empty means no tag filter.
    pub tags_filter: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationSpec {
    pub count: Option<u64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    /// Tie-break field applied after `sort_by`.
    pub secondary_sort_by: Option<String>,
}

/// One page of results. `cursor` is the cursor the caller sent, echoed
/// back; continuation tokens are the service's business.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
}
