//! Query-parameter assembly for the list and count endpoints.
//!
//! # Design
//! Every potential parameter is an `Option`; `QueryParams::with` and
//! `QueryParams::with_all` skip absent and empty values, so the builder is a
//! single chain of `(key, value)` pairs. A key never appears with an empty
//! value list.
//!
//! `activeClientsOnly` is emitted whenever a filter is supplied, including
//! when the flag is `false`, and never without one. The remote service sees
//! exactly this shape, so it is kept as is.

use std::collections::BTreeMap;

use crate::types::{FilterSpec, PaginationSpec, SortSpec};

pub const ACTIVE_CLIENTS_ONLY: &str = "activeClientsOnly";
pub const CLIENT_NAME_FILTER: &str = "client_name_filter";
pub const SEARCH_TERMS_FILTER: &str = "search_terms_filter";
pub const TAGS_FILTER: &str = "tags_filter";
pub const COUNT: &str = "count";
pub const CURSOR: &str = "cursor";
pub const SORT_BY: &str = "sort_by";
pub const SORT_ORDER: &str = "sort_order";
pub const SECONDARY_SORT_BY: &str = "secondary_sort_by";

/// Multi-valued query parameters. Keys iterate in sorted order; values keep
/// the order they were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` with a single value, unless the value is absent or empty.
    pub fn with<V: AsRef<str>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.as_ref();
            if !value.is_empty() {
                self.0.insert(key.to_string(), vec![value.to_string()]);
            }
        }
        self
    }

    /// Add `key` with every value in `values`, unless there are none.
    pub fn with_all<V: AsRef<str>>(mut self, key: &str, values: &[V]) -> Self {
        if !values.is_empty() {
            self.0.insert(
                key.to_string(),
                values.iter().map(|v| v.as_ref().to_string()).collect(),
            );
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flatten into one `(key, value)` pair per value, as sent on the wire.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

/// Build the query for a list or count request.
pub fn build_query_params(
    filters: Option<&FilterSpec>,
    pagination: Option<&PaginationSpec>,
    sort: Option<&SortSpec>,
    active_only: bool,
) -> QueryParams {
    let mut params = QueryParams::new();

    if let Some(filters) = filters {
        params = params
            .with(ACTIVE_CLIENTS_ONLY, Some(active_only.to_string()))
            .with(CLIENT_NAME_FILTER, filters.client_name_filter.as_deref())
            .with(SEARCH_TERMS_FILTER, filters.search_terms_filter.as_deref())
            .with_all(TAGS_FILTER, &filters.tags_filter);
    }

    if let Some(pagination) = pagination {
        params = params
            .with(COUNT, pagination.count.map(|c| c.to_string()))
            .with(CURSOR, pagination.cursor.as_deref());
    }

    if let Some(sort) = sort {
        params = params
            .with(SORT_BY, sort.sort_by.as_deref())
            .with(SORT_ORDER, Some(sort.sort_order.as_str()))
            .with(SECONDARY_SORT_BY, sort.secondary_sort_by.as_deref());
    }

    params
}
