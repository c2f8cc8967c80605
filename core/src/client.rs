//! Stateless HTTP request builder and response parser for the database
//! client endpoint.
//!
//! # Design
//! `DatabaseClientApi` holds only the endpoint path and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `DatabaseClientAdapter` joins the two halves through a
//! `Transport`; hosts that do their own I/O can call them directly.
//!
//! The service reports a missing client on `GET /{id}` with a body of
//! `{"status":"404"}` rather than the client shape. `is_not_found_sentinel`
//! is the only place that knows this.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};

use crate::config::{AdapterConfig, ConfigError};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::json;
use crate::query::{build_query_params, QueryParams};
use crate::types::{ClientAttributes, FilterSpec, PaginatedResult, PaginationSpec, SortSpec};

const APPLICATION_JSON: &str = "application/json";

/// Bytes escaped when a client id becomes one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless request builder for the database client endpoint.
#[derive(Debug, Clone)]
pub struct DatabaseClientApi {
    base_path: String,
}

impl DatabaseClientApi {
    /// Validates `config` before taking its path.
    pub fn new(config: &AdapterConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_path(&config.url_path))
    }

    pub fn with_path(url_path: &str) -> Self {
        Self {
            base_path: url_path.trim_end_matches('/').to_string(),
        }
    }

    fn collection_path(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_string()
        } else {
            self.base_path.clone()
        }
    }

    fn item_path(&self, client_id: &str) -> String {
        format!(
            "{}/{}",
            self.base_path,
            utf8_percent_encode(client_id, PATH_SEGMENT)
        )
    }

    fn request(
        &self,
        method: HttpMethod,
        path: String,
        body: Option<String>,
        query: QueryParams,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path,
            query,
            headers: vec![
                ("accept".to_string(), APPLICATION_JSON.to_string()),
                ("content-type".to_string(), APPLICATION_JSON.to_string()),
            ],
            body,
        }
    }

    pub fn build_get(&self, client_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_path(client_id), None, QueryParams::new())
    }

    /// POST the client with both timestamps set to `now`. Other `meta`
    /// members the caller supplied are sent unchanged.
    pub fn build_create(&self, attributes: &ClientAttributes, now: DateTime<Utc>) -> Result<HttpRequest> {
        let meta = attributes.meta.clone().unwrap_or_default().stamp_create(now);
        let stamped = attributes.clone().with_meta(meta);
        let body = json::to_json(&stamped)?;
        Ok(self.request(HttpMethod::Post, self.collection_path(), Some(body), QueryParams::new()))
    }

    /// PUT the client with metadata carrying only the modification time.
    pub fn build_update(&self, attributes: &ClientAttributes, now: DateTime<Utc>) -> Result<HttpRequest> {
        let meta = attributes.meta.clone().unwrap_or_default().stamp_update(now);
        let stamped = attributes.clone().with_meta(meta);
        let body = json::to_json(&stamped)?;
        Ok(self.request(HttpMethod::Put, self.collection_path(), Some(body), QueryParams::new()))
    }

    pub fn build_delete(&self, client_id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_path(client_id), None, QueryParams::new())
    }

    pub fn build_list(
        &self,
        filters: Option<&FilterSpec>,
        pagination: Option<&PaginationSpec>,
        sort: Option<&SortSpec>,
        active_only: bool,
    ) -> HttpRequest {
        let query = build_query_params(filters, pagination, sort, active_only);
        self.request(HttpMethod::Get, self.collection_path(), None, query)
    }

    /// There is no count endpoint; this is the list request without paging
    /// or sorting.
    pub fn build_count(&self, filters: Option<&FilterSpec>, active_only: bool) -> HttpRequest {
        self.build_list(filters, None, None, active_only)
    }

    /// `Ok(None)` when the service answers with the not-found sentinel.
    pub fn parse_get(&self, response: HttpResponse) -> Result<Option<ClientAttributes>> {
        let object = match json::from_json(&response.body) {
            Ok(object) => object,
            Err(err) => {
                check_success(&response)?;
                return Err(err);
            }
        };
        if is_not_found_sentinel(&object) {
            return Ok(None);
        }
        check_success(&response)?;
        json::decode(Value::Object(object)).map(Some)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<ClientAttributes> {
        parse_client(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<ClientAttributes> {
        parse_client(response)
    }

    /// True iff the service acknowledged the delete with a 2xx status.
    pub fn parse_delete(&self, response: &HttpResponse) -> bool {
        response.is_success()
    }

    pub fn parse_list(
        &self,
        response: HttpResponse,
        pagination: Option<&PaginationSpec>,
    ) -> Result<PaginatedResult<ClientAttributes>> {
        check_success(&response)?;
        let items = json::from_json_array(&response.body)?
            .into_iter()
            .map(json::decode)
            .collect::<Result<Vec<ClientAttributes>>>()?;
        Ok(PaginatedResult {
            items,
            cursor: pagination.and_then(|p| p.cursor.clone()),
        })
    }

    pub fn parse_count(&self, response: HttpResponse) -> Result<u64> {
        check_success(&response)?;
        Ok(json::from_json_array(&response.body)?.len() as u64)
    }
}

/// True when a parsed body is the service's "not found" marker:
/// a `status` member holding the string `"404"`.
pub fn is_not_found_sentinel(body: &Map<String, Value>) -> bool {
    body.get("status").and_then(Value::as_str) == Some("404")
}

fn parse_client(response: HttpResponse) -> Result<ClientAttributes> {
    check_success(&response)?;
    let object = json::from_json(&response.body)?;
    json::decode(Value::Object(object))
}

/// Map non-success status codes to `ApiError::HttpError`.
fn check_success(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
