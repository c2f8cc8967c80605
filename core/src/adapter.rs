//! Database client data access over a `Transport`.
//!
//! # Design
//! Each operation is exactly one round trip: build the request with
//! `DatabaseClientApi`, execute it, parse the response. The adapter keeps no
//! per-call state, so a single instance can be shared across threads as long
//! as the transport can. Failures are returned as-is; there is no retry.
//!
//! `profile_id` is accepted on every operation for callers that scope
//! clients by profile. It is recorded in logs only and never sent.

use chrono::Utc;
use tracing::{debug, warn};

use crate::client::DatabaseClientApi;
use crate::config::{AdapterConfig, ConfigError};
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{ClientAttributes, FilterSpec, PaginatedResult, PaginationSpec, SortSpec};

pub struct DatabaseClientAdapter<T> {
    api: DatabaseClientApi,
    transport: T,
}

impl<T: Transport> DatabaseClientAdapter<T> {
    /// Fails if `config` does not validate.
    pub fn new(config: &AdapterConfig, transport: T) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            api: DatabaseClientApi::new(config)?,
            transport,
        })
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self.transport.execute(request)?;
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            status = response.status,
            body = %response.body,
            "received database client response"
        );
        Ok(response)
    }

    /// Fetch one client; `Ok(None)` if the service does not know it.
    pub fn get_by_id(&self, client_id: &str, profile_id: &str) -> Result<Option<ClientAttributes>> {
        debug!(client_id, profile_id, "getting database client");
        let response = self.send(&self.api.build_get(client_id))?;
        self.api.parse_get(response)
    }

    pub fn create(&self, attributes: &ClientAttributes, profile_id: &str) -> Result<ClientAttributes> {
        debug!(client_id = %attributes.client_id, profile_id, "creating database client");
        let request = self.api.build_create(attributes, Utc::now())?;
        let response = self.send(&request)?;
        self.api.parse_create(response)
    }

    pub fn update(&self, attributes: &ClientAttributes, profile_id: &str) -> Result<ClientAttributes> {
        debug!(client_id = %attributes.client_id, profile_id, "updating database client");
        let request = self.api.build_update(attributes, Utc::now())?;
        let response = self.send(&request)?;
        self.api.parse_update(response)
    }

    /// `Ok(false)` when the service answers with a non-2xx status; only a
    /// failed round trip is an error.
    pub fn delete(&self, client_id: &str, profile_id: &str) -> Result<bool> {
        debug!(client_id, profile_id, "deleting database client");
        let response = self.send(&self.api.build_delete(client_id))?;
        let deleted = self.api.parse_delete(&response);
        if !deleted {
            warn!(client_id, status = response.status, "database client was not deleted");
        }
        Ok(deleted)
    }

    pub fn list_by(
        &self,
        profile_id: &str,
        filters: Option<&FilterSpec>,
        pagination: Option<&PaginationSpec>,
        sort: Option<&SortSpec>,
        active_only: bool,
    ) -> Result<PaginatedResult<ClientAttributes>> {
        let request = self.api.build_list(filters, pagination, sort, active_only);
        debug!(profile_id, active_only, query = ?request.query, "listing database clients");
        let response = self.send(&request)?;
        self.api.parse_list(response, pagination)
    }

    /// Number of clients matching `filters`, counted from the full listing.
    pub fn count_by(
        &self,
        profile_id: &str,
        filters: Option<&FilterSpec>,
        active_only: bool,
    ) -> Result<u64> {
        let request = self.api.build_count(filters, active_only);
        debug!(profile_id, active_only, query = ?request.query, "counting database clients");
        let response = self.send(&request)?;
        self.api.parse_count(response)
    }
}
