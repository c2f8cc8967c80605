//! Data access for database clients stored behind a JSON web service.
//!
//! # Overview
//! Exposes get/create/update/delete/list/count for database client records
//! and translates each into one HTTP request against the remote service.
//! Responses are normalized into typed `ClientAttributes`, with the service's
//! "not found" body mapped to `None`.
//!
//! # Design
//! - `DatabaseClientApi` builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - `DatabaseClientAdapter` runs each operation as one round trip through a
//!   `Transport`. It holds no mutable state and is safe to share.
//! - `build_query_params` turns optional filter, pagination and sort requests
//!   into the minimal query the list endpoint expects.
//! - `UreqTransport` (feature `ureq`, on by default) is a ready-made blocking
//!   transport; anything implementing `Transport` can replace it.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod query;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use adapter::DatabaseClientAdapter;
pub use client::{is_not_found_sentinel, DatabaseClientApi};
pub use config::{AdapterConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use query::{build_query_params, QueryParams};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    ClientAttributes, FilterSpec, Meta, PaginatedResult, PaginationSpec, SortOrder, SortSpec,
    Timestamp,
};
