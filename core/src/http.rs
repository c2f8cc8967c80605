//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `DatabaseClientApi` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a `Transport` implementation performs the actual round trip.
//! Paths are relative to the service root, the transport decides the host.
//!
//! All fields use owned types so values can be recorded, replayed and
//! compared in tests without lifetime concerns.

use std::sync::Arc;

use crate::error::ApiError;
use crate::query::QueryParams;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `DatabaseClientApi::build_*` methods and handed to a
/// `Transport` for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// that prevent a response from being received are `Err`. Timeouts and
/// cancellation are the implementation's concern.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}
