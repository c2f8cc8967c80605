//! JSON encoding and decoding helpers.
//!
//! Thin wrappers over `serde_json` that map failures onto `ApiError` and
//! enforce the top-level shape (object vs. array) each endpoint returns.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Parse a body that must be a JSON object.
pub fn from_json(body: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Parse a body that must be a JSON array.
pub fn from_json_array(body: &str) -> Result<Vec<Value>> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
