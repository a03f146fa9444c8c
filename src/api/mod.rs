//! REST access to the project-management backend.
//!
//! Everything goes through [`Backend::send`], which takes a path relative to
//! the configured base URL (`/projects`, `/projects/{id}/risks`, ...) and
//! returns the parsed JSON body.

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{RecordId, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        })
    }
}

/// Error type for backend requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{method} {path} failed: {message}")]
    Transport {
        method: Method,
        path: String,
        message: String,
    },
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

/// A JSON-over-HTTP backend.
pub trait Backend: Send + Sync {
    /// Issue one request and return the parsed response body (`null` when
    /// the body is empty).
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError>;
}

pub fn projects_path() -> String {
    "/projects".to_string()
}

pub fn resource_path(project_id: &RecordId, resource: Resource) -> String {
    format!("/projects/{}/{}", project_id, resource.segment())
}

/// Decode a response body into a typed value.
pub fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
