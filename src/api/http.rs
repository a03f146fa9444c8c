use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;

use super::{ApiError, Backend, Method};

/// [`Backend`] over HTTP using a blocking reqwest client.
///
/// The client is cheap to clone and safe to share across the dispatcher's
/// worker threads.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a backend for `base_url`. A `timeout` of `None` waits forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                method: Method::Get,
                path: base_url.to_string(),
                message: format!("could not build HTTP client: {e}"),
            })?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = self.url(path);
        let transport = |e: reqwest::Error| ApiError::Transport {
            method,
            path: path.to_string(),
            message: e.to_string(),
        };

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("http {} {}", method, url);
        let response = request.send().map_err(transport)?;
        let status = response.status();
        let text = response.text().map_err(transport)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
