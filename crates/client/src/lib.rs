// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Submission client: posts JSON payloads to an attestation endpoint.

pub mod errors;

use reqwest::blocking::Client;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

pub use errors::{Result, SubmitError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Header that carries the key.
    pub auth_header: String,
    /// Prepended to the key. Empty sends the bare key.
    pub auth_prefix: String,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            auth_header: "Authorization".to_string(),
            auth_prefix: "Bearer ".to_string(),
        }
    }
}

impl SubmitConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_auth(mut self, header: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.auth_header = header.into();
        self.auth_prefix = prefix.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionClient {
    endpoint: String,
    auth: Option<(HeaderName, HeaderValue)>,
    client: Client,
}

impl SubmissionClient {
    pub fn new(config: SubmitConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(SubmitError::InvalidConfig("endpoint is empty".to_string()));
        }
        let auth = match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let name = HeaderName::from_bytes(config.auth_header.as_bytes()).map_err(|e| {
                    SubmitError::InvalidConfig(format!("auth header '{}': {}", config.auth_header, e))
                })?;
                let mut value = HeaderValue::from_str(&format!("{}{}", config.auth_prefix, key))
                    .map_err(|e| SubmitError::InvalidConfig(format!("auth value: {}", e)))?;
                value.set_sensitive(true);
                Some((name, value))
            }
            None => None,
        };
        Ok(Self {
            endpoint: config.endpoint,
            auth,
            client: Client::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs `payload` once and returns the response body as text.
    ///
    /// A non-success status prints the body to stderr and returns it inside
    /// [`SubmitError::Http`].
    pub fn submit<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String> {
        let body = serde_json::to_vec(payload)?;
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some((name, value)) = &self.auth {
            request = request.header(name.clone(), value.clone());
        }

        tracing::info!(endpoint = %self.endpoint, "Submitting payload");
        let resp = request.send()?;
        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            eprintln!("{}", text);
            tracing::warn!(status = status.as_u16(), "Submission rejected");
            return Err(SubmitError::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        tracing::info!(status = status.as_u16(), "Submission accepted");
        Ok(text)
    }
}
