//! Transport error handling
//!
//! Every failure of a remote call is a `TransportError`. Validation
//! rejections from the backend are plain 4xx `Status` errors.

use thiserror::Error;

/// Errors that can occur while talking to the archive backend
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, TLS or I/O failure before a response arrived
    #[error("Request {method} {url} failed: {source}")]
    Network {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{method} {url} returned HTTP {status}{}", body_suffix(.body))]
    Status {
        method: String,
        url: String,
        status: u16,
        body: Option<String>,
    },

    /// The response body could not be decoded
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A request URL could not be built from the configured base URL
    #[error("Invalid base URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    /// The HTTP client itself could not be constructed
    #[error("Failed to initialize HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// HTTP status code, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network { source, .. } | TransportError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            TransportError::InvalidUrl { .. } | TransportError::Client(_) => None,
        }
    }

    /// Response body detail, when the backend sent one
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Check if the target record does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the backend rejected the request payload (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(": {}", body),
        None => String::new(),
    }
}
