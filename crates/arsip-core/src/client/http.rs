//! HTTP implementation of the archive client
//!
//! Maps the four logical operations onto the REST surface:
//!
//! | Operation | Method | Path           |
//! |-----------|--------|----------------|
//! | list      | GET    | `/arsip/`      |
//! | create    | POST   | `/arsip/`      |
//! | update    | PUT    | `/arsip/{id}/` |
//! | delete    | DELETE | `/arsip/{id}/` |

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ArchiveApi, ListQuery, TransportError};
use crate::config::Config;
use crate::models::{ArchiveId, ArchiveInput, ArchiveRecord};

/// Resource collection path, relative to the base URL
const COLLECTION_PATH: &str = "arsip/";

/// User agent sent with every request
const USER_AGENT: &str = concat!("arsip/", env!("CARGO_PKG_VERSION"));

/// Archive client backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpArchiveClient {
    http: Client,
    collection_url: Url,
}

impl HttpArchiveClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8000/api`)
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(TransportError::Client)?;
        Self::with_client(http, base_url)
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        let collection_url = collection_url(base_url)?;
        Ok(Self {
            http,
            collection_url,
        })
    }

    /// URL of the record collection (`{base}/arsip/`)
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// URL of a single record (`{base}/arsip/{id}/`)
    pub fn record_url(&self, id: ArchiveId) -> Result<Url, TransportError> {
        self.collection_url
            .join(&format!("{}/", id))
            .map_err(|e| TransportError::InvalidUrl {
                url: self.collection_url.to_string(),
                details: e.to_string(),
            })
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Result<Response, TransportError> {
        debug!("{} {}", method, url);
        let request = build(self.http.request(method.clone(), url.clone()));

        let response = request.send().await.map_err(|source| {
            warn!("{} {} failed: {}", method, url, source);
            TransportError::Network {
                method: method.to_string(),
                url: url.to_string(),
                source,
            }
        })?;

        check_status(method, url, response).await
    }
}

impl ArchiveApi for HttpArchiveClient {
    async fn list_all(&self, query: &ListQuery) -> Result<Vec<ArchiveRecord>, TransportError> {
        let url = self.collection_url.clone();
        let response = self
            .send(Method::GET, url, |req| {
                if query.is_empty() {
                    req
                } else {
                    req.query(query.params())
                }
            })
            .await?;
        decode(response).await
    }

    async fn create(&self, input: &ArchiveInput) -> Result<ArchiveRecord, TransportError> {
        let url = self.collection_url.clone();
        let response = self.send(Method::POST, url, |req| req.json(input)).await?;
        decode(response).await
    }

    async fn update(
        &self,
        id: ArchiveId,
        input: &ArchiveInput,
    ) -> Result<ArchiveRecord, TransportError> {
        let url = self.record_url(id)?;
        let response = self.send(Method::PUT, url, |req| req.json(input)).await?;
        decode(response).await
    }

    async fn delete(&self, id: ArchiveId) -> Result<(), TransportError> {
        let url = self.record_url(id)?;
        self.send(Method::DELETE, url, |req| req).await?;
        Ok(())
    }
}

/// Build the collection URL, tolerating a base with or without a trailing slash
fn collection_url(base_url: &str) -> Result<Url, TransportError> {
    let invalid = |details: String| TransportError::InvalidUrl {
        url: base_url.to_string(),
        details,
    };

    let mut base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(COLLECTION_PATH).map_err(|e| invalid(e.to_string()))
}

/// Turn non-2xx responses into `TransportError::Status`, keeping the body
async fn check_status(method: Method, url: Url, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .ok()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    warn!("{} {} returned {}", method, url, status);
    Err(TransportError::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let url = response.url().to_string();
    response
        .json()
        .await
        .map_err(|source| TransportError::Decode { url, source })
}
