//! Shared HTTP plumbing for every Terraform Cloud endpoint wrapper.
//!
//! Unique responsibility: turn a URL (plus an optional JSON:API payload) into
//! one HTTP call and decode the response envelope.
//!
//! - Header: `Authorization: Bearer <token>`
//! - Header: `Content-Type: application/vnd.api+json` (requests with a body)
//!
//! Wrappers build the exact documented URL and pick the verb; this module
//! never reshapes what the service returns.

use std::sync::Arc;

use reqwest::{Method, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::tfc_config::TfcConfig;
use crate::tfc_document::{CollectionDocument, ResourceDocument};
use crate::tfc_error::{TfcError, TfcResult};

/// Media type used by the Terraform Cloud API for request bodies.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Something every endpoint wrapper can report about itself.
pub trait Endpoint {
    /// Organization entitlements the endpoint needs. Empty when it is available
    /// on every plan.
    fn required_entitlements(&self) -> &'static [&'static str];
}

/// `page[number]` / `page[size]` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    /// Page to return.
    pub number: Option<u32>,
    /// Items per page.
    pub size: Option<u32>,
}

impl PageParams {
    /// Request a given page with a given size.
    #[must_use]
    pub const fn new(number: u32, size: u32) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
        }
    }

    /// Query pairs for the parameters that are set.
    #[must_use]
    pub fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if let Some(n) = self.number {
            query.push(("page[number]", n.to_string()));
        }
        if let Some(s) = self.size {
            query.push(("page[size]", s.to_string()));
        }
        query
    }
}

/// Base for endpoint wrappers: configuration plus the shared HTTP client.
#[derive(Clone)]
pub struct TfcEndpoint {
    cfg: Arc<TfcConfig>,
    http: reqwest::Client,
}

impl TfcEndpoint {
    /// Create an endpoint base with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(cfg: Arc<TfcConfig>) -> TfcResult<Self> {
        let http = build_http_client(&cfg)?;
        Ok(Self::with_http(cfg, http))
    }

    /// Create an endpoint base sharing an existing HTTP client.
    #[must_use]
    pub const fn with_http(cfg: Arc<TfcConfig>, http: reqwest::Client) -> Self {
        Self { cfg, http }
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub fn config(&self) -> &TfcConfig {
        &self.cfg
    }

    /// Absolute URL for an API path such as `/runs/run-123`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.cfg.api_url())
    }

    /// `POST` a payload to a collection URL and return the created resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers non-2xx, or the
    /// body is not a resource document.
    pub async fn create<P: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let body = encode(payload)?;
        let text = self.send(Method::POST, url, Some(body)).await?;
        decode(text)
    }

    /// `GET` a collection URL with optional query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers non-2xx, or the
    /// body is not a collection document.
    pub async fn list(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> TfcResult<CollectionDocument> {
        let url = with_query(url, query)?;
        let text = self.send(Method::GET, &url, None).await?;
        decode(text)
    }

    /// `GET` a single resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers non-2xx, or the
    /// body is not a resource document.
    pub async fn show(&self, url: &str) -> TfcResult<ResourceDocument> {
        let text = self.send(Method::GET, url, None).await?;
        decode(text)
    }

    /// `PATCH` a resource with a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers non-2xx, or the
    /// body is not a resource document.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let body = encode(payload)?;
        let text = self.send(Method::PATCH, url, Some(body)).await?;
        decode(text)
    }

    /// `DELETE` a resource. The service usually answers `204 No Content`, in
    /// which case `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn destroy(&self, url: &str) -> TfcResult<Option<ResourceDocument>> {
        let text = self.send(Method::DELETE, url, None).await?;
        decode_optional(text)
    }

    /// `POST` to an action URL (`.../actions/<name>`), optionally with a payload.
    ///
    /// Actions such as `apply` answer `202 Accepted` with an empty body, which
    /// yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn post(
        &self,
        url: &str,
        payload: Option<&Value>,
    ) -> TfcResult<Option<ResourceDocument>> {
        let body = payload.map(encode).transpose()?;
        let text = self.send(Method::POST, url, body).await?;
        decode_optional(text)
    }

    /// Perform one request and return the raw response body of a 2xx answer.
    async fn send(&self, method: Method, url: &str, body: Option<Vec<u8>>) -> TfcResult<String> {
        debug!(%method, url, "tfc request");

        let mut req = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&self.cfg.token)
            .header(header::ACCEPT, JSON_API_CONTENT_TYPE);

        if let Some(body) = body {
            req = req
                .header(header::CONTENT_TYPE, JSON_API_CONTENT_TYPE)
                .body(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            warn!(%method, url, %status, "tfc request failed");
            return Err(TfcError::Api { status, body: text });
        }

        debug!(%method, url, %status, "tfc response");
        Ok(text)
    }
}

/// Build the HTTP client every wrapper of a [`crate::Tfc`] shares.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_http_client(cfg: &TfcConfig) -> TfcResult<reqwest::Client> {
    let http = reqwest::Client::builder()
        .timeout(cfg.timeout())
        .user_agent(cfg.user_agent.clone())
        .danger_accept_invalid_certs(!cfg.verify)
        .build()?;
    Ok(http)
}

fn encode<P: Serialize + ?Sized>(payload: &P) -> TfcResult<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|source| TfcError::Json {
        source,
        body: String::new(),
    })
}

fn decode<T: DeserializeOwned>(body: String) -> TfcResult<T> {
    match serde_json::from_str(&body) {
        Ok(v) => Ok(v),
        Err(source) => Err(TfcError::Json { source, body }),
    }
}

fn decode_optional<T: DeserializeOwned>(body: String) -> TfcResult<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    decode(body).map(Some)
}

fn with_query(url: &str, query: &[(&str, String)]) -> TfcResult<String> {
    if query.is_empty() {
        return Ok(url.to_string());
    }
    let mut parsed = url::Url::parse(url).map_err(|source| TfcError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    parsed
        .query_pairs_mut()
        .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    Ok(parsed.into())
}
