//! Terraform Cloud OAuth clients.
//!
//! An OAuth client links an organization to a VCS provider. Creating one also
//! creates an OAuth token, referenced from `relationships.oauth-tokens`, which
//! workspaces use to reach their repository.
//!
//! API endpoints:
//! - POST   /organizations/:org/oauth-clients
//! - GET    /organizations/:org/oauth-clients
//! - GET    /oauth-clients/:oauth_client_id
//! - DELETE /oauth-clients/:oauth_client_id

use serde::Serialize;
use serde_json::{Value, json};

use crate::tfc_document::{CollectionDocument, ResourceDocument};
use crate::tfc_endpoint::{Endpoint, TfcEndpoint};
use crate::tfc_error::TfcResult;

/// Wrapper for the OAuth client endpoints.
#[derive(Clone)]
pub struct TfcOAuthClients {
    endpoint: TfcEndpoint,
    base_url: String,
}

impl TfcOAuthClients {
    /// Bind the wrapper to an endpoint base.
    #[must_use]
    pub fn new(endpoint: TfcEndpoint) -> Self {
        let base_url = endpoint.url("/oauth-clients");
        Self { endpoint, base_url }
    }

    fn org_url(&self) -> TfcResult<String> {
        let org = self.endpoint.config().org()?;
        Ok(self.endpoint.url(&format!("/organizations/{org}/oauth-clients")))
    }

    /// `POST /organizations/:org/oauth-clients`
    ///
    /// # Errors
    ///
    /// Returns an error if no organization is configured, the request fails,
    /// or the API rejects the payload.
    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> TfcResult<ResourceDocument> {
        let url = self.org_url()?;
        self.endpoint.create(&url, payload).await
    }

    /// `GET /organizations/:org/oauth-clients`
    ///
    /// # Errors
    ///
    /// Returns an error if no organization is configured or the request fails.
    pub async fn list(&self) -> TfcResult<CollectionDocument> {
        let url = self.org_url()?;
        self.endpoint.list(&url, &[]).await
    }

    /// `GET /oauth-clients/:oauth_client_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn show(&self, oauth_client_id: &str) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{oauth_client_id}", self.base_url);
        self.endpoint.show(&url).await
    }

    /// `DELETE /oauth-clients/:oauth_client_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn destroy(&self, oauth_client_id: &str) -> TfcResult<Option<ResourceDocument>> {
        let url = format!("{}/{oauth_client_id}", self.base_url);
        self.endpoint.destroy(&url).await
    }
}

impl Endpoint for TfcOAuthClients {
    fn required_entitlements(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Body for connecting a GitHub.com account with a personal access token.
#[must_use]
pub fn github_oauth_client_payload(token: &str) -> Value {
    json!({
        "data": {
            "type": "oauth-clients",
            "attributes": {
                "service-provider": "github",
                "http-url": "https://github.com",
                "api-url": "https://api.github.com",
                "oauth-token-string": token
            }
        }
    })
}
