//! Terraform Cloud workspaces.
//!
//! API endpoints:
//! - POST   /organizations/:org/workspaces
//! - GET    /organizations/:org/workspaces
//! - GET    /workspaces/:workspace_id
//! - PATCH  /workspaces/:workspace_id
//! - DELETE /workspaces/:workspace_id
//!
//! Organization-scoped calls fail with [`crate::TfcError::MissingOrganization`]
//! before any request when no organization is configured.

use serde::Serialize;
use serde_json::{Value, json};

use crate::tfc_document::{CollectionDocument, ResourceDocument};
use crate::tfc_endpoint::{Endpoint, PageParams, TfcEndpoint};
use crate::tfc_error::TfcResult;

/// Wrapper for the workspace endpoints.
#[derive(Clone)]
pub struct TfcWorkspaces {
    endpoint: TfcEndpoint,
    ws_base_url: String,
}

impl TfcWorkspaces {
    /// Bind the wrapper to an endpoint base.
    #[must_use]
    pub fn new(endpoint: TfcEndpoint) -> Self {
        let ws_base_url = endpoint.url("/workspaces");
        Self {
            endpoint,
            ws_base_url,
        }
    }

    fn org_url(&self) -> TfcResult<String> {
        let org = self.endpoint.config().org()?;
        Ok(self.endpoint.url(&format!("/organizations/{org}/workspaces")))
    }

    /// `POST /organizations/:org/workspaces`
    ///
    /// # Errors
    ///
    /// Returns an error if no organization is configured, the request fails,
    /// or the API rejects the payload.
    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> TfcResult<ResourceDocument> {
        let url = self.org_url()?;
        self.endpoint.create(&url, payload).await
    }

    /// `GET /organizations/:org/workspaces`
    ///
    /// # Errors
    ///
    /// Returns an error if no organization is configured or the request fails.
    pub async fn list(&self, page: PageParams) -> TfcResult<CollectionDocument> {
        let url = self.org_url()?;
        self.endpoint.list(&url, &page.to_query()).await
    }

    /// `GET /workspaces/:workspace_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn show(&self, workspace_id: &str) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{workspace_id}", self.ws_base_url);
        self.endpoint.show(&url).await
    }

    /// `PATCH /workspaces/:workspace_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        workspace_id: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{workspace_id}", self.ws_base_url);
        self.endpoint.update(&url, payload).await
    }

    /// `DELETE /workspaces/:workspace_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn destroy(&self, workspace_id: &str) -> TfcResult<Option<ResourceDocument>> {
        let url = format!("{}/{workspace_id}", self.ws_base_url);
        self.endpoint.destroy(&url).await
    }
}

impl Endpoint for TfcWorkspaces {
    fn required_entitlements(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Body for creating a workspace, optionally linked to a VCS repository
/// through an OAuth token.
#[must_use]
pub fn workspace_create_payload(name: &str, vcs: Option<(&str, &str)>) -> Value {
    let mut attributes = json!({ "name": name });
    if let Some((oauth_token_id, identifier)) = vcs {
        attributes["vcs-repo"] = json!({
            "identifier": identifier,
            "oauth-token-id": oauth_token_id
        });
    }
    json!({ "data": { "type": "workspaces", "attributes": attributes } })
}
