//! Terraform Cloud workspace variables.
//!
//! API endpoints:
//! - POST   /workspaces/:workspace_id/vars
//! - GET    /workspaces/:workspace_id/vars
//! - PATCH  /workspaces/:workspace_id/vars/:variable_id
//! - DELETE /workspaces/:workspace_id/vars/:variable_id

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::tfc_document::{CollectionDocument, ResourceDocument};
use crate::tfc_endpoint::{Endpoint, TfcEndpoint};
use crate::tfc_error::{TfcError, TfcResult};

/// Wrapper for the workspace variable endpoints.
#[derive(Clone)]
pub struct TfcVariables {
    endpoint: TfcEndpoint,
    ws_base_url: String,
}

impl TfcVariables {
    /// Bind the wrapper to an endpoint base.
    #[must_use]
    pub fn new(endpoint: TfcEndpoint) -> Self {
        let ws_base_url = endpoint.url("/workspaces");
        Self {
            endpoint,
            ws_base_url,
        }
    }

    /// `POST /workspaces/:workspace_id/vars`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    pub async fn create<P: Serialize + ?Sized>(
        &self,
        workspace_id: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{workspace_id}/vars", self.ws_base_url);
        self.endpoint.create(&url, payload).await
    }

    /// `GET /workspaces/:workspace_id/vars`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn list(&self, workspace_id: &str) -> TfcResult<CollectionDocument> {
        let url = format!("{}/{workspace_id}/vars", self.ws_base_url);
        self.endpoint.list(&url, &[]).await
    }

    /// `PATCH /workspaces/:workspace_id/vars/:variable_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        workspace_id: &str,
        variable_id: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{workspace_id}/vars/{variable_id}", self.ws_base_url);
        self.endpoint.update(&url, payload).await
    }

    /// `DELETE /workspaces/:workspace_id/vars/:variable_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn destroy(
        &self,
        workspace_id: &str,
        variable_id: &str,
    ) -> TfcResult<Option<ResourceDocument>> {
        let url = format!("{}/{workspace_id}/vars/{variable_id}", self.ws_base_url);
        self.endpoint.destroy(&url).await
    }
}

impl Endpoint for TfcVariables {
    fn required_entitlements(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Whether a variable feeds Terraform or the run environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableCategory {
    /// Terraform input variable.
    #[default]
    Terraform,
    /// Shell environment variable.
    Env,
}

/// Builder for the create body of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VariablePayload {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// Terraform or environment variable.
    pub category: VariableCategory,
    /// Write-only once set.
    pub sensitive: bool,
    /// Parse the value as HCL.
    pub hcl: bool,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VariablePayload {
    /// A plain, non-sensitive Terraform variable.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            category: VariableCategory::Terraform,
            sensitive: false,
            hcl: false,
            description: None,
        }
    }

    /// Set the category.
    #[must_use]
    pub const fn category(mut self, category: VariableCategory) -> Self {
        self.category = category;
        self
    }

    /// Mark the value sensitive.
    #[must_use]
    pub const fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// JSON:API document ready for [`TfcVariables::create`].
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be serialized.
    pub fn to_document(&self) -> TfcResult<Value> {
        let attributes = serde_json::to_value(self).map_err(|source| TfcError::Json {
            source,
            body: String::new(),
        })?;
        Ok(json!({ "data": { "type": "vars", "attributes": attributes } }))
    }
}
