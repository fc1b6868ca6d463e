//! Terraform Cloud notification configurations.
//!
//! Unique responsibility: bind the notification-configuration endpoints.
//!
//! Terraform Cloud can send notifications for run state transitions. A
//! configuration names a destination URL, a destination type and the events
//! that trigger it. A workspace holds at most 20 configurations (enforced by
//! the service) and they apply to every run of that workspace.
//!
//! API endpoints:
//! - POST   /workspaces/:workspace_id/notification-configurations
//! - GET    /workspaces/:workspace_id/notification-configurations
//! - GET    /notification-configurations/:id
//! - PATCH  /notification-configurations/:id
//! - POST   /notification-configurations/:id/actions/verify
//! - DELETE /notification-configurations/:id

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tfc_document::{CollectionDocument, ResourceDocument};
use crate::tfc_endpoint::{Endpoint, TfcEndpoint};
use crate::tfc_error::{TfcError, TfcResult};

/// Wrapper for the notification-configuration endpoints.
#[derive(Clone)]
pub struct TfcNotificationConfigs {
    endpoint: TfcEndpoint,
    base_url: String,
    ws_base_url: String,
}

impl TfcNotificationConfigs {
    /// Bind the wrapper to an endpoint base.
    #[must_use]
    pub fn new(endpoint: TfcEndpoint) -> Self {
        let base_url = endpoint.url("/notification-configurations");
        let ws_base_url = endpoint.url("/workspaces");
        Self {
            endpoint,
            base_url,
            ws_base_url,
        }
    }

    /// `POST /workspaces/:workspace_id/notification-configurations`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    pub async fn create<P: Serialize + ?Sized>(
        &self,
        workspace_id: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{workspace_id}/notification-configurations", self.ws_base_url);
        self.endpoint.create(&url, payload).await
    }

    /// `GET /workspaces/:workspace_id/notification-configurations`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn list(&self, workspace_id: &str) -> TfcResult<CollectionDocument> {
        let url = format!("{}/{workspace_id}/notification-configurations", self.ws_base_url);
        self.endpoint.list(&url, &[]).await
    }

    /// `GET /notification-configurations/:notification_config_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn show(&self, notification_config_id: &str) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{notification_config_id}", self.base_url);
        self.endpoint.show(&url).await
    }

    /// `PATCH /notification-configurations/:notification_config_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        notification_config_id: &str,
        payload: &P,
    ) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{notification_config_id}", self.base_url);
        self.endpoint.update(&url, payload).await
    }

    /// `POST /notification-configurations/:notification_config_id/actions/verify`
    ///
    /// Sends a test notification to the destination and returns the
    /// configuration with its `delivery-responses` filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn verify(
        &self,
        notification_config_id: &str,
    ) -> TfcResult<Option<ResourceDocument>> {
        let url = format!("{}/{notification_config_id}/actions/verify", self.base_url);
        self.endpoint.post(&url, None).await
    }

    /// `DELETE /notification-configurations/:notification_config_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn destroy(
        &self,
        notification_config_id: &str,
    ) -> TfcResult<Option<ResourceDocument>> {
        let url = format!("{}/{notification_config_id}", self.base_url);
        self.endpoint.destroy(&url).await
    }
}

impl Endpoint for TfcNotificationConfigs {
    fn required_entitlements(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Where notifications are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestinationType {
    /// Generic webhook receiving the JSON notification payload.
    Generic,
    /// Slack incoming webhook.
    Slack,
    /// Microsoft Teams incoming webhook.
    MicrosoftTeams,
    /// Email to organization members.
    Email,
}

/// Run events that trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationTrigger {
    /// A run was created.
    #[serde(rename = "run:created")]
    Created,
    /// A run started planning.
    #[serde(rename = "run:planning")]
    Planning,
    /// A plan needs confirmation.
    #[serde(rename = "run:needs_attention")]
    NeedsAttention,
    /// A run started applying.
    #[serde(rename = "run:applying")]
    Applying,
    /// A run completed.
    #[serde(rename = "run:completed")]
    Completed,
    /// A run errored.
    #[serde(rename = "run:errored")]
    Errored,
}

/// Builder for the create/update body of a notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NotificationConfigPayload {
    /// Display name.
    pub name: String,
    /// Delivery type.
    pub destination_type: DestinationType,
    /// Whether notifications are sent.
    pub enabled: bool,
    /// Destination URL (not used by `email`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Secret used to sign `generic` payloads (HMAC-SHA512).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Events that trigger a notification.
    pub triggers: Vec<NotificationTrigger>,
}

impl NotificationConfigPayload {
    /// A webhook configuration, enabled, with no triggers yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        destination_type: DestinationType,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            destination_type,
            enabled: true,
            url: Some(url.into()),
            token: None,
            triggers: Vec::new(),
        }
    }

    /// Add a trigger.
    #[must_use]
    pub fn trigger(mut self, trigger: NotificationTrigger) -> Self {
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
        self
    }

    /// Set the signing token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Enable or disable delivery.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// JSON:API document ready for `create` or `update`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be serialized.
    pub fn to_document(&self) -> TfcResult<Value> {
        let attributes = serde_json::to_value(self).map_err(|source| TfcError::Json {
            source,
            body: String::new(),
        })?;
        Ok(serde_json::json!({
            "data": {
                "type": "notification-configurations",
                "attributes": attributes
            }
        }))
    }
}
