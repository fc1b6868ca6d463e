//! Terraform Cloud runs.
//!
//! Unique responsibility: bind the run endpoints and expose a typed view of a
//! run's attributes.
//!
//! API endpoints:
//! - POST /runs
//! - GET  /runs/:run_id
//! - GET  /workspaces/:workspace_id/runs?page[number]=&page[size]=
//! - POST /runs/:run_id/actions/apply
//! - POST /runs/:run_id/actions/discard
//! - POST /runs/:run_id/actions/cancel
//! - POST /runs/:run_id/actions/force-cancel
//! - POST /runs/:run_id/actions/force-execute
//!
//! `status-timestamps` only carries a key once the matching transition has
//! happened. [`StatusTimestamps::get`] returns `None` for a transition that has
//! not happened yet.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::tfc_document::{CollectionDocument, Resource, ResourceDocument};
use crate::tfc_endpoint::{Endpoint, PageParams, TfcEndpoint};
use crate::tfc_error::TfcResult;

/// Wrapper for the run endpoints.
#[derive(Clone)]
pub struct TfcRuns {
    endpoint: TfcEndpoint,
    base_url: String,
    ws_base_url: String,
}

impl TfcRuns {
    /// Bind the wrapper to an endpoint base.
    #[must_use]
    pub fn new(endpoint: TfcEndpoint) -> Self {
        let base_url = endpoint.url("/runs");
        let ws_base_url = endpoint.url("/workspaces");
        Self {
            endpoint,
            base_url,
            ws_base_url,
        }
    }

    /// `POST /runs`
    ///
    /// The workspace is named in the payload's `relationships`; see
    /// [`RunCreatePayload`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> TfcResult<ResourceDocument> {
        self.endpoint.create(&self.base_url, payload).await
    }

    /// `GET /runs/:run_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn show(&self, run_id: &str) -> TfcResult<ResourceDocument> {
        let url = format!("{}/{run_id}", self.base_url);
        self.endpoint.show(&url).await
    }

    /// `GET /workspaces/:workspace_id/runs`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers non-2xx.
    pub async fn list(
        &self,
        workspace_id: &str,
        page: PageParams,
    ) -> TfcResult<CollectionDocument> {
        let url = format!("{}/{workspace_id}/runs", self.ws_base_url);
        self.endpoint.list(&url, &page.to_query()).await
    }

    /// `POST /runs/:run_id/actions/apply`
    ///
    /// Only valid while `actions.is-confirmable` is true.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the run cannot be applied.
    pub async fn apply(
        &self,
        run_id: &str,
        comment: Option<&str>,
    ) -> TfcResult<Option<ResourceDocument>> {
        self.action(run_id, "apply", comment).await
    }

    /// `POST /runs/:run_id/actions/discard`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the run cannot be discarded.
    pub async fn discard(
        &self,
        run_id: &str,
        comment: Option<&str>,
    ) -> TfcResult<Option<ResourceDocument>> {
        self.action(run_id, "discard", comment).await
    }

    /// `POST /runs/:run_id/actions/cancel`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the run cannot be canceled.
    pub async fn cancel(
        &self,
        run_id: &str,
        comment: Option<&str>,
    ) -> TfcResult<Option<ResourceDocument>> {
        self.action(run_id, "cancel", comment).await
    }

    /// `POST /runs/:run_id/actions/force-cancel`
    ///
    /// Available once a regular cancel has been requested and the run is
    /// still not canceled (`actions.is-force-cancelable`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the run cannot be force-canceled.
    pub async fn force_cancel(
        &self,
        run_id: &str,
        comment: Option<&str>,
    ) -> TfcResult<Option<ResourceDocument>> {
        self.action(run_id, "force-cancel", comment).await
    }

    /// `POST /runs/:run_id/actions/force-execute`
    ///
    /// Discards the runs queued ahead of this one and starts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the run cannot be force-executed.
    pub async fn force_execute(&self, run_id: &str) -> TfcResult<Option<ResourceDocument>> {
        self.action(run_id, "force-execute", None).await
    }

    async fn action(
        &self,
        run_id: &str,
        name: &str,
        comment: Option<&str>,
    ) -> TfcResult<Option<ResourceDocument>> {
        let url = format!("{}/{run_id}/actions/{name}", self.base_url);
        let payload = comment.map(|c| json!({ "comment": c }));
        self.endpoint.post(&url, payload.as_ref()).await
    }
}

impl Endpoint for TfcRuns {
    fn required_entitlements(&self) -> &'static [&'static str] {
        &[]
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Builder for the `POST /runs` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCreatePayload {
    /// Workspace the run belongs to.
    pub workspace_id: String,
    /// Message shown in the UI.
    pub message: Option<String>,
    /// Whether this run destroys all managed resources.
    pub is_destroy: bool,
    /// Configuration version to plan; defaults to the workspace's latest.
    pub configuration_version_id: Option<String>,
}

impl RunCreatePayload {
    /// A plan-and-apply run against the workspace's latest configuration.
    #[must_use]
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            message: None,
            is_destroy: false,
            configuration_version_id: None,
        }
    }

    /// Set the run message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Make this a destroy run.
    #[must_use]
    pub const fn destroy(mut self, is_destroy: bool) -> Self {
        self.is_destroy = is_destroy;
        self
    }

    /// Plan a specific configuration version.
    #[must_use]
    pub fn configuration_version(mut self, id: impl Into<String>) -> Self {
        self.configuration_version_id = Some(id.into());
        self
    }

    /// JSON:API document ready for [`TfcRuns::create`].
    #[must_use]
    pub fn to_document(&self) -> Value {
        let mut attributes = serde_json::Map::new();
        attributes.insert("is-destroy".to_string(), Value::Bool(self.is_destroy));
        if let Some(message) = &self.message {
            attributes.insert("message".to_string(), Value::String(message.clone()));
        }

        let mut relationships = serde_json::Map::new();
        relationships.insert(
            "workspace".to_string(),
            json!({ "data": { "type": "workspaces", "id": self.workspace_id } }),
        );
        if let Some(cv) = &self.configuration_version_id {
            relationships.insert(
                "configuration-version".to_string(),
                json!({ "data": { "type": "configuration-versions", "id": cv } }),
            );
        }

        json!({
            "data": {
                "type": "runs",
                "attributes": attributes,
                "relationships": relationships
            }
        })
    }
}

// ============================================================================
// Typed view
// ============================================================================

/// Transitions recorded in `status-timestamps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunTimestamp {
    /// `plan-queueable-at`
    PlanQueueable,
    /// `plan-queued-at`
    PlanQueued,
    /// `planning-at`
    Planning,
    /// `planned-at`
    Planned,
    /// `confirmed-at`
    Confirmed,
    /// `apply-queued-at`
    ApplyQueued,
    /// `applying-at`
    Applying,
    /// `applied-at`
    Applied,
    /// `discarded-at`
    Discarded,
    /// `canceled-at`
    Canceled,
    /// `force-canceled-at`
    ForceCanceled,
    /// `errored-at`
    Errored,
}

impl RunTimestamp {
    /// Key used by the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlanQueueable => "plan-queueable-at",
            Self::PlanQueued => "plan-queued-at",
            Self::Planning => "planning-at",
            Self::Planned => "planned-at",
            Self::Confirmed => "confirmed-at",
            Self::ApplyQueued => "apply-queued-at",
            Self::Applying => "applying-at",
            Self::Applied => "applied-at",
            Self::Discarded => "discarded-at",
            Self::Canceled => "canceled-at",
            Self::ForceCanceled => "force-canceled-at",
            Self::Errored => "errored-at",
        }
    }
}

impl fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `status-timestamps` mapping of a run.
///
/// Null entries are treated like missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<String>>")]
pub struct StatusTimestamps(BTreeMap<String, String>);

impl From<BTreeMap<String, Option<String>>> for StatusTimestamps {
    fn from(raw: BTreeMap<String, Option<String>>) -> Self {
        Self(raw.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))).collect())
    }
}

impl StatusTimestamps {
    /// When the transition happened, or `None` if it has not happened yet.
    #[must_use]
    pub fn get(&self, key: RunTimestamp) -> Option<&str> {
        self.get_raw(key.as_str())
    }

    /// Same as [`Self::get`] for keys this crate does not model.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the transition has happened.
    #[must_use]
    pub fn contains(&self, key: RunTimestamp) -> bool {
        self.0.contains_key(key.as_str())
    }

    /// Recorded transition keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of recorded transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no transition has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The `actions` gate flags of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunActions {
    /// The run can be canceled.
    #[serde(default)]
    pub is_cancelable: bool,
    /// The plan can be applied.
    #[serde(default)]
    pub is_confirmable: bool,
    /// The run can be discarded.
    #[serde(default)]
    pub is_discardable: bool,
    /// The run can be force-canceled.
    #[serde(default)]
    pub is_force_cancelable: bool,
}

/// Typed view over the attributes of a run resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunAttributes {
    /// Current status (`pending`, `planning`, `planned`, `applying`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Run message.
    #[serde(default)]
    pub message: Option<String>,
    /// Whether this is a destroy run.
    #[serde(default)]
    pub is_destroy: bool,
    /// Whether the plan had changes, once known.
    #[serde(default)]
    pub has_changes: Option<bool>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Cancellation time; null until the run is canceled.
    #[serde(default)]
    pub canceled_at: Option<String>,
    /// Available actions.
    #[serde(default)]
    pub actions: RunActions,
    /// Recorded transitions.
    #[serde(default)]
    pub status_timestamps: StatusTimestamps,
}

impl RunAttributes {
    /// Decode the attributes of a run resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes do not look like a run.
    pub fn from_resource(resource: &Resource) -> TfcResult<Self> {
        resource.attributes_as()
    }

    /// Decode the attributes of a `show`/`create` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes do not look like a run.
    pub fn from_document(doc: &ResourceDocument) -> TfcResult<Self> {
        Self::from_resource(&doc.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned_run() -> ResourceDocument {
        serde_json::from_value(json!({
            "data": {
                "id": "run-CZcmD7eagjhyX0vN",
                "type": "runs",
                "attributes": {
                    "status": "planned",
                    "is-destroy": false,
                    "canceled-at": null,
                    "actions": {
                        "is-cancelable": true,
                        "is-confirmable": true,
                        "is-discardable": true,
                        "is-force-cancelable": false
                    },
                    "status-timestamps": {
                        "plan-queueable-at": "2021-05-24T07:38:04+00:00",
                        "planning-at": "2021-05-24T07:38:10+00:00",
                        "planned-at": "2021-05-24T07:38:25+00:00",
                        "applying-at": null
                    }
                },
                "relationships": {
                    "workspace": { "data": { "id": "ws-1", "type": "workspaces" } }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn typed_view_reads_actions_and_timestamps() {
        let doc = planned_run();
        let run = RunAttributes::from_document(&doc).unwrap();

        assert_eq!(run.status.as_deref(), Some("planned"));
        assert!(run.actions.is_confirmable);
        assert!(!run.actions.is_force_cancelable);
        assert_eq!(run.canceled_at, None);
        assert_eq!(
            run.status_timestamps.get(RunTimestamp::Planned),
            Some("2021-05-24T07:38:25+00:00")
        );
        assert_eq!(doc.data.related_id("workspace"), Some("ws-1"));
    }

    #[test]
    fn missing_and_null_timestamps_are_none() {
        let run = RunAttributes::from_document(&planned_run()).unwrap();
        assert_eq!(run.status_timestamps.get(RunTimestamp::Applying), None);
        assert!(!run.status_timestamps.contains(RunTimestamp::Applying));
        assert_eq!(run.status_timestamps.get(RunTimestamp::Discarded), None);
        assert_eq!(run.status_timestamps.len(), 3);
    }

    #[test]
    fn freshly_created_run_has_defaults() {
        let res = Resource {
            id: "run-1".to_string(),
            kind: "runs".to_string(),
            attributes: serde_json::Map::new(),
            relationships: None,
            extra: serde_json::Map::new(),
        };
        let run = RunAttributes::from_resource(&res).unwrap();
        assert!(run.status_timestamps.is_empty());
        assert_eq!(run.actions, RunActions::default());
    }

    #[test]
    fn create_payload_names_the_workspace() {
        let doc = RunCreatePayload::new("ws-1")
            .message("queued by tests")
            .configuration_version("cv-1")
            .to_document();

        assert_eq!(
            doc,
            json!({
                "data": {
                    "type": "runs",
                    "attributes": { "is-destroy": false, "message": "queued by tests" },
                    "relationships": {
                        "workspace": { "data": { "type": "workspaces", "id": "ws-1" } },
                        "configuration-version": {
                            "data": { "type": "configuration-versions", "id": "cv-1" }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn timestamp_keys_match_service_names() {
        assert_eq!(RunTimestamp::ForceCanceled.as_str(), "force-canceled-at");
        assert_eq!(RunTimestamp::Applying.to_string(), "applying-at");
    }
}
