//! Terraform Cloud API facade.
//!
//! One configuration, one HTTP client, every endpoint wrapper:
//!
//! ```ignore
//! let api = Tfc::new(TfcConfig::from_env()?)?;
//! let run = api.runs().show("run-CZcmD7eagjhyX0vN").await?;
//! ```

use std::sync::Arc;

use crate::tfc_config::TfcConfig;
use crate::tfc_endpoint::{TfcEndpoint, build_http_client};
use crate::tfc_error::TfcResult;
use crate::tfc_notification_configs::TfcNotificationConfigs;
use crate::tfc_oauth_clients::TfcOAuthClients;
use crate::tfc_poller::RunPoller;
use crate::tfc_runs::TfcRuns;
use crate::tfc_variables::TfcVariables;
use crate::tfc_workspaces::TfcWorkspaces;

/// Entry point holding every endpoint wrapper.
#[derive(Clone)]
pub struct Tfc {
    cfg: Arc<TfcConfig>,
    notification_configs: TfcNotificationConfigs,
    oauth_clients: TfcOAuthClients,
    runs: TfcRuns,
    variables: TfcVariables,
    workspaces: TfcWorkspaces,
}

impl Tfc {
    /// Build the HTTP client and bind every wrapper to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(cfg: TfcConfig) -> TfcResult<Self> {
        let cfg = Arc::new(cfg);
        let http = build_http_client(&cfg)?;
        let endpoint = TfcEndpoint::with_http(Arc::clone(&cfg), http);

        Ok(Self {
            notification_configs: TfcNotificationConfigs::new(endpoint.clone()),
            oauth_clients: TfcOAuthClients::new(endpoint.clone()),
            runs: TfcRuns::new(endpoint.clone()),
            variables: TfcVariables::new(endpoint.clone()),
            workspaces: TfcWorkspaces::new(endpoint),
            cfg,
        })
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub fn config(&self) -> &TfcConfig {
        &self.cfg
    }

    /// Notification configuration endpoints.
    #[must_use]
    pub const fn notification_configs(&self) -> &TfcNotificationConfigs {
        &self.notification_configs
    }

    /// OAuth client endpoints.
    #[must_use]
    pub const fn oauth_clients(&self) -> &TfcOAuthClients {
        &self.oauth_clients
    }

    /// Run endpoints.
    #[must_use]
    pub const fn runs(&self) -> &TfcRuns {
        &self.runs
    }

    /// Workspace variable endpoints.
    #[must_use]
    pub const fn variables(&self) -> &TfcVariables {
        &self.variables
    }

    /// Workspace endpoints.
    #[must_use]
    pub const fn workspaces(&self) -> &TfcWorkspaces {
        &self.workspaces
    }

    /// Run poller using the configured cadence.
    #[must_use]
    pub fn run_poller(&self) -> RunPoller {
        RunPoller::new(self.runs.clone(), &self.cfg)
    }
}
