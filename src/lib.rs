//! TFC Endpoints - Terraform Cloud API library.
//!
//! A thin, typed binding of the Terraform Cloud / Enterprise REST API:
//! - **Endpoints**: one wrapper per resource family, one method per documented call
//! - **Documents**: JSON:API responses decoded verbatim (`data`, `included`, `meta`)
//! - **Runs**: typed view of run actions and status timestamps
//! - **Polling**: wait for a run transition with backoff and a deadline
//!
//! ## Quick Start
//!
//! All configuration can be loaded from environment variables. Create a `.env` file:
//!
//! ```text
//! TFC_TOKEN=your_api_token_here
//! TFC_ORG_NAME=my-org
//! ```
//!
//! Then queue a run and apply it once planned:
//!
//! ```ignore
//! use tfc_endpoints::{RunCreatePayload, RunTimestamp, Tfc, TfcConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Tfc::new(TfcConfig::from_env()?)?;
//!
//!     let payload = RunCreatePayload::new("ws-abc123").message("queued from rust");
//!     let run = api.runs().create(&payload.to_document()).await?;
//!     let run_id = run.data.id;
//!
//!     let poller = api.run_poller();
//!     poller.wait_until_confirmable(&run_id).await?;
//!     api.runs().apply(&run_id, Some("looks good")).await?;
//!     let applying_at = poller.wait_for_timestamp(&run_id, RunTimestamp::Applying).await?;
//!     println!("applying since {applying_at}");
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy for strict discipline
#![deny(clippy::all)]                 // All standard Clippy lints
#![deny(clippy::pedantic)]            // Very strict Clippy lints
#![deny(clippy::nursery)]             // Experimental lints
#![deny(clippy::unwrap_used)]         // unwrap() is forbidden
#![deny(clippy::expect_used)]         // expect() is forbidden
#![deny(clippy::panic)]               // panic!() is forbidden
#![deny(clippy::print_stdout)]        // println!() is forbidden in production
#![deny(clippy::todo)]                // TODO is forbidden
#![deny(clippy::unimplemented)]       // unimplemented!() is forbidden
#![deny(clippy::missing_const_for_fn)] // Force const when possible
#![deny(clippy::unwrap_in_result)]    // unwrap() in Result is forbidden
#![deny(clippy::module_inception)]    // Module with same name as crate is forbidden
#![deny(clippy::redundant_clone)]     // Useless clones are forbidden
#![deny(clippy::shadow_unrelated)]    // Shadowing unrelated variables is forbidden
#![deny(clippy::too_many_arguments)]  // Limit function arguments
#![deny(clippy::cognitive_complexity)] // Limit cognitive complexity
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic, clippy::shadow_unrelated))]

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Modules
// ============================================================================

/// Client configuration (base URL, token, organization, TLS, polling).
pub mod tfc_config;

/// Error type shared by every wrapper.
pub mod tfc_error;

/// JSON:API response envelope.
pub mod tfc_document;

/// Shared HTTP verb helpers.
///
/// Use this module to build a wrapper for an endpoint family this crate does not cover.
pub mod tfc_endpoint;

/// Notification configuration endpoints.
pub mod tfc_notification_configs;

/// Run endpoints and the typed run view.
pub mod tfc_runs;

/// Workspace endpoints.
pub mod tfc_workspaces;

/// Workspace variable endpoints.
pub mod tfc_variables;

/// OAuth client endpoints.
pub mod tfc_oauth_clients;

/// Bounded polling of run transitions.
pub mod tfc_poller;

/// Facade bundling every endpoint wrapper.
pub mod tfc_api;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use tfc_api::Tfc;
pub use tfc_config::TfcConfig;
pub use tfc_document::{CollectionDocument, Document, Pagination, Resource, ResourceDocument};
pub use tfc_endpoint::{Endpoint, PageParams, TfcEndpoint};
pub use tfc_error::{TfcError, TfcResult};
pub use tfc_notification_configs::{
    DestinationType, NotificationConfigPayload, NotificationTrigger, TfcNotificationConfigs,
};
pub use tfc_oauth_clients::TfcOAuthClients;
pub use tfc_poller::{PolledRun, RunPoller};
pub use tfc_runs::{
    RunActions, RunAttributes, RunCreatePayload, RunTimestamp, StatusTimestamps, TfcRuns,
};
pub use tfc_variables::{TfcVariables, VariableCategory, VariablePayload};
pub use tfc_workspaces::TfcWorkspaces;
