//! Terraform Cloud client configuration.
//!
//! Unique responsibility: hold the immutable per-client settings (base URL,
//! token, organization, TLS verification, timeouts, poll cadence) shared by
//! every endpoint wrapper.
//!
//! Configuration is built explicitly with [`TfcConfig::new`] and the `with_*`
//! methods, or loaded from environment variables with [`TfcConfig::from_env`].

use std::{env, fmt, time::Duration};

use crate::tfc_error::{TfcError, TfcResult};

/// Default Terraform Cloud host.
pub const DEFAULT_BASE_URL: &str = "https://app.terraform.io";

/// API prefix appended to the base URL.
pub const API_PATH: &str = "/api/v2";

/// Configuration for a Terraform Cloud client.
#[derive(Clone)]
pub struct TfcConfig {
    /// API token for authentication.
    /// Env: `TFC_TOKEN` (required)
    pub token: String,

    /// Host URL of the Terraform Cloud / Enterprise install, without `/api/v2`.
    /// Env: `TFC_URL` (default: "<https://app.terraform.io>")
    pub base_url: String,

    /// Organization name, needed by organization-scoped endpoints.
    /// Env: `TFC_ORG_NAME` (optional)
    pub org_name: Option<String>,

    /// Whether TLS certificates are verified.
    /// Env: `TFC_VERIFY` (default: true)
    pub verify: bool,

    /// HTTP request timeout in milliseconds.
    /// Env: `TFC_HTTP_TIMEOUT_MS` (default: 30000)
    pub timeout_ms: u64,

    /// User agent for HTTP requests.
    /// Env: `TFC_USER_AGENT` (default: "tfc-endpoints/<version>")
    pub user_agent: String,

    /// First delay between two polls of a run, in milliseconds.
    /// Env: `TFC_POLL_INTERVAL_MS` (default: 1000)
    pub poll_interval_ms: u64,

    /// Upper bound for the poll delay after backoff, in milliseconds.
    /// Env: `TFC_POLL_MAX_INTERVAL_MS` (default: 10000)
    pub poll_max_interval_ms: u64,

    /// Maximum total time spent polling a run, in milliseconds.
    /// Env: `TFC_POLL_TIMEOUT_MS` (default: 600000 = 10 minutes)
    pub poll_timeout_ms: u64,
}

impl TfcConfig {
    /// Create a configuration for `app.terraform.io` with default settings.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            org_name: None,
            verify: true,
            timeout_ms: 30_000,
            user_agent: default_user_agent(),
            poll_interval_ms: 1_000,
            poll_max_interval_ms: 10_000,
            poll_timeout_ms: 600_000,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// In local dev, this will also attempt to load `.env` from the current directory.
    /// If `.env` is missing, it does not fail.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> TfcResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source, e.g. a map in tests.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TfcResult<Self> {
        Ok(Self {
            token: lookup("TFC_TOKEN").ok_or(TfcError::MissingEnv("TFC_TOKEN"))?,
            base_url: lookup("TFC_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_name: lookup("TFC_ORG_NAME").filter(|s| !s.trim().is_empty()),
            verify: parse_bool("TFC_VERIFY", lookup("TFC_VERIFY"), true)?,
            timeout_ms: parse_u64("TFC_HTTP_TIMEOUT_MS", lookup("TFC_HTTP_TIMEOUT_MS"), 30_000)?,
            user_agent: lookup("TFC_USER_AGENT").unwrap_or_else(default_user_agent),
            poll_interval_ms: parse_interval(
                "TFC_POLL_INTERVAL_MS",
                lookup("TFC_POLL_INTERVAL_MS"),
                1_000,
            )?,
            poll_max_interval_ms: parse_interval(
                "TFC_POLL_MAX_INTERVAL_MS",
                lookup("TFC_POLL_MAX_INTERVAL_MS"),
                10_000,
            )?,
            poll_timeout_ms: parse_u64(
                "TFC_POLL_TIMEOUT_MS",
                lookup("TFC_POLL_TIMEOUT_MS"),
                600_000,
            )?,
        })
    }

    /// Point the client at another install (e.g. Terraform Enterprise or a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the organization used by organization-scoped endpoints.
    #[must_use]
    pub fn with_org_name(mut self, org_name: impl Into<String>) -> Self {
        self.org_name = Some(org_name.into());
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the HTTP request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the poll cadence: first interval, backoff cap and overall deadline.
    ///
    /// Intervals below one millisecond are raised to one millisecond by the poller.
    #[must_use]
    pub const fn with_polling(
        mut self,
        interval_ms: u64,
        max_interval_ms: u64,
        timeout_ms: u64,
    ) -> Self {
        self.poll_interval_ms = interval_ms;
        self.poll_max_interval_ms = max_interval_ms;
        self.poll_timeout_ms = timeout_ms;
        self
    }

    /// Root of every endpoint URL: `<base_url>/api/v2`.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}{API_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Organization name, or an error for organization-scoped endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::MissingOrganization`] when no organization is configured.
    pub fn org(&self) -> TfcResult<&str> {
        self.org_name.as_deref().ok_or(TfcError::MissingOrganization)
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// The token never shows up in logs or panics.
impl fmt::Debug for TfcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfcConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("org_name", &self.org_name)
            .field("verify", &self.verify)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("poll_max_interval_ms", &self.poll_max_interval_ms)
            .field("poll_timeout_ms", &self.poll_timeout_ms)
            .finish()
    }
}

fn default_user_agent() -> String {
    format!("tfc-endpoints/{}", env!("CARGO_PKG_VERSION"))
}

/// Read a boolean env var (`true`/`1`/`yes`, `false`/`0`/`no`), falling back to `default`.
///
/// # Errors
///
/// Returns [`TfcError::InvalidEnv`] when the variable is set to anything else.
pub fn parse_bool_env(key: &'static str, default: bool) -> TfcResult<bool> {
    parse_bool(key, env::var(key).ok(), default)
}

fn parse_u64(key: &'static str, value: Option<String>, default: u64) -> TfcResult<u64> {
    value.map_or(Ok(default), |v| {
        v.trim().parse::<u64>().map_err(|_| TfcError::InvalidEnv {
            key,
            value: v,
            reason: "expected an unsigned integer",
        })
    })
}

fn parse_interval(key: &'static str, value: Option<String>, default: u64) -> TfcResult<u64> {
    match parse_u64(key, value, default)? {
        0 => Err(TfcError::InvalidEnv {
            key,
            value: "0".to_string(),
            reason: "poll interval must be at least 1 ms",
        }),
        ms => Ok(ms),
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> TfcResult<bool> {
    value.map_or(Ok(default), |v| match v.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TfcError::InvalidEnv {
            key,
            value: v,
            reason: "expected a boolean",
        }),
    })
}
