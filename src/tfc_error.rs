//! Error type shared by every endpoint wrapper.
//!
//! Non-2xx responses are not retried: they surface as [`TfcError::Api`] with
//! the status and raw body the service returned.

use std::time::Duration;

use thiserror::Error;

/// Result alias used across the crate.
pub type TfcResult<T> = Result<T, TfcError>;

/// Error type for Terraform Cloud client operations.
#[derive(Debug, Error)]
pub enum TfcError {
    /// Missing required environment variable.
    #[error("missing required env var: {0}")]
    MissingEnv(&'static str),

    /// Invalid environment variable value.
    #[error("invalid env var {key}={value:?}: {reason}")]
    InvalidEnv {
        /// The environment variable key.
        key: &'static str,
        /// The environment variable value.
        value: String,
        /// The reason for invalidity.
        reason: &'static str,
    },

    /// An organization-scoped endpoint was called without an organization name.
    #[error("organization name is not configured (set TFC_ORG_NAME)")]
    MissingOrganization,

    /// The configured base URL could not be parsed or extended.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// The parse error.
        #[source]
        source: url::ParseError,
    },

    /// HTTP client error (connect, timeout, TLS, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// API error response.
    #[error("tfc api error: status={status}, body={body}")]
    Api {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Response body.
        body: String,
    },

    /// JSON encode or decode error.
    #[error("json error: {source}")]
    Json {
        /// The JSON parsing error.
        #[source]
        source: serde_json::Error,
        /// The response body (empty when encoding a payload failed).
        body: String,
    },

    /// A response decoded fine but did not have the shape a typed view expects.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A run did not reach the awaited state before the poll deadline.
    #[error("timed out after {elapsed:?} waiting for run {run_id} ({waiting_for})")]
    PollTimeout {
        /// The run being polled.
        run_id: String,
        /// Human-readable description of the awaited condition.
        waiting_for: String,
        /// Time spent polling.
        elapsed: Duration,
    },
}

impl TfcError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the service answered 404 Not Found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }

    /// Check if the service rejected the token (401/403).
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status().map(|s| s.as_u16()),
            Some(401 | 403)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status() {
        let err = TfcError::Api {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "{\"errors\":[{\"status\":\"404\"}]}".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_auth_error());
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[test]
    fn non_api_errors_have_no_status() {
        let err = TfcError::MissingOrganization;
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }

    #[test]
    fn poll_timeout_message_names_the_run() {
        let err = TfcError::PollTimeout {
            run_id: "run-abc".to_string(),
            waiting_for: "applying-at".to_string(),
            elapsed: Duration::from_secs(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("run-abc"));
        assert!(msg.contains("applying-at"));
    }
}
