//! Error types for the NHK API client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Structured error carried in the `"error"` key of a failed API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// API-defined error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[code: {}][message: {}]", self.code, self.message)
    }
}

/// Error returned by every NHK API operation.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum NhkError {
    /// Network-level failure: bad URL, connection refused, timeout.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status other than 200.
    #[error(
        "An error occurred during calling NHK API. [status: {status}]{}",
        .error.as_ref().map(ToString::to_string).unwrap_or_default()
    )]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error envelope, when the body carried one.
        error: Option<ApiError>,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl NhkError {
    /// Returns `true` for network-level failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` when the API answered with a non-200 status.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns `true` when a response body could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// HTTP status of an API error, `None` for the other kinds.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode { .. } => None,
        }
    }
}

/// Result type alias for NHK API operations.
pub type Result<T> = std::result::Result<T, NhkError>;

/// Maps a non-200 response to an [`NhkError`].
///
/// The body must be a JSON object. A missing (or `null`) `"error"` key yields
/// an [`NhkError::Api`] without detail. A body that is not a JSON object, or an
/// `"error"` value without the `{code, message}` shape, yields
/// [`NhkError::Decode`].
#[must_use]
pub fn map_api_error(body: &[u8], status: u16) -> NhkError {
    let context = || format!("error response (HTTP {status})");

    let mut envelope: Map<String, Value> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(source) => {
            return NhkError::Decode {
                context: context(),
                source,
            };
        }
    };

    let error = match envelope.remove("error").filter(|v| !v.is_null()) {
        None => None,
        Some(value) => match serde_json::from_value::<ApiError>(value) {
            Ok(error) => Some(error),
            Err(source) => {
                return NhkError::Decode {
                    context: context(),
                    source,
                };
            }
        },
    };

    NhkError::Api { status, error }
}
