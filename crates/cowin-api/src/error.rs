//! Transport error type.

/// Failure calling the upstream service or reading its response.
///
/// Every variant is fatal for the caller: the client never retries.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built or sent, or the body could not be read.
    #[error("{endpoint} request failed")]
    Request {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },
    /// The response body is not the JSON document the endpoint documents.
    #[error("failed to decode {endpoint} response")]
    Decode {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint URL: {endpoint}")]
    Url {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Underlying URL parse error.
        #[source]
        source: url::ParseError,
    },
}

impl TransportError {
    /// Returns the endpoint path the failing request targeted.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Url { endpoint, .. } => endpoint,
        }
    }
}
