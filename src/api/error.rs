use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised at the GitHub REST boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS or TLS failure before a response arrived.
    #[error("Failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("API request failed ({status}) : {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the JSON we expected.
    #[error("Failed to parse JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
