use thiserror::Error;

/// Errors returned by the safety backend client and the payload converter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API request failed: {status} {reason} ({url})")]
    Fetch {
        status: u16,
        reason: String,
        url: String,
        /// `error` message from the backend's JSON body, when it sent one.
        detail: Option<String>,
    },

    /// The payload is missing a field the view model cannot be built without.
    #[error("backend payload is missing {field}: {detail}")]
    Schema { field: String, detail: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ApiError {
    pub(crate) fn schema(field: &str, detail: impl Into<String>) -> Self {
        Self::Schema {
            field: field.to_owned(),
            detail: detail.into(),
        }
    }

    /// HTTP status for [`ApiError::Fetch`], if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
