use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No host shell is attached to this process.
    #[error("host channel is not available")]
    Unavailable,

    /// The host rejected or failed to accept a message.
    #[error("host dispatch failed: {0}")]
    Dispatch(String),

    /// An envelope could not be serialized.
    #[error("envelope serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An inbound message was not a well-formed envelope.
    #[error("malformed host message: {0}")]
    Parse(String),
}
