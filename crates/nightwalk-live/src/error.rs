use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveError {
    /// The socket could not be opened, or failed while open.
    #[error("live socket error: {0}")]
    Socket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// A text frame was not valid JSON or its payload did not match.
    #[error("malformed live frame: {0}")]
    Parse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for LiveError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Socket(Box::new(err))
    }
}
