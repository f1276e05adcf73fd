use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("invalid marker: {0}")]
    InvalidMarker(String),
}
