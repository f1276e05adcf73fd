pub mod backoff;
pub mod client;
pub mod error;
pub mod message;

pub use backoff::ReconnectPolicy;
pub use client::{ConnectionState, LiveLocationClient, LiveLocationHandle};
pub use error::LiveError;
pub use message::parse_frame;
