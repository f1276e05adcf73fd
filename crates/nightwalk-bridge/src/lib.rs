//! Messaging bridge to the host shell that embeds the map.

pub mod channel;
pub mod client;
pub mod envelope;
pub mod error;

pub use channel::{HostChannel, MemoryHost, NoHost, Subscription};
pub use client::{BridgeClient, PageOpen};
pub use envelope::{parse_location_reply, Envelope, HostMessage};
pub use error::BridgeError;
