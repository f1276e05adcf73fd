//! Transport between the application and its host shell.
//!
//! A host posts string messages to us and accepts string messages from us.
//! [`HostChannel`] abstracts that pair so the rest of the bridge never needs
//! to know whether a real shell, an in-process stand-in, or nothing at all
//! sits on the other side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use nightwalk_core::LatLng;
use serde_json::json;
use tokio::sync::broadcast;

use crate::envelope::{Envelope, LOCATION};
use crate::error::BridgeError;

const INBOUND_CAPACITY: usize = 64;

pub trait HostChannel: Send + Sync {
    /// Whether a host is attached and will accept [`HostChannel::post_message`].
    fn is_available(&self) -> bool;

    /// Delivers one serialized envelope to the host.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Unavailable`] when no host is attached, or
    /// [`BridgeError::Dispatch`] when the host refuses the message.
    fn post_message(&self, message: &str) -> Result<(), BridgeError>;

    /// Starts receiving messages posted by the host. Dropping the returned
    /// [`Subscription`] stops delivery to it.
    fn subscribe(&self) -> Subscription;
}

/// Stream of inbound host messages scoped to one consumer.
pub struct Subscription {
    rx: Option<broadcast::Receiver<String>>,
}

impl Subscription {
    #[must_use]
    pub fn new(rx: broadcast::Receiver<String>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A subscription that never yields anything.
    #[must_use]
    pub fn detached() -> Self {
        Self { rx: None }
    }

    /// Waits for the next inbound message. Returns `None` once the host side
    /// is gone or for a detached subscription.
    pub async fn recv(&mut self) -> Option<String> {
        let rx = self.rx.as_mut()?;
        loop {
            match rx.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "host subscription lagged; messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Channel used when the process runs without a host shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHost;

impl HostChannel for NoHost {
    fn is_available(&self) -> bool {
        false
    }

    fn post_message(&self, _message: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    fn subscribe(&self) -> Subscription {
        Subscription::detached()
    }
}

/// In-process host: records every outbound message and lets the caller
/// inject inbound ones with [`MemoryHost::deliver`].
///
/// When built with [`MemoryHost::with_location`] it answers location requests
/// itself, which is how the command-line front end stands in for a device.
pub struct MemoryHost {
    outbox: Mutex<Vec<String>>,
    inbound: broadcast::Sender<String>,
    location: Mutex<Option<LatLng>>,
    refuse: AtomicBool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        Self {
            outbox: Mutex::new(Vec::new()),
            inbound,
            location: Mutex::new(None),
            refuse: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_location(position: LatLng) -> Self {
        let host = Self::new();
        host.set_location(Some(position));
        host
    }

    pub fn set_location(&self, position: Option<LatLng>) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = position;
    }

    /// Makes subsequent posts fail with [`BridgeError::Dispatch`].
    pub fn refuse_messages(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::Relaxed);
    }

    /// Broadcasts `message` to current subscribers; returns how many received it.
    pub fn deliver(&self, message: impl Into<String>) -> usize {
        self.inbound.send(message.into()).unwrap_or(0)
    }

    /// Raw text of every message posted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Posted messages parsed back into envelopes; unparseable ones are skipped.
    #[must_use]
    pub fn sent_envelopes(&self) -> Vec<Envelope> {
        self.sent()
            .iter()
            .filter_map(|m| serde_json::from_str(m).ok())
            .collect()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inbound.receiver_count()
    }

    fn answer_location_request(&self, message: &str) {
        let Ok(envelope) = serde_json::from_str::<Envelope>(message) else {
            return;
        };
        if envelope.name != LOCATION {
            return;
        }
        let position = *self.location.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(position) = position {
            let reply = json!({
                "name": LOCATION,
                "data": { "latitude": position.lat, "longitude": position.lng }
            });
            self.deliver(reply.to_string());
        }
    }
}

impl HostChannel for MemoryHost {
    fn is_available(&self) -> bool {
        true
    }

    fn post_message(&self, message: &str) -> Result<(), BridgeError> {
        if self.refuse.load(Ordering::Relaxed) {
            return Err(BridgeError::Dispatch("host refused message".to_owned()));
        }
        self.outbox
            .lock()
            .map_err(|_| BridgeError::Dispatch("outbox lock poisoned".to_owned()))?
            .push(message.to_owned());
        self.answer_location_request(message);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        Subscription::new(self.inbound.subscribe())
    }
}
