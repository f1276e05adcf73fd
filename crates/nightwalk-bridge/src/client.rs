use std::sync::Arc;
use std::time::Duration;

use nightwalk_core::LatLng;

use crate::channel::{HostChannel, NoHost, Subscription};
use crate::envelope::{parse_location_reply, HostMessage};
use crate::error::BridgeError;

/// Where a page-open request ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOpen {
    /// The host accepted the request and will show the page.
    Host,
    /// No host took it; the caller should open this URL itself.
    Direct(String),
}

/// Sends requests to the host shell and listens for its replies.
///
/// Every send reports success as a plain `bool`: a missing host or a failed
/// dispatch is logged and never propagated.
#[derive(Clone)]
pub struct BridgeClient {
    channel: Arc<dyn HostChannel>,
}

impl Default for BridgeClient {
    fn default() -> Self {
        Self::detached()
    }
}

impl BridgeClient {
    pub fn new(channel: Arc<dyn HostChannel>) -> Self {
        Self { channel }
    }

    /// A client with no host behind it; every send returns `false`.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(Arc::new(NoHost))
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.channel.is_available()
    }

    pub fn send(&self, message: HostMessage) -> bool {
        let name = message.name();
        if !self.channel.is_available() {
            tracing::warn!(name, "host channel not detected; message not sent");
            return false;
        }

        let text = match serde_json::to_string(&message.into_envelope()) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(name, error = %BridgeError::Serialize(e), "could not encode host message");
                return false;
            }
        };

        match self.channel.post_message(&text) {
            Ok(()) => {
                tracing::debug!(name, "host message sent");
                true
            }
            Err(e) => {
                tracing::error!(name, error = %e, "host message failed");
                false
            }
        }
    }

    pub fn open_new_page(&self, url: &str, title: Option<&str>) -> bool {
        self.send(HostMessage::OpenNewPage {
            url: url.to_owned(),
            title: title.map(str::to_owned),
        })
    }

    /// Asks the host to open `url`, falling back to direct navigation.
    pub fn open_page_or_direct(&self, url: &str, title: Option<&str>) -> PageOpen {
        if self.open_new_page(url, title) {
            PageOpen::Host
        } else {
            PageOpen::Direct(url.to_owned())
        }
    }

    pub fn notify(&self, title: &str, content: &str) -> bool {
        self.send(HostMessage::Notify {
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }

    pub fn phone_call(&self, number: &str) -> bool {
        self.send(HostMessage::PhoneCall {
            number: number.to_owned(),
        })
    }

    pub fn request_location(&self) -> bool {
        self.send(HostMessage::RequestLocation)
    }

    /// Subscribes to inbound host messages. The subscription ends when dropped.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.channel.subscribe()
    }

    /// Waits for the next `location` reply on `subscription`, skipping
    /// unrelated and malformed messages.
    pub async fn next_location(subscription: &mut Subscription) -> Option<LatLng> {
        while let Some(text) = subscription.recv().await {
            match parse_location_reply(&text) {
                Ok(Some(position)) => return Some(position),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring malformed host message"),
            }
        }
        None
    }

    /// Requests the device position and waits up to `timeout` for one reply.
    ///
    /// Subscribes before sending so a synchronous reply is not missed; the
    /// subscription is released as soon as this returns.
    pub async fn locate(&self, timeout: Duration) -> Option<LatLng> {
        let mut subscription = self.subscribe();
        if !self.request_location() {
            return None;
        }
        match tokio::time::timeout(timeout, Self::next_location(&mut subscription)).await {
            Ok(position) => position,
            Err(_) => {
                tracing::warn!(?timeout, "no location reply from host");
                None
            }
        }
    }
}
