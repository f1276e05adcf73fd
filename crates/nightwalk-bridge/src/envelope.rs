//! `{name, data}` envelopes exchanged with the host shell.

use nightwalk_core::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::BridgeError;

pub const OPEN_NEW_PAGE: &str = "open_new_page";
pub const NOTIFY: &str = "notify";
pub const PHONE_CALL: &str = "phone_call";
pub const LOCATION: &str = "location";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

/// Outbound requests the host understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    OpenNewPage { url: String, title: Option<String> },
    Notify { title: String, content: String },
    PhoneCall { number: String },
    /// Ask the host for the device position; answered by a `location` envelope.
    RequestLocation,
}

impl HostMessage {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenNewPage { .. } => OPEN_NEW_PAGE,
            Self::Notify { .. } => NOTIFY,
            Self::PhoneCall { .. } => PHONE_CALL,
            Self::RequestLocation => LOCATION,
        }
    }

    #[must_use]
    pub fn into_envelope(self) -> Envelope {
        let name = self.name().to_owned();
        let data = match self {
            Self::OpenNewPage { url, title } => match title {
                Some(title) => json!({ "url": url, "title": title }),
                None => json!({ "url": url }),
            },
            Self::Notify { title, content } => json!({ "title": title, "content": content }),
            Self::PhoneCall { number } => Value::String(number),
            Self::RequestLocation => Value::Null,
        };
        Envelope { name, data }
    }
}

#[derive(Debug, Deserialize)]
struct LocationData {
    latitude: f64,
    longitude: f64,
}

/// Extracts a position from an inbound host message.
///
/// Returns `Ok(None)` for well-formed envelopes that are not a location
/// reply (other names, or a `location` envelope without data).
///
/// # Errors
///
/// Returns [`BridgeError::Parse`] when the text is not a JSON envelope, or a
/// `location` envelope's data lacks numeric `latitude`/`longitude`.
pub fn parse_location_reply(text: &str) -> Result<Option<LatLng>, BridgeError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| BridgeError::Parse(e.to_string()))?;

    if envelope.name != LOCATION || envelope.data.is_null() {
        return Ok(None);
    }

    let data: LocationData = serde_json::from_value(envelope.data)
        .map_err(|e| BridgeError::Parse(format!("location data: {e}")))?;
    Ok(Some(LatLng::new(data.latitude, data.longitude)))
}
