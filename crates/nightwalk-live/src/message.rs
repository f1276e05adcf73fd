use nightwalk_core::LocationUpdate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::LiveError;

pub const LOCATION_UPDATE: &str = "location_update";

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Decodes one text frame from the live socket.
///
/// Frames of any type other than `location_update` yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`LiveError::Parse`] if the text is not a JSON frame or a
/// `location_update` payload lacks a numeric `lat`/`lng`.
pub fn parse_frame(text: &str) -> Result<Option<LocationUpdate>, LiveError> {
    let frame: Frame = serde_json::from_str(text).map_err(|e| LiveError::Parse(e.to_string()))?;
    if frame.kind != LOCATION_UPDATE {
        tracing::trace!(kind = %frame.kind, "ignoring live frame");
        return Ok(None);
    }
    serde_json::from_value(frame.data)
        .map(Some)
        .map_err(|e| LiveError::Parse(format!("{LOCATION_UPDATE} payload: {e}")))
}
