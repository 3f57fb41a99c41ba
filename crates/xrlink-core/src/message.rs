//! Control and status message codec
//!
//! Inbound and outbound traffic share the same envelope, `{ "message": <text> }`,
//! where the text is itself JSON. Inbound payloads carry an `actionType`,
//! outbound payloads carry a capitalized `Type` discriminator.

use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Envelope field holding the nested JSON text
pub const ENVELOPE_FIELD: &str = "message";

/// Field carrying the requested action in an inbound payload
pub const ACTION_FIELD: &str = "actionType";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed payload ({reason}): {payload}")]
    MalformedPayload { payload: String, reason: String },
    #[error("Missing field '{field}' in payload: {payload}")]
    MissingField { field: &'static str, payload: String },
}

/// Action requested by the remote client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    Start,
    Pause,
    Stop,
    /// Valid payload naming an action this bridge does not know
    Unknown(String),
}

impl ActionType {
    /// Parse an action name. Older clients send `play` instead of `start`.
    /// Names are matched exactly.
    pub fn parse(name: &str) -> Self {
        match name {
            "start" | "play" => ActionType::Start,
            "pause" => ActionType::Pause,
            "stop" => ActionType::Stop,
            _ => ActionType::Unknown(name.to_string()),
        }
    }
}

/// Decoded inbound command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    pub action_type: ActionType,
}

/// Playback status reported to the remote client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status message sent to the remote client
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingStatusMessage {
    PlaybackStatusChanged { status: PlaybackStatus },
    /// Progress in `[0, 1]`
    FileLoadingProgress { progress: f64 },
}

impl OutgoingStatusMessage {
    /// Inner payload as JSON
    pub fn to_json(&self) -> Value {
        match self {
            OutgoingStatusMessage::PlaybackStatusChanged { status } => json!({
                "Type": "playbackStatusChanged",
                "status": status.as_str(),
            }),
            OutgoingStatusMessage::FileLoadingProgress { progress } => json!({
                "Type": "fileLoadingProgress",
                "progress": progress,
            }),
        }
    }
}

/// Decode an inbound envelope into a control message
pub fn decode(raw: &[u8]) -> Result<ControlMessage, DecodeError> {
    let envelope: Value = serde_json::from_slice(raw).map_err(|e| DecodeError::MalformedPayload {
        payload: String::from_utf8_lossy(raw).into_owned(),
        reason: e.to_string(),
    })?;

    match envelope.get(ENVELOPE_FIELD) {
        Some(Value::String(text)) => decode_message(text),
        // Some transports hand over the nested payload already parsed
        Some(inner @ Value::Object(_)) => decode_value(inner, &envelope),
        Some(_) => Err(DecodeError::MalformedPayload {
            payload: envelope.to_string(),
            reason: format!("'{}' is neither text nor an object", ENVELOPE_FIELD),
        }),
        None => Err(DecodeError::MissingField {
            field: ENVELOPE_FIELD,
            payload: envelope.to_string(),
        }),
    }
}

/// Decode the nested JSON text of an inbound envelope
pub fn decode_message(text: &str) -> Result<ControlMessage, DecodeError> {
    let payload: Value = serde_json::from_str(text).map_err(|e| DecodeError::MalformedPayload {
        payload: text.to_string(),
        reason: e.to_string(),
    })?;
    decode_value(&payload, &payload)
}

fn decode_value(payload: &Value, context: &Value) -> Result<ControlMessage, DecodeError> {
    let action = payload
        .get(ACTION_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::MissingField {
            field: ACTION_FIELD,
            payload: context.to_string(),
        })?;

    Ok(ControlMessage {
        action_type: ActionType::parse(action),
    })
}

/// Encode a status message into an outbound envelope
pub fn encode(msg: &OutgoingStatusMessage) -> Vec<u8> {
    encode_text(msg).into_bytes()
}

/// Encode a status message into an outbound envelope, as text
pub fn encode_text(msg: &OutgoingStatusMessage) -> String {
    json!({ "message": msg.to_json().to_string() }).to_string()
}
