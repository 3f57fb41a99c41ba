//! Error taxonomy for the bridge
//!
//! Every variant is non-fatal. Handlers log the error with its context and
//! return to the previous stable state.

use thiserror::Error;

use crate::message::DecodeError;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Malformed payload ({reason}): {payload}")]
    MalformedPayload { payload: String, reason: String },
    #[error("Missing field '{field}' in payload: {payload}")]
    MissingField { field: &'static str, payload: String },
    #[error("Unrecognized command: {0}")]
    UnrecognizedCommand(String),
    #[error("Invalid load target: {0:?}")]
    InvalidLoadTarget(String),
    #[error("Failed to open scene {path}: {reason}")]
    SceneOpenFailure { path: String, reason: String },
    #[error("Failed to read layout for profile {profile} from {path}: {reason}")]
    LayoutReadFailure {
        profile: String,
        path: String,
        reason: String,
    },
    #[error("Failed to create camera {path}: {reason}")]
    CameraCreationFailure { path: String, reason: String },
}

impl From<DecodeError> for BridgeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::MalformedPayload { payload, reason } => {
                BridgeError::MalformedPayload { payload, reason }
            }
            DecodeError::MissingField { field, payload } => {
                BridgeError::MissingField { field, payload }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_conversion_keeps_context() {
        let err: BridgeError = DecodeError::MissingField {
            field: "actionType",
            payload: "{}".to_string(),
        }
        .into();

        match err {
            BridgeError::MissingField { field, payload } => {
                assert_eq!(field, "actionType");
                assert_eq!(payload, "{}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_includes_path() {
        let err = BridgeError::SceneOpenFailure {
            path: "/assets/demo.usd".to_string(),
            reason: "host disconnected".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open scene /assets/demo.usd: host disconnected"
        );
    }
}
