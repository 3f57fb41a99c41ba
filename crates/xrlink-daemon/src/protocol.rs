//! JSON protocol spoken with the scene host over `/ws/host`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use xrlink_core::{PlaybackCommand, SettingValue};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid host message: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Notification sent by the scene host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// A stage finished opening. Placeholder stages have an `anon:` URL.
    StageOpened {
        #[serde(default)]
        url: String,
    },
    PlayStarted,
    PlayStopped,
    SimulationStopped,
    /// Per-frame tick carrying the asset-loading counters
    Tick {
        #[serde(default)]
        loaded: u64,
        #[serde(default)]
        total: u64,
    },
}

impl HostEvent {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Request sent to the scene host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    OpenStage { path: String },
    /// Run a named host command
    ExecuteCommand { name: &'static str },
    /// Define a camera prim on the session layer
    DefineCamera { path: String },
    SetSetting { key: String, value: SettingValue },
    RestoreLayout { layout: Value },
}

impl HostCommand {
    pub fn playback(command: PlaybackCommand) -> Self {
        let name = match command {
            PlaybackCommand::BeginPlayback => "ToolbarPlayButtonClicked",
            PlaybackCommand::PausePlayback => "ToolbarPauseButtonClicked",
            PlaybackCommand::HaltPlayback => "ToolbarStopButtonClicked",
        };
        HostCommand::ExecuteCommand { name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_host_events() {
        assert_eq!(
            HostEvent::parse(r#"{"type":"stageOpened","url":"anon:World0.usd"}"#).unwrap(),
            HostEvent::StageOpened {
                url: "anon:World0.usd".to_string()
            }
        );
        assert_eq!(
            HostEvent::parse(r#"{"type":"tick","loaded":3,"total":10}"#).unwrap(),
            HostEvent::Tick { loaded: 3, total: 10 }
        );
        assert_eq!(
            HostEvent::parse(r#"{"type":"tick"}"#).unwrap(),
            HostEvent::Tick { loaded: 0, total: 0 }
        );
        assert_eq!(
            HostEvent::parse(r#"{"type":"simulationStopped"}"#).unwrap(),
            HostEvent::SimulationStopped
        );
    }

    #[test]
    fn test_reject_unknown_host_event() {
        assert!(HostEvent::parse(r#"{"type":"explode"}"#).is_err());
        assert!(HostEvent::parse("tick").is_err());
    }

    #[test]
    fn test_serialize_host_commands() {
        let cmd = HostCommand::playback(PlaybackCommand::PausePlayback);
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"type": "executeCommand", "name": "ToolbarPauseButtonClicked"})
        );

        let cmd = HostCommand::SetSetting {
            key: "/xr/ui/enabled".to_string(),
            value: SettingValue::Bool(false),
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"type": "setSetting", "key": "/xr/ui/enabled", "value": false})
        );
    }
}
