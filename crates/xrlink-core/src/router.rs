//! Inbound command routing
//!
//! Maps decoded remote actions onto playback toolbar commands. The router keeps
//! no playback state of its own; one bad message never affects the next.

use tracing::{error, info, warn};

use crate::error::BridgeError;
use crate::host::{PlaybackCommand, PlaybackControl};
use crate::message::{self, ActionType, ControlMessage};

/// Map a remote action to the playback command it requests
pub fn command_for(action: &ActionType) -> Result<PlaybackCommand, BridgeError> {
    match action {
        ActionType::Start => Ok(PlaybackCommand::BeginPlayback),
        ActionType::Pause => Ok(PlaybackCommand::PausePlayback),
        ActionType::Stop => Ok(PlaybackCommand::HaltPlayback),
        ActionType::Unknown(name) => Err(BridgeError::UnrecognizedCommand(name.clone())),
    }
}

#[derive(Debug, Default)]
pub struct CommandRouter;

impl CommandRouter {
    pub fn new() -> Self {
        Self
    }

    /// Invoke the playback command requested by `msg`.
    ///
    /// Returns the command that was delivered to the collaborator, if any.
    pub fn dispatch<P: PlaybackControl + ?Sized>(
        &self,
        msg: &ControlMessage,
        playback: &mut P,
    ) -> Option<PlaybackCommand> {
        let command = match command_for(&msg.action_type) {
            Ok(command) => command,
            Err(e) => {
                error!(error = %e, "Ignoring remote action");
                return None;
            }
        };

        match playback.execute(command) {
            Ok(()) => {
                info!(command = %command, "Executed remote action");
                Some(command)
            }
            Err(e) => {
                warn!(command = %command, error = %e, "Playback command failed");
                None
            }
        }
    }

    /// Decode a raw inbound envelope and dispatch it
    pub fn route<P: PlaybackControl + ?Sized>(
        &self,
        raw: &[u8],
        playback: &mut P,
    ) -> Option<PlaybackCommand> {
        match message::decode(raw) {
            Ok(msg) => {
                info!(action = ?msg.action_type, "Received remote action");
                self.dispatch(&msg, playback)
            }
            Err(e) => {
                let e = BridgeError::from(e);
                error!(error = %e, "Dropping remote message");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use serde_json::json;

    fn raw(action: &str) -> Vec<u8> {
        json!({ "message": json!({ "actionType": action }).to_string() })
            .to_string()
            .into_bytes()
    }

    #[test]
    fn test_each_action_invokes_exactly_its_command() {
        let router = CommandRouter::new();
        let cases = [
            ("start", PlaybackCommand::BeginPlayback),
            ("pause", PlaybackCommand::PausePlayback),
            ("stop", PlaybackCommand::HaltPlayback),
        ];
        for (action, expected) in cases {
            let mut host = FakeHost::default();
            let delivered = router.route(&raw(action), &mut host);
            assert_eq!(delivered, Some(expected));
            assert_eq!(host.commands, vec![expected]);
        }
    }

    #[test]
    fn test_unrecognized_action_makes_no_call() {
        let router = CommandRouter::new();
        let mut host = FakeHost::default();
        assert_eq!(router.route(&raw("frobnicate"), &mut host), None);
        assert!(host.commands.is_empty());

        assert!(matches!(
            command_for(&ActionType::Unknown("frobnicate".to_string())),
            Err(BridgeError::UnrecognizedCommand(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn test_miscased_action_makes_no_call() {
        let router = CommandRouter::new();
        let mut host = FakeHost::default();
        assert_eq!(router.route(&raw("STOP"), &mut host), None);
        assert_eq!(router.route(&raw(" Pause "), &mut host), None);
        assert_eq!(router.route(&raw("Start"), &mut host), None);
        assert!(host.commands.is_empty());
    }

    #[test]
    fn test_malformed_payload_makes_no_call() {
        let router = CommandRouter::new();
        let mut host = FakeHost::default();
        assert_eq!(router.route(b"{\"message\": \"{oops\"}", &mut host), None);
        assert_eq!(router.route(b"garbage", &mut host), None);
        assert!(host.commands.is_empty());
    }

    #[test]
    fn test_router_survives_bad_message_between_good_ones() {
        let router = CommandRouter::new();
        let mut host = FakeHost::default();
        router.route(&raw("start"), &mut host);
        router.route(b"garbage", &mut host);
        router.route(&raw("stop"), &mut host);
        assert_eq!(
            host.commands,
            vec![PlaybackCommand::BeginPlayback, PlaybackCommand::HaltPlayback]
        );
    }
}
