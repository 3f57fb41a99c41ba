//! Playback lifecycle to status message mapping

use tracing::debug;

use crate::host::LifecycleEvent;
use crate::message::{OutgoingStatusMessage, PlaybackStatus};

/// Stateless: every playback notification yields exactly one message, repeats
/// included.
#[derive(Debug, Default)]
pub struct PlaybackStatusNotifier;

impl PlaybackStatusNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn status_for(event: LifecycleEvent) -> Option<PlaybackStatus> {
        match event {
            LifecycleEvent::PlayStarted => Some(PlaybackStatus::Playing),
            LifecycleEvent::PlayStopped => Some(PlaybackStatus::Stopped),
            LifecycleEvent::SimulationStopped => Some(PlaybackStatus::Paused),
            LifecycleEvent::SceneOpened => None,
        }
    }

    pub fn notify(&self, event: LifecycleEvent) -> Option<OutgoingStatusMessage> {
        let status = Self::status_for(event)?;
        debug!(event = ?event, status = %status, "Playback status changed");
        Some(OutgoingStatusMessage::PlaybackStatusChanged { status })
    }
}
