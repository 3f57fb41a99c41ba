//! Scene host collaborator backed by the `/ws/host` channel
//!
//! Commands are broadcast to the connected host. Synchronous queries (active
//! stage, load counters, session prims) are answered from state cached off the
//! host's own notifications, which the event loop feeds through
//! [`HostLink::apply`] before handing them to the bridge.
//!
//! Stage-scoped commands issued after an `openStage` are held back until the
//! host reports that stage opened, so they land on the new stage rather than
//! the one being replaced.

use serde_json::Value;
use std::collections::BTreeSet;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};
use xrlink_core::{
    BridgeEvent, HostError, LayoutRestorer, LifecycleEvent, LoadCounters, PlaybackCommand,
    PlaybackControl, SceneHost, SettingValue,
};

use crate::protocol::{HostCommand, HostEvent};

pub struct HostLink {
    commands: broadcast::Sender<HostCommand>,
    active_url: Option<String>,
    counters: LoadCounters,
    /// Prims this link defined on the current stage's session layer
    session_prims: BTreeSet<String>,
    /// Set between sending `openStage` and the host reporting a stage
    open_pending: bool,
    /// Stage-scoped commands waiting for the pending stage
    deferred: Vec<HostCommand>,
    pending_prims: BTreeSet<String>,
}

impl HostLink {
    pub fn new(commands: broadcast::Sender<HostCommand>) -> Self {
        Self {
            commands,
            active_url: None,
            counters: LoadCounters::default(),
            session_prims: BTreeSet::new(),
            open_pending: false,
            deferred: Vec::new(),
            pending_prims: BTreeSet::new(),
        }
    }

    fn send(&self, command: HostCommand) -> Result<(), HostError> {
        trace!(command = ?command, "Sending host command");
        self.commands
            .send(command)
            .map(|_| ())
            .map_err(|_| HostError::Disconnected)
    }

    /// Update cached host state and translate the notification for the bridge
    pub fn apply(&mut self, event: HostEvent) -> Option<BridgeEvent> {
        match event {
            HostEvent::StageOpened { url } => {
                debug!(stage = %url, "Host opened stage");
                self.active_url = if url.is_empty() { None } else { Some(url) };
                self.session_prims.clear();
                if self.open_pending && self.active_url.is_some() {
                    self.flush_deferred();
                }
                Some(BridgeEvent::Lifecycle(LifecycleEvent::SceneOpened))
            }
            HostEvent::PlayStarted => Some(BridgeEvent::Lifecycle(LifecycleEvent::PlayStarted)),
            HostEvent::PlayStopped => Some(BridgeEvent::Lifecycle(LifecycleEvent::PlayStopped)),
            HostEvent::SimulationStopped => {
                Some(BridgeEvent::Lifecycle(LifecycleEvent::SimulationStopped))
            }
            HostEvent::Tick { loaded, total } => {
                self.counters = LoadCounters::new(loaded, total);
                Some(BridgeEvent::Tick)
            }
        }
    }

    fn flush_deferred(&mut self) {
        self.open_pending = false;
        self.session_prims = std::mem::take(&mut self.pending_prims);
        for command in std::mem::take(&mut self.deferred) {
            debug!(command = ?command, "Sending deferred host command");
            if let Err(e) = self.send(command) {
                warn!(error = %e, "Deferred host command dropped");
            }
        }
    }
}

impl SceneHost for HostLink {
    fn open_scene(&mut self, path: &str) -> Result<(), HostError> {
        self.send(HostCommand::OpenStage {
            path: path.to_string(),
        })?;
        // A newer open supersedes whatever was waiting on the previous one
        self.open_pending = true;
        self.deferred.clear();
        self.pending_prims.clear();
        Ok(())
    }

    fn load_counters(&self) -> LoadCounters {
        self.counters
    }

    fn active_scene_path(&self) -> Option<String> {
        self.active_url.clone()
    }

    fn has_prim(&self, path: &str) -> bool {
        if self.open_pending {
            return self.pending_prims.contains(path);
        }
        self.session_prims.contains(path)
    }

    fn define_camera(&mut self, path: &str) -> Result<(), HostError> {
        if self.open_pending {
            self.deferred.push(HostCommand::DefineCamera {
                path: path.to_string(),
            });
            self.pending_prims.insert(path.to_string());
            return Ok(());
        }
        if self.active_url.is_none() {
            return Err(HostError::Rejected("stage is not loaded".to_string()));
        }
        self.send(HostCommand::DefineCamera {
            path: path.to_string(),
        })?;
        self.session_prims.insert(path.to_string());
        Ok(())
    }

    fn set_setting(&mut self, key: &str, value: SettingValue) -> Result<(), HostError> {
        self.send(HostCommand::SetSetting {
            key: key.to_string(),
            value,
        })
    }
}

impl PlaybackControl for HostLink {
    fn execute(&mut self, command: PlaybackCommand) -> Result<(), HostError> {
        self.send(HostCommand::playback(command))
    }
}

impl LayoutRestorer for HostLink {
    fn restore_layout(&mut self, layout: &Value) -> Result<(), HostError> {
        self.send(HostCommand::RestoreLayout {
            layout: layout.clone(),
        })
    }
}
