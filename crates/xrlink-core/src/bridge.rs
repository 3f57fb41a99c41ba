//! Single-queue event dispatcher
//!
//! Remote messages, scene lifecycle notifications, ticks and timer expiries all
//! arrive as [`BridgeEvent`]s and are handled one at a time, in delivery order.
//! A handler runs to completion before the next event is looked at, so the
//! components below need no locking.

use serde::Serialize;
use tracing::{debug, info};

use crate::host::{HostServices, LifecycleEvent};
use crate::layout::LayoutSource;
use crate::message::OutgoingStatusMessage;
use crate::orchestrator::{OrchestratorContext, SceneLoadOrchestrator, SceneLoadState, Transition};
use crate::profile::{apply_settings, InterfaceProfile};
use crate::progress::LoadingProgressReporter;
use crate::router::CommandRouter;
use crate::status::PlaybackStatusNotifier;
use crate::timer::{TimerScheduler, TimerToken};

/// Local operator requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Replace the pending load target (empty selects the default)
    SetUsd(String),
    /// Open the pending target now
    LoadTarget,
    /// Open the empty stage
    ResetStage,
    /// Re-apply the profile layout
    RestoreLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// Raw inbound envelope from the remote client
    Remote(Vec<u8>),
    Lifecycle(LifecycleEvent),
    Tick,
    TimerFired(TimerToken),
    Control(ControlRequest),
    /// The scene host became available
    HostConnected,
}

/// Point-in-time view of the bridge for status endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeSnapshot {
    pub state: SceneLoadState,
    pub profile: InterfaceProfile,
    pub pending_target: String,
    pub resolved_target: String,
    pub loading: bool,
}

pub struct Bridge<H, T> {
    router: CommandRouter,
    orchestrator: SceneLoadOrchestrator,
    reporter: LoadingProgressReporter,
    notifier: PlaybackStatusNotifier,
    host: H,
    timers: T,
}

impl<H: HostServices, T: TimerScheduler> Bridge<H, T> {
    pub fn new(ctx: OrchestratorContext, host: H, timers: T) -> Self {
        Self::from_orchestrator(SceneLoadOrchestrator::new(ctx), host, timers)
    }

    pub fn with_layouts(
        ctx: OrchestratorContext,
        layouts: Box<dyn LayoutSource + Send>,
        host: H,
        timers: T,
    ) -> Self {
        Self::from_orchestrator(SceneLoadOrchestrator::with_layouts(ctx, layouts), host, timers)
    }

    fn from_orchestrator(orchestrator: SceneLoadOrchestrator, host: H, timers: T) -> Self {
        Self {
            router: CommandRouter::new(),
            orchestrator,
            reporter: LoadingProgressReporter::new(),
            notifier: PlaybackStatusNotifier::new(),
            host,
            timers,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> SceneLoadState {
        self.orchestrator.state()
    }

    pub fn snapshot(&self) -> BridgeSnapshot {
        let ctx = self.orchestrator.context();
        BridgeSnapshot {
            state: self.orchestrator.state(),
            profile: ctx.profile,
            pending_target: ctx.pending_target.clone(),
            resolved_target: ctx.resolved_target().to_string(),
            loading: self.reporter.is_loading(),
        }
    }

    /// Handle one event. Returns the status message to send, if any.
    pub fn handle(&mut self, event: BridgeEvent) -> Option<OutgoingStatusMessage> {
        match event {
            BridgeEvent::Remote(raw) => {
                self.router.route(&raw, &mut self.host);
                None
            }
            BridgeEvent::Lifecycle(LifecycleEvent::SceneOpened) => {
                let transition = self
                    .orchestrator
                    .on_scene_opened(&mut self.host, &mut self.timers);
                self.after(transition);
                None
            }
            BridgeEvent::Lifecycle(event) => self.notifier.notify(event),
            BridgeEvent::Tick => self.reporter.on_tick(&self.host),
            BridgeEvent::TimerFired(token) => {
                let transition = self.orchestrator.on_timer_fired(token, &mut self.host);
                self.after(transition);
                None
            }
            BridgeEvent::Control(request) => {
                self.control(request);
                None
            }
            BridgeEvent::HostConnected => {
                let profile = self.orchestrator.context().profile;
                let applied = apply_settings(&mut self.host, profile.startup_settings());
                info!(profile = %profile, applied, "Scene host connected");
                None
            }
        }
    }

    fn control(&mut self, request: ControlRequest) {
        debug!(request = ?request, "Control request");
        let transition = match request {
            ControlRequest::SetUsd(path) => {
                self.orchestrator.set_usd(path);
                Transition::Unchanged
            }
            ControlRequest::LoadTarget => self.orchestrator.load_target(&mut self.host),
            ControlRequest::ResetStage => self.orchestrator.reset_stage(&mut self.host),
            ControlRequest::RestoreLayout => {
                self.orchestrator.restore_layout(&mut self.host);
                Transition::Unchanged
            }
        };
        self.after(transition);
    }

    fn after(&mut self, transition: Transition) {
        if let Transition::LoadIssued(_) = transition {
            self.reporter.arm();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use crate::host::{LoadCounters, PlaybackCommand};
    use crate::message::PlaybackStatus;
    use crate::timer::fake::ManualTimers;
    use serde_json::json;

    fn bridge(stage: &str) -> Bridge<FakeHost, ManualTimers> {
        let ctx = OrchestratorContext {
            pending_target: "/assets/demo.usd".to_string(),
            ..Default::default()
        };
        Bridge::new(ctx, FakeHost::with_stage(stage), ManualTimers::default())
    }

    #[test]
    fn test_placeholder_to_loaded_cycle() {
        let mut bridge = bridge("anon:World0.usd");

        // Initial stage had nothing to load
        assert_eq!(
            bridge.handle(BridgeEvent::Tick),
            Some(OutgoingStatusMessage::FileLoadingProgress { progress: 1.0 })
        );
        assert_eq!(bridge.handle(BridgeEvent::Tick), None);

        bridge.handle(BridgeEvent::Lifecycle(LifecycleEvent::SceneOpened));
        let (_, token) = bridge.timers.scheduled[0];
        bridge.handle(BridgeEvent::TimerFired(token));
        assert_eq!(bridge.host().opened, vec!["/assets/demo.usd".to_string()]);
        assert!(bridge.snapshot().loading);

        bridge.host_mut().counters = LoadCounters::new(3, 10);
        assert_eq!(
            bridge.handle(BridgeEvent::Tick),
            Some(OutgoingStatusMessage::FileLoadingProgress { progress: 0.3 })
        );
        bridge.host_mut().counters = LoadCounters::new(10, 10);
        assert_eq!(
            bridge.handle(BridgeEvent::Tick),
            Some(OutgoingStatusMessage::FileLoadingProgress { progress: 1.0 })
        );
        bridge.host_mut().counters = LoadCounters::new(0, 0);
        assert_eq!(bridge.handle(BridgeEvent::Tick), None);

        bridge.host_mut().active_url = Some("/assets/demo.usd".to_string());
        bridge.handle(BridgeEvent::Lifecycle(LifecycleEvent::SceneOpened));
        assert_eq!(bridge.state(), SceneLoadState::Ready);
    }

    #[test]
    fn test_remote_actions_and_status() {
        let mut bridge = bridge("/assets/demo.usd");
        let raw = json!({ "message": r#"{"actionType":"pause"}"# }).to_string();
        assert_eq!(bridge.handle(BridgeEvent::Remote(raw.into_bytes())), None);
        assert_eq!(bridge.host().commands, vec![PlaybackCommand::PausePlayback]);

        assert_eq!(
            bridge.handle(BridgeEvent::Lifecycle(LifecycleEvent::SimulationStopped)),
            Some(OutgoingStatusMessage::PlaybackStatusChanged {
                status: PlaybackStatus::Paused
            })
        );
    }

    #[test]
    fn test_control_requests() {
        let mut bridge = bridge("/assets/demo.usd");
        bridge.handle(BridgeEvent::Tick);
        assert!(!bridge.snapshot().loading);

        bridge.handle(BridgeEvent::Control(ControlRequest::SetUsd("/assets/other.usd".into())));
        assert_eq!(bridge.snapshot().resolved_target, "/assets/other.usd");

        bridge.handle(BridgeEvent::Control(ControlRequest::LoadTarget));
        bridge.handle(BridgeEvent::Control(ControlRequest::ResetStage));
        assert_eq!(
            bridge.host().opened,
            vec!["/assets/other.usd".to_string(), crate::EMPTY_STAGE.to_string()]
        );
        assert!(bridge.snapshot().loading);
        assert_eq!(bridge.state(), SceneLoadState::LoadingTarget);
    }

    #[test]
    fn test_host_connected_applies_startup_settings() {
        let ctx = OrchestratorContext {
            profile: InterfaceProfile::Ar,
            ..Default::default()
        };
        let mut bridge = Bridge::new(ctx, FakeHost::default(), ManualTimers::default());
        bridge.handle(BridgeEvent::HostConnected);
        assert_eq!(bridge.host().settings.len(), 10);
    }

    #[test]
    fn test_snapshot_serializes_state_names() {
        let bridge = bridge("anon:World0.usd");
        let value = serde_json::to_value(bridge.snapshot()).unwrap();
        assert_eq!(value["state"], "idle");
        assert_eq!(value["profile"], "screen");
        assert_eq!(value["resolved_target"], "/assets/demo.usd");
    }
}
