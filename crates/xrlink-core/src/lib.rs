//! xrlink Core - Remote control and telemetry bridge for a live 3D scene host
//!
//! This crate holds the coordination logic of the bridge:
//! - Codec for the JSON control/status envelopes
//! - Command routing from remote actions to playback commands
//! - Scene-load sequencing (placeholder stage, delayed target load, layout restore)
//! - Per-tick loading progress and playback status reporting
//!
//! All host access goes through the traits in [`host`]; the daemon crate
//! provides the concrete transport.

pub mod bridge;
pub mod error;
pub mod host;
pub mod layout;
pub mod message;
pub mod orchestrator;
pub mod profile;
pub mod progress;
pub mod router;
pub mod status;
pub mod subscription;
pub mod timer;

pub use bridge::{Bridge, BridgeEvent, BridgeSnapshot, ControlRequest};
pub use error::BridgeError;
pub use host::{
    HostError, HostServices, LayoutRestorer, LifecycleEvent, LoadCounters, PlaybackCommand,
    PlaybackControl, SceneHost, SettingValue,
};
pub use layout::{FileLayoutSource, LayoutError, LayoutSource};
pub use message::{
    ActionType, ControlMessage, DecodeError, OutgoingStatusMessage, PlaybackStatus,
};
pub use orchestrator::{
    OrchestratorContext, SceneLoadOrchestrator, SceneLoadState, Transition, DEFAULT_USD,
    EMPTY_STAGE,
};
pub use profile::InterfaceProfile;
pub use progress::LoadingProgressReporter;
pub use router::CommandRouter;
pub use status::PlaybackStatusNotifier;
pub use subscription::{SubscriptionHandle, Subscriptions};
pub use timer::{TimerScheduler, TimerToken};
