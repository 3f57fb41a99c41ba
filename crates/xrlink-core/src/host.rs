//! Collaborator interfaces implemented by the scene host integration
//!
//! The bridge never talks to a renderer directly. Everything it needs from the
//! outside world goes through these traits, which keeps the coordination logic
//! testable with in-memory fakes.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Scene URLs with this prefix denote the ephemeral placeholder stage
pub const PLACEHOLDER_PREFIX: &str = "anon:";

/// Whether a scene URL names the placeholder stage rather than a real asset
pub fn is_placeholder(url: &str) -> bool {
    url.starts_with(PLACEHOLDER_PREFIX)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Scene host is not connected")]
    Disconnected,
    #[error("Scene host rejected request: {0}")]
    Rejected(String),
}

/// Snapshot of the host's asset-loading counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadCounters {
    pub loaded_count: u64,
    pub total_count: u64,
}

impl LoadCounters {
    pub fn new(loaded_count: u64, total_count: u64) -> Self {
        Self {
            loaded_count,
            total_count,
        }
    }
}

/// Commands understood by the host's playback toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    BeginPlayback,
    PausePlayback,
    HaltPlayback,
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackCommand::BeginPlayback => "begin playback",
            PlaybackCommand::PausePlayback => "pause playback",
            PlaybackCommand::HaltPlayback => "halt playback",
        };
        f.write_str(name)
    }
}

/// Value written to a host setting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Float(f64),
    Text(&'static str),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Scene lifecycle notification emitted by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A stage finished opening; query the host for its URL
    SceneOpened,
    PlayStarted,
    PlayStopped,
    SimulationStopped,
}

/// Stage access
pub trait SceneHost {
    /// Open the stage at `path`, replacing the current one
    fn open_scene(&mut self, path: &str) -> Result<(), HostError>;

    /// Current loading counters
    fn load_counters(&self) -> LoadCounters;

    /// URL of the active stage, `None` if no stage is available
    fn active_scene_path(&self) -> Option<String>;

    /// Whether a prim exists at `path` on the active stage
    fn has_prim(&self, path: &str) -> bool;

    /// Define a camera prim on the session layer of the active stage
    fn define_camera(&mut self, path: &str) -> Result<(), HostError>;

    /// Write a host setting
    fn set_setting(&mut self, key: &str, value: SettingValue) -> Result<(), HostError>;
}

/// Playback toolbar access
pub trait PlaybackControl {
    fn execute(&mut self, command: PlaybackCommand) -> Result<(), HostError>;
}

/// Restores a UI arrangement from a parsed layout description
pub trait LayoutRestorer {
    fn restore_layout(&mut self, layout: &Value) -> Result<(), HostError>;
}

/// Everything the bridge needs from the host in one bound
pub trait HostServices: SceneHost + PlaybackControl + LayoutRestorer {}

impl<T: SceneHost + PlaybackControl + LayoutRestorer> HostServices for T {}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory host used by unit tests across the crate

    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Default)]
    pub struct FakeHost {
        pub active_url: Option<String>,
        pub counters: LoadCounters,
        pub opened: Vec<String>,
        pub fail_open: bool,
        pub fail_camera: bool,
        pub fail_settings: bool,
        pub fail_layout: bool,
        pub prims: BTreeSet<String>,
        pub camera_calls: usize,
        pub settings: Vec<(String, SettingValue)>,
        pub commands: Vec<PlaybackCommand>,
        pub layouts: Vec<Value>,
    }

    impl FakeHost {
        pub fn with_stage(url: &str) -> Self {
            Self {
                active_url: Some(url.to_string()),
                ..Default::default()
            }
        }
    }

    impl SceneHost for FakeHost {
        fn open_scene(&mut self, path: &str) -> Result<(), HostError> {
            if self.fail_open {
                return Err(HostError::Rejected("open refused".to_string()));
            }
            self.opened.push(path.to_string());
            Ok(())
        }

        fn load_counters(&self) -> LoadCounters {
            self.counters
        }

        fn active_scene_path(&self) -> Option<String> {
            self.active_url.clone()
        }

        fn has_prim(&self, path: &str) -> bool {
            self.prims.contains(path)
        }

        fn define_camera(&mut self, path: &str) -> Result<(), HostError> {
            self.camera_calls += 1;
            if self.fail_camera {
                return Err(HostError::Rejected("no stage".to_string()));
            }
            self.prims.insert(path.to_string());
            Ok(())
        }

        fn set_setting(&mut self, key: &str, value: SettingValue) -> Result<(), HostError> {
            if self.fail_settings {
                return Err(HostError::Rejected(format!("setting {} refused", key)));
            }
            self.settings.push((key.to_string(), value));
            Ok(())
        }
    }

    impl PlaybackControl for FakeHost {
        fn execute(&mut self, command: PlaybackCommand) -> Result<(), HostError> {
            self.commands.push(command);
            Ok(())
        }
    }

    impl LayoutRestorer for FakeHost {
        fn restore_layout(&mut self, layout: &Value) -> Result<(), HostError> {
            if self.fail_layout {
                return Err(HostError::Disconnected);
            }
            self.layouts.push(layout.clone());
            Ok(())
        }
    }
}
