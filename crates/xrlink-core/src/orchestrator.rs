//! Scene-load state machine
//!
//! The host starts on an anonymous placeholder stage. Once that stage has
//! opened, the orchestrator waits one delay interval and then opens the
//! pending target. When a named stage opens (either the target, or an asset the
//! host was launched with) the profile's UI layout is restored.
//!
//! ```text
//! Idle ──placeholder──▶ PlaceholderOpen ──arm──▶ DelayedLoadScheduled
//!   │                          ▲                        │ timer
//!   │ named                    │ placeholder            ▼
//!   └──────────▶ Ready ◀──named── LoadingTarget ◀── open target
//! ```

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::BridgeError;
use crate::host::{is_placeholder, HostServices, SceneHost};
use crate::layout::{FileLayoutSource, LayoutSource};
use crate::profile::{apply_settings, InterfaceProfile, AR_CAMERA_PATH};
use crate::timer::{TimerScheduler, TimerToken, TokenSequence};

/// Asset opened when no target was configured
pub const DEFAULT_USD: &str = "usd/JetEngine/jetengine.usd";

/// Empty stage used to reset the host
pub const EMPTY_STAGE: &str = "usd/Empty/Stage.usd";

/// Delay between the placeholder opening and the target load
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneLoadState {
    Idle,
    PlaceholderOpen,
    DelayedLoadScheduled { token: TimerToken },
    LoadingTarget,
    Ready,
}

impl SceneLoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneLoadState::Idle => "idle",
            SceneLoadState::PlaceholderOpen => "placeholder_open",
            SceneLoadState::DelayedLoadScheduled { .. } => "delayed_load_scheduled",
            SceneLoadState::LoadingTarget => "loading_target",
            SceneLoadState::Ready => "ready",
        }
    }
}

impl fmt::Display for SceneLoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SceneLoadState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Result of feeding one event to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    DelayArmed(TimerToken),
    /// An open-scene call was issued for this path
    LoadIssued(String),
    LayoutApplied,
}

/// Startup configuration shared by the bridge components
#[derive(Debug, Clone)]
pub struct OrchestratorContext {
    pub profile: InterfaceProfile,
    /// Empty means "use `default_target`"
    pub pending_target: String,
    pub default_target: String,
    pub empty_stage: String,
    pub load_delay: Duration,
}

impl Default for OrchestratorContext {
    fn default() -> Self {
        Self {
            profile: InterfaceProfile::default(),
            pending_target: String::new(),
            default_target: DEFAULT_USD.to_string(),
            empty_stage: EMPTY_STAGE.to_string(),
            load_delay: DEFAULT_LOAD_DELAY,
        }
    }
}

impl OrchestratorContext {
    /// Path the next delayed load will open
    pub fn resolved_target(&self) -> &str {
        if self.pending_target.trim().is_empty() {
            &self.default_target
        } else {
            &self.pending_target
        }
    }
}

pub struct SceneLoadOrchestrator {
    ctx: OrchestratorContext,
    state: SceneLoadState,
    tokens: TokenSequence,
    layouts: Box<dyn LayoutSource + Send>,
}

impl SceneLoadOrchestrator {
    pub fn new(ctx: OrchestratorContext) -> Self {
        Self::with_layouts(ctx, Box::new(FileLayoutSource::default()))
    }

    pub fn with_layouts(ctx: OrchestratorContext, layouts: Box<dyn LayoutSource + Send>) -> Self {
        Self {
            ctx,
            state: SceneLoadState::Idle,
            tokens: TokenSequence::default(),
            layouts,
        }
    }

    pub fn state(&self) -> SceneLoadState {
        self.state
    }

    pub fn context(&self) -> &OrchestratorContext {
        &self.ctx
    }

    /// Replace the pending load target. Empty selects the default asset.
    pub fn set_usd(&mut self, path: impl Into<String>) {
        self.ctx.pending_target = path.into();
        info!(
            usd = %self.ctx.pending_target,
            resolved = %self.ctx.resolved_target(),
            "Pending load target updated"
        );
    }

    /// Handle a scene-opened notification
    pub fn on_scene_opened<H, T>(&mut self, host: &mut H, timers: &mut T) -> Transition
    where
        H: HostServices + ?Sized,
        T: TimerScheduler + ?Sized,
    {
        let Some(url) = host.active_scene_path() else {
            warn!(state = %self.state, "Stage opened but the host reports no active stage");
            return Transition::Unchanged;
        };
        info!(stage = %url, state = %self.state, "Stage has fully loaded");

        if is_placeholder(&url) {
            self.state = SceneLoadState::PlaceholderOpen;
            let token = self.tokens.next_token();
            timers.schedule(self.ctx.load_delay, token);
            self.state = SceneLoadState::DelayedLoadScheduled { token };
            info!(
                delay_ms = self.ctx.load_delay.as_millis() as u64,
                token = %token,
                "Placeholder stage open, scheduling target load"
            );
            return Transition::DelayArmed(token);
        }

        if self.state != SceneLoadState::LoadingTarget {
            debug!(stage = %url, "Named stage opened without a pending load, skipping delay");
        }
        self.restore_layout(host);
        self.state = SceneLoadState::Ready;
        Transition::LayoutApplied
    }

    /// Handle expiry of a delay timer
    pub fn on_timer_fired<H>(&mut self, token: TimerToken, host: &mut H) -> Transition
    where
        H: HostServices + ?Sized,
    {
        match self.state {
            SceneLoadState::DelayedLoadScheduled { token: armed } if armed == token => {}
            _ => {
                debug!(token = %token, state = %self.state, "Ignoring superseded load timer");
                return Transition::Unchanged;
            }
        }

        match host.active_scene_path() {
            Some(url) if is_placeholder(&url) => {}
            other => {
                info!(
                    stage = ?other,
                    "Active stage is no longer the placeholder, skipping delayed load"
                );
                return Transition::Unchanged;
            }
        }

        let target = self.ctx.resolved_target().to_string();
        self.open_scene_at(&target, host)
    }

    /// Open the pending target immediately
    pub fn load_target<H: HostServices + ?Sized>(&mut self, host: &mut H) -> Transition {
        let target = self.ctx.resolved_target().to_string();
        self.open_scene_at(&target, host)
    }

    /// Open the empty stage. The state is left as is until the stage reports
    /// opened, since the empty stage is not a load target.
    pub fn reset_stage<H: HostServices + ?Sized>(&mut self, host: &mut H) -> Transition {
        let empty = self.ctx.empty_stage.clone();
        self.issue_open(&empty, host)
    }

    /// Issue an open-scene call. Failures leave the state untouched.
    pub fn open_scene_at<H: HostServices + ?Sized>(&mut self, path: &str, host: &mut H) -> Transition {
        let transition = self.issue_open(path, host);
        if let Transition::LoadIssued(_) = transition {
            self.state = SceneLoadState::LoadingTarget;
        }
        transition
    }

    fn issue_open<H: HostServices + ?Sized>(&mut self, path: &str, host: &mut H) -> Transition {
        let path = path.trim();
        if path.is_empty() {
            let e = BridgeError::InvalidLoadTarget(path.to_string());
            error!(error = %e, state = %self.state, "Refusing to load");
            return Transition::Unchanged;
        }

        info!(usd = %path, profile = %self.ctx.profile, "Loading USD file");
        if let Err(e) = host.open_scene(path) {
            let e = BridgeError::SceneOpenFailure {
                path: path.to_string(),
                reason: e.to_string(),
            };
            error!(error = %e, state = %self.state, "Scene open failed");
            return Transition::Unchanged;
        }

        if self.ctx.profile == InterfaceProfile::Ar {
            if let Err(e) = ensure_camera(host, AR_CAMERA_PATH) {
                warn!(error = %e, "Continuing without AR camera");
            }
            info!("Applying AR settings after load");
            apply_settings(host, self.ctx.profile.post_load_settings());
        }

        Transition::LoadIssued(path.to_string())
    }

    /// Restore the profile's layout. Returns whether a layout was applied.
    pub fn restore_layout<H: HostServices + ?Sized>(&self, host: &mut H) -> bool {
        let profile = self.ctx.profile;
        let layout = match self.layouts.read_layout(profile) {
            Ok(layout) => layout,
            Err(e) => {
                let e = BridgeError::LayoutReadFailure {
                    profile: profile.to_string(),
                    path: self.layouts.location(profile),
                    reason: e.to_string(),
                };
                warn!(error = %e, "Keeping current layout");
                return false;
            }
        };

        match host.restore_layout(&layout) {
            Ok(()) => {
                info!(path = %self.layouts.location(profile), "Layout restored");
                true
            }
            Err(e) => {
                warn!(error = %e, "Layout restore failed");
                false
            }
        }
    }
}

/// Make sure a camera prim exists at `path`. Returns whether one was created.
pub fn ensure_camera<H: SceneHost + ?Sized>(host: &mut H, path: &str) -> Result<bool, BridgeError> {
    if host.has_prim(path) {
        info!(camera = %path, "Camera already exists");
        return Ok(false);
    }

    info!(camera = %path, "Camera not found, adding it to the session layer");
    host.define_camera(path)
        .map_err(|e| BridgeError::CameraCreationFailure {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    Ok(true)
}
