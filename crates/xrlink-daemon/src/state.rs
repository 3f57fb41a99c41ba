//! Application state management

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{info, warn};
use xrlink_core::{Bridge, BridgeSnapshot, FileLayoutSource};

use crate::config::Config;
use crate::event_loop::{EventLoop, LoopEvent, TokioTimers};
use crate::host_link::HostLink;
use crate::protocol::HostCommand;

/// Shared application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Event queue feeding the bridge
    queue: mpsc::UnboundedSender<LoopEvent>,
    /// Encoded status messages for remote clients
    outbound: broadcast::Sender<String>,
    /// Commands for the scene host
    host_commands: broadcast::Sender<HostCommand>,
    snapshot: watch::Receiver<BridgeSnapshot>,
}

impl AppState {
    /// Create new application state along with the loop that drives it
    pub fn new(config: Config) -> (Arc<Self>, EventLoop) {
        let (queue, rx) = mpsc::unbounded_channel();
        let (outbound, _) = broadcast::channel(256);
        let (host_commands, _) = broadcast::channel(256);

        let layouts = FileLayoutSource::new(config.bridge.layout_file.clone());
        let bridge = Bridge::with_layouts(
            config.to_context(),
            Box::new(layouts),
            HostLink::new(host_commands.clone()),
            TokioTimers::new(queue.clone()),
        );
        let (snapshot_tx, snapshot) = watch::channel(bridge.snapshot());

        info!(
            profile = %config.bridge.interface_mode,
            usd = %bridge.snapshot().resolved_target,
            "Bridge initialized"
        );

        let event_loop = EventLoop::new(bridge, rx, outbound.clone(), snapshot_tx);
        let state = Arc::new(Self {
            config,
            queue,
            outbound,
            host_commands,
            snapshot,
        });
        (state, event_loop)
    }

    /// Queue an event for the bridge. Returns false once the loop has stopped.
    pub fn post(&self, event: LoopEvent) -> bool {
        if self.queue.send(event).is_err() {
            warn!("Event loop is not running, dropping event");
            return false;
        }
        true
    }

    /// Subscribe to outgoing status messages
    pub fn subscribe_status(&self) -> broadcast::Receiver<String> {
        self.outbound.subscribe()
    }

    /// Subscribe to commands addressed to the scene host
    pub fn subscribe_host_commands(&self) -> broadcast::Receiver<HostCommand> {
        self.host_commands.subscribe()
    }

    /// Number of connected scene hosts
    pub fn host_count(&self) -> usize {
        self.host_commands.receiver_count()
    }

    /// Get the latest bridge snapshot
    pub fn snapshot(&self) -> BridgeSnapshot {
        self.snapshot.borrow().clone()
    }
}
