//! The single event-processing task
//!
//! Every source (remote clients, the scene host, timers, the REST API) posts
//! into one unbounded queue. The loop drains it strictly in arrival order and
//! hands each event to the bridge before looking at the next one.

use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, trace};
use xrlink_core::message::encode_text;
use xrlink_core::{Bridge, BridgeEvent, BridgeSnapshot, TimerScheduler, TimerToken};

use crate::host_link::HostLink;
use crate::protocol::HostEvent;

/// Event accepted by the loop
#[derive(Debug, Clone, PartialEq)]
pub enum LoopEvent {
    Bridge(BridgeEvent),
    /// Raw host notification, applied to the host link first
    Host(HostEvent),
}

/// Timers that post their expiry back into the event queue
pub struct TokioTimers {
    queue: mpsc::UnboundedSender<LoopEvent>,
}

impl TokioTimers {
    pub fn new(queue: mpsc::UnboundedSender<LoopEvent>) -> Self {
        Self { queue }
    }
}

impl TimerScheduler for TokioTimers {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        let queue = self.queue.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(token = %token, "Timer expired");
            let _ = queue.send(LoopEvent::Bridge(BridgeEvent::TimerFired(token)));
        });
    }
}

pub type DaemonBridge = Bridge<HostLink, TokioTimers>;

pub struct EventLoop {
    bridge: DaemonBridge,
    rx: mpsc::UnboundedReceiver<LoopEvent>,
    outbound: broadcast::Sender<String>,
    snapshot: watch::Sender<BridgeSnapshot>,
}

impl EventLoop {
    pub fn new(
        bridge: DaemonBridge,
        rx: mpsc::UnboundedReceiver<LoopEvent>,
        outbound: broadcast::Sender<String>,
        snapshot: watch::Sender<BridgeSnapshot>,
    ) -> Self {
        Self {
            bridge,
            rx,
            outbound,
            snapshot,
        }
    }

    /// Handle one event to completion
    pub fn process(&mut self, event: LoopEvent) {
        let event = match event {
            LoopEvent::Bridge(event) => Some(event),
            LoopEvent::Host(event) => self.bridge.host_mut().apply(event),
        };

        if let Some(event) = event {
            if let Some(msg) = self.bridge.handle(event) {
                let text = encode_text(&msg);
                trace!(message = %text, "Sending status");
                // No connected client is fine, status is fire-and-forget
                let _ = self.outbound.send(text);
            }
        }

        let current = self.bridge.snapshot();
        self.snapshot.send_if_modified(|snapshot| {
            if *snapshot != current {
                debug!(state = %current.state, loading = current.loading, "Bridge state changed");
                *snapshot = current;
                true
            } else {
                false
            }
        });
    }

    /// Drain the queue until every sender is gone
    pub async fn run(mut self) {
        info!(state = %self.bridge.state(), "Event loop started");
        while let Some(event) = self.rx.recv().await {
            self.process(event);
        }
        info!("Event queue closed, event loop stopped");
    }
}
