//! The receive-decode-dispatch loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capture::{FrameSource, Receive};
use crate::dispatch::LeaseDispatcher;
use crate::parser::AckDecoder;

/// Lifecycle of a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Running,
    Stopped,
}

/// Counters reported when the listener stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Frames handed to the decoder
    pub frames: u64,
    /// DHCPACKs decoded and dispatched
    pub leases: u64,
    /// Transient receive failures
    pub receive_errors: u64,
}

/// Watches a frame source for DHCPACKs and dispatches each one.
///
/// Owns the source for its whole lifetime and closes it on the way out.
/// Nothing carries over between frames: one bad frame, receive error or
/// failed dispatch never affects the next.
pub struct LeaseListener<S, D> {
    source: S,
    dispatcher: D,
    decoder: AckDecoder,
    running: Arc<AtomicBool>,
    state: ListenerState,
    stats: ListenerStats,
}

impl<S, D> LeaseListener<S, D>
where
    S: FrameSource,
    D: LeaseDispatcher,
{
    /// Create a listener. Clearing `running` stops it before its next receive.
    pub fn new(source: S, dispatcher: D, running: Arc<AtomicBool>) -> Self {
        Self {
            source,
            dispatcher,
            decoder: AckDecoder::new(),
            running,
            state: ListenerState::Running,
            stats: ListenerStats::default(),
        }
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Run until the running flag is cleared or the source closes.
    pub fn run(&mut self) -> ListenerStats {
        tracing::info!("Listening on {}", self.source.interface_name());

        while self.state == ListenerState::Running {
            if !self.running.load(Ordering::SeqCst) {
                tracing::info!("Interrupted, shutting down");
                self.state = ListenerState::Stopped;
                break;
            }
            self.poll_once();
        }

        self.source.close();
        tracing::info!(
            "Stopped listening on {}  frames={}  leases={}  receive_errors={}",
            self.source.interface_name(),
            self.stats.frames,
            self.stats.leases,
            self.stats.receive_errors
        );
        self.stats
    }

    /// Handle exactly one receive.
    fn poll_once(&mut self) {
        let frame = match self.source.next_frame() {
            Ok(Receive::Frame(frame)) => frame,
            Ok(Receive::Idle) => return,
            Ok(Receive::Closed) => {
                tracing::info!("Capture source closed, shutting down");
                self.state = ListenerState::Stopped;
                return;
            }
            Err(e) => {
                self.stats.receive_errors += 1;
                tracing::error!("recvfrom error: {}", e);
                return;
            }
        };

        self.stats.frames += 1;

        // Rejections are the bulk of traffic and are dropped silently
        let Ok(lease) = self.decoder.decode(frame) else {
            return;
        };

        self.stats.leases += 1;
        tracing::info!("DHCP ACK  {}", lease);
        self.dispatcher.dispatch(&lease);
    }
}
