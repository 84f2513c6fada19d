//! Frame source abstraction.
//!
//! This module defines the `FrameSource` trait (DIP) and provides a
//! pnet-based live capture plus an in-memory replay source. The listener
//! only ever sees the trait, so it can be driven by either.

mod pnet_capture;
mod replay;

pub use pnet_capture::PnetCapture;
pub use replay::ReplayCapture;

use std::io;

/// One outcome of waiting on a frame source.
#[derive(Debug, PartialEq, Eq)]
pub enum Receive<'a> {
    /// A raw link-layer frame, valid until the next call
    Frame(&'a [u8]),
    /// The read timeout elapsed without traffic
    Idle,
    /// The source has been torn down; no more frames will arrive
    Closed,
}

/// Trait for raw frame sources (Dependency Inversion Principle).
///
/// Implementations:
/// - `PnetCapture` for live promiscuous capture on an interface
/// - `ReplayCapture` for scripted frames in tests or offline replays
pub trait FrameSource: Send {
    /// Block until the next frame arrives, the read timeout elapses, or the
    /// source is closed.
    ///
    /// An `Err` is a transient receive failure; callers may keep reading.
    fn next_frame(&mut self) -> io::Result<Receive<'_>>;

    /// Release the underlying capture. Calling it twice is harmless.
    fn close(&mut self);

    /// Name of the interface (or replay label) frames come from.
    fn interface_name(&self) -> &str;
}
