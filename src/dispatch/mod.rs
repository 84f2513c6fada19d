//! Lease action dispatch.
//!
//! This module defines the `LeaseDispatcher` trait (ISP, DIP). The listener
//! hands every accepted observation to one dispatcher and moves on; what
//! the dispatcher does with it, and whether that succeeds, never feeds
//! back into the capture loop.

mod hook;

pub use hook::{reap_children_automatically, HookDispatcher};

use crate::domain::LeaseObservation;

/// Trait for reacting to lease observations.
pub trait LeaseDispatcher {
    /// Launch the action for one lease without waiting for it to finish.
    ///
    /// Failures are handled (logged) inside the implementation.
    fn dispatch(&self, lease: &LeaseObservation);
}
