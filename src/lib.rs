//! bm-dhcp-tap - DHCP ACK sniffer for bare-metal provisioning.
//!
//! Watches an interface for server-to-client DHCPACKs and runs a hook with
//! the leased IP, client MAC and hostname of each one, without touching the
//! DHCP server itself.
//!
//! The pieces, leaves first:
//! - [`capture`]: where raw frames come from
//! - [`parser`]: frame to [`domain::LeaseObservation`] decoding
//! - [`dispatch`]: what happens with each observation
//! - [`listener`]: the loop tying them together

pub mod capture;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod listener;
pub mod logging;
pub mod parser;

pub use capture::{FrameSource, PnetCapture, Receive, ReplayCapture};
pub use config::Config;
pub use dispatch::{HookDispatcher, LeaseDispatcher};
pub use domain::{DecodeOutcome, LeaseObservation, Rejection};
pub use error::{CaptureError, ConfigError, DispatchError};
pub use listener::{LeaseListener, ListenerState, ListenerStats};
pub use parser::{AckDecoder, OptionTable};
