//! Domain models for DHCP lease observation.
//!
//! These types are independent of capture and process-spawning concerns.

mod dhcp;
mod lease;

pub use dhcp::DhcpMessageType;
pub use lease::{
    format_mac, DecodeOutcome, Layer, LeaseObservation, Rejection, UNKNOWN_HOSTNAME,
};
