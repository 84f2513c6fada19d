//! Frame decoding module.
//!
//! Turns raw link-layer bytes into lease observations.

mod ack_decoder;
mod options;

#[cfg(test)]
pub(crate) mod test_frames;

pub use ack_decoder::{AckDecoder, DHCP_CLIENT_PORT, DHCP_MAGIC_COOKIE, DHCP_SERVER_PORT};
pub use options::{option_codes, OptionTable};
