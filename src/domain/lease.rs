//! Lease observations and the reasons a frame is not one.

use std::fmt;
use std::net::Ipv4Addr;

use macaddr::MacAddr6;

use super::DhcpMessageType;

/// Placeholder hostname used when a DHCPACK carries no option 12.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// A lease handed out by a DHCP server, as seen in one DHCPACK frame.
///
/// Built per accepted frame and consumed by the dispatcher straight away;
/// nothing keeps it around afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseObservation {
    /// 'Your' IP address (yiaddr) assigned to the client
    pub ip: Ipv4Addr,
    /// First six bytes of chaddr
    pub mac: MacAddr6,
    /// Option 12, or [`UNKNOWN_HOSTNAME`]
    pub hostname: String,
}

impl LeaseObservation {
    pub fn new(ip: Ipv4Addr, mac: MacAddr6, hostname: impl Into<String>) -> Self {
        Self {
            ip,
            mac,
            hostname: hostname.into(),
        }
    }

    /// Lowercase colon-separated rendering (aa:bb:cc:dd:ee:ff).
    pub fn mac_string(&self) -> String {
        format_mac(self.mac.as_bytes())
    }
}

impl fmt::Display for LeaseObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IP={:<15}  MAC={}  HOST={}",
            self.ip.to_string(),
            self.mac_string(),
            self.hostname
        )
    }
}

/// Format hardware address bytes as lowercase colon-hex.
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Protocol layer at which a frame ran out of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Ethernet,
    Ipv4,
    Udp,
    Bootp,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethernet => write!(f, "ethernet"),
            Self::Ipv4 => write!(f, "ipv4"),
            Self::Udp => write!(f, "udp"),
            Self::Bootp => write!(f, "bootp"),
        }
    }
}

/// Why a frame was not accepted as a DHCPACK.
///
/// Rejections are the normal case for almost all traffic and carry no
/// side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("frame truncated at {0} layer")]
    Truncated(Layer),

    #[error("ethertype {0:#06x} is not IPv4")]
    NotIpv4(u16),

    #[error("IP protocol {0} is not UDP")]
    NotUdp(u8),

    #[error("UDP ports {src}->{dst} are not a server-to-client DHCP flow")]
    WrongPorts { src: u16, dst: u16 },

    #[error("BOOTP op {0} is not BOOTREPLY")]
    NotBootReply(u8),

    #[error("missing DHCP magic cookie")]
    BadMagicCookie,

    #[error("DHCP message type {} is not ACK", message_type_name(.0))]
    NotAck(Option<DhcpMessageType>),
}

fn message_type_name(message_type: &Option<DhcpMessageType>) -> String {
    match message_type {
        Some(t) => t.to_string(),
        None => "none".to_string(),
    }
}

/// Result of decoding one raw frame.
pub type DecodeOutcome = Result<LeaseObservation, Rejection>;
