//! Raw frame to lease observation decoding.
//!
//! Ethernet -> IPv4 -> UDP -> BOOTP -> DHCP options -> ACK filter.
//! Every stage checks its length before touching bytes, so decoding is
//! total over arbitrary input.

use std::net::Ipv4Addr;

use macaddr::MacAddr6;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::udp::UdpPacket;

use super::options::{option_codes, OptionTable};
use crate::domain::{
    DecodeOutcome, DhcpMessageType, Layer, LeaseObservation, Rejection, UNKNOWN_HOSTNAME,
};

/// DHCP magic cookie: 0x63825363
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// DHCP server port
pub const DHCP_SERVER_PORT: u16 = 67;
/// DHCP client port
pub const DHCP_CLIENT_PORT: u16 = 68;

const ETHERNET_HEADER_LEN: usize = 14;
const UDP_HEADER_LEN: usize = 8;

/// Fixed BOOTP header plus magic cookie; options start here.
const BOOTP_OPTIONS_OFFSET: usize = 240;

const BOOTREPLY: u8 = 2;

/// Decoder for server-to-client DHCPACK frames.
///
/// Stateless: the same bytes always give the same outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct AckDecoder;

impl AckDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode one link-layer frame.
    pub fn decode(&self, frame: &[u8]) -> DecodeOutcome {
        let bootp = Self::bootp_payload(frame)?;
        Self::decode_bootp(bootp)
    }

    /// Walk the link, network and transport headers down to the UDP payload.
    fn bootp_payload(frame: &[u8]) -> Result<&[u8], Rejection> {
        let ethernet = EthernetPacket::new(frame).ok_or(Rejection::Truncated(Layer::Ethernet))?;

        let ethertype = ethernet.get_ethertype();
        if ethertype != EtherTypes::Ipv4 {
            return Err(Rejection::NotIpv4(ethertype.0));
        }

        let ipv4 = Ipv4Packet::new(&frame[ETHERNET_HEADER_LEN..])
            .ok_or(Rejection::Truncated(Layer::Ipv4))?;

        let protocol = ipv4.get_next_level_protocol();
        if protocol != IpNextHeaderProtocols::Udp {
            return Err(Rejection::NotUdp(protocol.0));
        }

        // IHL is taken at face value, as the wire says
        let udp_offset = ETHERNET_HEADER_LEN + ipv4.get_header_length() as usize * 4;
        let udp = frame
            .get(udp_offset..)
            .and_then(UdpPacket::new)
            .ok_or(Rejection::Truncated(Layer::Udp))?;

        let (src, dst) = (udp.get_source(), udp.get_destination());
        if src != DHCP_SERVER_PORT || dst != DHCP_CLIENT_PORT {
            return Err(Rejection::WrongPorts { src, dst });
        }

        Ok(&frame[udp_offset + UDP_HEADER_LEN..])
    }

    /// Decode the BOOTP envelope and DHCP options of a server reply.
    fn decode_bootp(data: &[u8]) -> DecodeOutcome {
        if data.len() < BOOTP_OPTIONS_OFFSET {
            return Err(Rejection::Truncated(Layer::Bootp));
        }

        let op = data[0];
        if op != BOOTREPLY {
            return Err(Rejection::NotBootReply(op));
        }

        if data[236..240] != DHCP_MAGIC_COOKIE {
            return Err(Rejection::BadMagicCookie);
        }

        let yiaddr = Ipv4Addr::new(data[16], data[17], data[18], data[19]);

        // Always the first 6 bytes of chaddr, whatever hlen says
        let chaddr = MacAddr6::new(data[28], data[29], data[30], data[31], data[32], data[33]);

        let options = OptionTable::parse(data, BOOTP_OPTIONS_OFFSET);

        let message_type = options.message_type();
        if !message_type.is_some_and(DhcpMessageType::is_ack) {
            return Err(Rejection::NotAck(message_type));
        }

        let hostname = options
            .get(option_codes::HOSTNAME)
            .map(Self::decode_hostname)
            .unwrap_or_else(|| UNKNOWN_HOSTNAME.to_string());

        Ok(LeaseObservation::new(yiaddr, chaddr, hostname))
    }

    /// Option 12 as text; invalid UTF-8 is replaced, trailing NULs dropped.
    fn decode_hostname(raw: &[u8]) -> String {
        String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .to_string()
    }
}
