//! DHCP message type as carried in option 53.

use std::fmt;

/// RFC 2131 message types. The discriminant is the option 53 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DhcpMessageType {
    Discover = 1,
    Offer = 2,
    Request = 3,
    Decline = 4,
    Ack = 5,
    Nak = 6,
    Release = 7,
    Inform = 8,
}

impl DhcpMessageType {
    const ALL: [Self; 8] = [
        Self::Discover,
        Self::Offer,
        Self::Request,
        Self::Decline,
        Self::Ack,
        Self::Nak,
        Self::Release,
        Self::Inform,
    ];

    /// Wire value of option 53.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ack(self) -> bool {
        self == Self::Ack
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Discover => "DISCOVER",
            Self::Offer => "OFFER",
            Self::Request => "REQUEST",
            Self::Decline => "DECLINE",
            Self::Ack => "ACK",
            Self::Nak => "NAK",
            Self::Release => "RELEASE",
            Self::Inform => "INFORM",
        }
    }
}

impl TryFrom<u8> for DhcpMessageType {
    type Error = u8;

    /// Unknown codes hand the raw byte back.
    fn try_from(code: u8) -> Result<Self, u8> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for DhcpMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
