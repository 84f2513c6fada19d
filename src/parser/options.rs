//! DHCP option area parsing.
//!
//! Walks the type-length-value stream that follows the magic cookie.

use std::collections::HashMap;

use crate::domain::DhcpMessageType;

/// DHCP option codes
pub mod option_codes {
    pub const PAD: u8 = 0;
    pub const HOSTNAME: u8 = 12;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const END: u8 = 255;
}

/// Option code to raw value bytes, borrowed from the frame.
///
/// A later occurrence of the same code overwrites an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable<'a> {
    options: HashMap<u8, &'a [u8]>,
}

impl<'a> OptionTable<'a> {
    /// Parse options from `payload`, starting at `start`.
    ///
    /// Never fails: scanning stops at END, at the end of the buffer, or at
    /// the first option whose length byte or value would run past the end.
    /// Whatever was parsed up to that point is returned.
    pub fn parse(payload: &'a [u8], start: usize) -> Self {
        let mut options = HashMap::new();
        let mut offset = start;

        while offset < payload.len() {
            let code = payload[offset];

            if code == option_codes::END {
                break;
            }

            if code == option_codes::PAD {
                offset += 1;
                continue;
            }

            // Regular option: code + length + data
            if offset + 1 >= payload.len() {
                break;
            }

            let len = payload[offset + 1] as usize;
            let value_end = offset + 2 + len;

            if value_end > payload.len() {
                break;
            }

            options.insert(code, &payload[offset + 2..value_end]);
            offset = value_end;
        }

        Self { options }
    }

    /// Raw value of an option, if present.
    pub fn get(&self, code: u8) -> Option<&'a [u8]> {
        self.options.get(&code).copied()
    }

    pub fn contains(&self, code: u8) -> bool {
        self.options.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Option 53, only when it is exactly one byte naming a known type.
    pub fn message_type(&self) -> Option<DhcpMessageType> {
        match self.get(option_codes::MESSAGE_TYPE)? {
            [value] => DhcpMessageType::try_from(*value).ok(),
            _ => None,
        }
    }
}
