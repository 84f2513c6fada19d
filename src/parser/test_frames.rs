//! Synthetic Ethernet/IPv4/UDP/BOOTP frames for unit tests.

use super::ack_decoder::DHCP_MAGIC_COOKIE;

pub struct FrameBuilder {
    ethertype: u16,
    ihl: u8,
    protocol: u8,
    src_port: u16,
    dst_port: u16,
    op: u8,
    hlen: u8,
    yiaddr: [u8; 4],
    chaddr: [u8; 6],
    chaddr_tail: [u8; 10],
    cookie: [u8; 4],
    options: Vec<(u8, Vec<u8>)>,
    raw_options: Option<Vec<u8>>,
}

impl FrameBuilder {
    /// DHCPACK for 10.0.0.5 / aa:bb:cc:dd:ee:ff, no hostname.
    pub fn ack() -> Self {
        Self {
            ethertype: 0x0800,
            ihl: 5,
            protocol: 17,
            src_port: 67,
            dst_port: 68,
            op: 2,
            hlen: 6,
            yiaddr: [10, 0, 0, 5],
            chaddr: [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
            chaddr_tail: [0; 10],
            cookie: DHCP_MAGIC_COOKIE,
            options: vec![(53, vec![5])],
            raw_options: None,
        }
    }

    pub fn ethertype(mut self, ethertype: u16) -> Self {
        self.ethertype = ethertype;
        self
    }

    pub fn ihl(mut self, ihl: u8) -> Self {
        self.ihl = ihl;
        self
    }

    pub fn protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn ports(mut self, src: u16, dst: u16) -> Self {
        self.src_port = src;
        self.dst_port = dst;
        self
    }

    pub fn op(mut self, op: u8) -> Self {
        self.op = op;
        self
    }

    pub fn hlen(mut self, hlen: u8) -> Self {
        self.hlen = hlen;
        self
    }

    pub fn yiaddr(mut self, ip: [u8; 4]) -> Self {
        self.yiaddr = ip;
        self
    }

    pub fn chaddr(mut self, mac: [u8; 6]) -> Self {
        self.chaddr = mac;
        self
    }

    pub fn chaddr_tail(mut self, tail: &[u8; 10]) -> Self {
        self.chaddr_tail = *tail;
        self
    }

    pub fn cookie(mut self, cookie: [u8; 4]) -> Self {
        self.cookie = cookie;
        self
    }

    /// Replace the option 53 value.
    pub fn message_type(mut self, message_type: u8) -> Self {
        self.options.retain(|(code, _)| *code != 53);
        self.options.insert(0, (53, vec![message_type]));
        self
    }

    pub fn hostname(self, hostname: &str) -> Self {
        self.option(12, hostname.as_bytes())
    }

    pub fn option(mut self, code: u8, value: &[u8]) -> Self {
        self.options.push((code, value.to_vec()));
        self
    }

    /// Use these bytes verbatim as the option area (no END appended).
    pub fn raw_options(mut self, raw: &[u8]) -> Self {
        self.raw_options = Some(raw.to_vec());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bootp = vec![0u8; 236];
        bootp[0] = self.op;
        bootp[1] = 1;
        bootp[2] = self.hlen;
        bootp[4..8].copy_from_slice(&0x1234_5678u32.to_be_bytes());
        bootp[16..20].copy_from_slice(&self.yiaddr);
        bootp[20..24].copy_from_slice(&[10, 0, 0, 1]);
        bootp[28..34].copy_from_slice(&self.chaddr);
        bootp[34..44].copy_from_slice(&self.chaddr_tail);
        bootp.extend_from_slice(&self.cookie);

        match &self.raw_options {
            Some(raw) => bootp.extend_from_slice(raw),
            None => {
                for (code, value) in &self.options {
                    bootp.push(*code);
                    bootp.push(value.len() as u8);
                    bootp.extend_from_slice(value);
                }
                bootp.push(255);
            }
        }

        let mut udp = Vec::with_capacity(8 + bootp.len());
        udp.extend_from_slice(&self.src_port.to_be_bytes());
        udp.extend_from_slice(&self.dst_port.to_be_bytes());
        udp.extend_from_slice(&((8 + bootp.len()) as u16).to_be_bytes());
        udp.extend_from_slice(&[0, 0]);
        udp.extend_from_slice(&bootp);

        let header_len = self.ihl as usize * 4;
        let mut ip = vec![0u8; header_len.max(20)];
        ip[0] = 0x40 | (self.ihl & 0x0f);
        ip[2..4].copy_from_slice(&((header_len + udp.len()) as u16).to_be_bytes());
        ip[8] = 64;
        ip[9] = self.protocol;
        ip[12..16].copy_from_slice(&[10, 0, 0, 1]);
        ip[16..20].copy_from_slice(&[255, 255, 255, 255]);
        ip.extend_from_slice(&udp);

        let mut frame = vec![0xff; 6];
        frame.extend_from_slice(&[0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        frame.extend_from_slice(&self.ethertype.to_be_bytes());
        frame.extend_from_slice(&ip);
        frame
    }
}
