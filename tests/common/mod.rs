//! Frame construction shared by the integration tests.

#![allow(dead_code)]

pub const MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// Fields of a synthetic server-to-client BOOTP frame.
#[derive(Clone)]
pub struct Frame {
    pub ethertype: u16,
    pub protocol: u8,
    pub src_port: u16,
    pub dst_port: u16,
    pub op: u8,
    pub yiaddr: [u8; 4],
    pub chaddr: [u8; 6],
    pub cookie: [u8; 4],
    /// Raw option area, END included if wanted
    pub options: Vec<u8>,
}

impl Frame {
    /// DHCPACK for 10.0.0.5 / aa:bb:cc:dd:ee:ff with hostname "node1".
    pub fn ack() -> Self {
        let mut options = vec![53, 1, 5, 12, 5];
        options.extend_from_slice(b"node1");
        options.push(255);

        Self {
            ethertype: 0x0800,
            protocol: 17,
            src_port: 67,
            dst_port: 68,
            op: 2,
            yiaddr: [10, 0, 0, 5],
            chaddr: [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
            cookie: MAGIC_COOKIE,
            options,
        }
    }

    /// Same as `ack` but with option 53 set to DISCOVER.
    pub fn discover() -> Self {
        let mut frame = Self::ack();
        frame.options[2] = 1;
        frame
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut bootp = vec![0u8; 236];
        bootp[0] = self.op;
        bootp[1] = 1;
        bootp[2] = 6;
        bootp[16..20].copy_from_slice(&self.yiaddr);
        bootp[28..34].copy_from_slice(&self.chaddr);
        bootp.extend_from_slice(&self.cookie);
        bootp.extend_from_slice(&self.options);

        let udp_len = (8 + bootp.len()) as u16;
        let mut frame = Vec::with_capacity(14 + 20 + udp_len as usize);

        // Ethernet
        frame.extend_from_slice(&[0xff; 6]);
        frame.extend_from_slice(&[0x52, 0x54, 0x00, 0xab, 0xcd, 0xef]);
        frame.extend_from_slice(&self.ethertype.to_be_bytes());

        // IPv4, no options
        let mut ip = [0u8; 20];
        ip[0] = 0x45;
        ip[2..4].copy_from_slice(&(20 + udp_len).to_be_bytes());
        ip[8] = 64;
        ip[9] = self.protocol;
        ip[12..16].copy_from_slice(&[10, 0, 0, 1]);
        ip[16..20].copy_from_slice(&[255, 255, 255, 255]);
        frame.extend_from_slice(&ip);

        // UDP
        frame.extend_from_slice(&self.src_port.to_be_bytes());
        frame.extend_from_slice(&self.dst_port.to_be_bytes());
        frame.extend_from_slice(&udp_len.to_be_bytes());
        frame.extend_from_slice(&[0, 0]);

        frame.extend_from_slice(&bootp);
        frame
    }
}

/// A minimal ARP request frame.
pub fn arp_frame() -> Vec<u8> {
    let mut frame = vec![0xff; 6];
    frame.extend_from_slice(&[0x52, 0x54, 0x00, 0xab, 0xcd, 0xef]);
    frame.extend_from_slice(&[0x08, 0x06]);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    frame.extend_from_slice(&[0u8; 20]);
    frame
}
