//! pnet-based frame capture implementation.

use std::io;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};

use super::{FrameSource, Receive};
use crate::error::CaptureError;

/// How long a receive blocks before handing control back to the listener.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Large enough for any frame up to the 16-bit length limit.
const READ_BUFFER_SIZE: usize = 65536;

/// Promiscuous link-layer capture using the pnet library.
///
/// Sees every frame on the interface before any routing decision, which
/// requires root or CAP_NET_RAW.
pub struct PnetCapture {
    interface: NetworkInterface,
    rx: Option<Box<dyn DataLinkReceiver>>,
}

impl PnetCapture {
    /// Bind a capture channel on the named interface.
    pub fn open(interface_name: &str) -> Result<Self, CaptureError> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == interface_name)
            .ok_or_else(|| CaptureError::InterfaceNotFound(interface_name.to_string()))?;

        let config = Config {
            read_timeout: Some(READ_TIMEOUT),
            read_buffer_size: READ_BUFFER_SIZE,
            promiscuous: true,
            ..Config::default()
        };

        // The write half is never used; dropping it leaves the receiver intact
        let rx = match datalink::channel(&interface, config) {
            Ok(Channel::Ethernet(_tx, rx)) => rx,
            Ok(_) => {
                return Err(CaptureError::ChannelCreation(
                    "unsupported channel type".to_string(),
                ))
            }
            Err(e) => {
                let msg = e.to_string();
                if e.kind() == io::ErrorKind::PermissionDenied
                    || msg.contains("permission")
                    || msg.contains("Operation not permitted")
                {
                    return Err(CaptureError::InsufficientPermissions(
                        interface_name.to_string(),
                    ));
                }
                return Err(CaptureError::ChannelCreation(msg));
            }
        };

        Ok(Self {
            interface,
            rx: Some(rx),
        })
    }

    /// One line per interface, for `--list-interfaces`.
    pub fn list_interfaces() -> Vec<String> {
        datalink::interfaces().iter().map(describe).collect()
    }
}

fn describe(iface: &NetworkInterface) -> String {
    let state = match (iface.is_up(), iface.is_loopback()) {
        (true, true) => "up,loopback",
        (true, false) => "up",
        (false, _) => "down",
    };
    let mac = iface
        .mac
        .map(|mac| mac.to_string())
        .unwrap_or_else(|| "-".to_string());
    let addrs = iface
        .ips
        .iter()
        .map(|net| net.to_string())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{:<16} {:<12} {}  {}",
        iface.name,
        state,
        mac,
        if addrs.is_empty() { "-" } else { &addrs }
    )
}

impl FrameSource for PnetCapture {
    fn next_frame(&mut self) -> io::Result<Receive<'_>> {
        let Some(rx) = self.rx.as_mut() else {
            return Ok(Receive::Closed);
        };

        match rx.next() {
            Ok(frame) => Ok(Receive::Frame(frame)),
            Err(e) if is_idle(&e) => Ok(Receive::Idle),
            Err(e) => Err(e),
        }
    }

    fn close(&mut self) {
        self.rx = None;
    }

    fn interface_name(&self) -> &str {
        &self.interface.name
    }
}

/// Timeouts and signal interruptions just mean "nothing yet".
fn is_idle(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
