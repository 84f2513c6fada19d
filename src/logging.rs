//! Log fan-out: stdout, a log file and, optionally, remote syslog.
//!
//! Every line carries a UTC timestamp, the local hostname and the pid:
//!
//! ```text
//! 2026-01-15T12:00:00Z pxe-gw 4242 INFORMATION DHCP ACK  IP=10.0.0.5 ...
//! ```

use std::fmt::{self, Write as _};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::{Context as LayerContext, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Syslog facility "user".
const SYSLOG_FACILITY_USER: u8 = 1;

/// Keeps the background log file writer alive. Drop it only at exit.
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Install the process-wide subscriber. Call once, at startup.
pub fn init(config: &Config) -> Result<LogGuard> {
    let hostname = local_hostname();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Rotation is left to logrotate
    let file_appender = open_log_file(&config.log_file)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let syslog = match &config.syslog_server {
        Some(server) => Some(
            SyslogLayer::connect(server, config.syslog_port, hostname.clone())
                .with_context(|| format!("Failed to reach syslog server {}", server))?,
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(DaemonFormat::new(hostname.clone()))
                .with_writer(io::stdout),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(DaemonFormat::new(hostname))
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(syslog)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(LogGuard { _file: guard })
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("LOG_FILE has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Hostname used to tag every log line.
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Daemon-style level names.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFORMATION",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// `TIMESTAMP HOSTNAME PID LEVEL message` line format.
pub struct DaemonFormat {
    hostname: String,
    pid: u32,
}

impl DaemonFormat {
    pub fn new(hostname: String) -> Self {
        Self {
            hostname,
            pid: std::process::id(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for DaemonFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} {} {} {} ",
            Utc::now().format(TIMESTAMP_FORMAT),
            self.hostname,
            self.pid,
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Sends each event as one UDP datagram: `<PRI>HOSTNAME PID LEVEL message`.
pub struct SyslogLayer {
    socket: UdpSocket,
    hostname: String,
    pid: u32,
}

impl SyslogLayer {
    pub fn connect(server: &str, port: u16, hostname: String) -> io::Result<Self> {
        let addr = (server, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address for syslog server"))?;

        let local: SocketAddr = if addr.is_ipv6() {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(addr)?;

        Ok(Self {
            socket,
            hostname,
            pid: std::process::id(),
        })
    }

    fn format(&self, level: &Level, message: &str) -> String {
        format!(
            "<{}>{} {} {} {}",
            syslog_priority(level),
            self.hostname,
            self.pid,
            level_name(level),
            message
        )
    }
}

impl<S: Subscriber> Layer<S> for SyslogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = self.format(event.metadata().level(), &visitor.finish());
        // Best effort; a send failure is dropped
        let _ = self.socket.send(line.as_bytes());
    }
}

fn syslog_priority(level: &Level) -> u8 {
    let severity = match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        Level::DEBUG | Level::TRACE => 7,
    };
    SYSLOG_FACILITY_USER * 8 + severity
}

/// Collects the message and any extra fields of an event into one line.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        self.message + &self.fields
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(&Level::INFO), "INFORMATION");
        assert_eq!(level_name(&Level::WARN), "WARNING");
        assert_eq!(level_name(&Level::ERROR), "ERROR");
    }

    #[test]
    fn test_syslog_priority_uses_user_facility() {
        assert_eq!(syslog_priority(&Level::ERROR), 11);
        assert_eq!(syslog_priority(&Level::WARN), 12);
        assert_eq!(syslog_priority(&Level::INFO), 14);
        assert_eq!(syslog_priority(&Level::DEBUG), 15);
    }

    #[test]
    fn test_daemon_format_line() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(DaemonFormat::new("pxe-gw".to_string()))
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("DHCP ACK  IP={}", "10.0.0.5");
        });

        let line = captured.contents();
        let parts: Vec<&str> = line.trim_end().splitn(5, ' ').collect();
        assert_eq!(parts.len(), 5);
        assert!(parts[0].ends_with('Z'));
        assert_eq!(parts[1], "pxe-gw");
        assert_eq!(parts[2], std::process::id().to_string());
        assert_eq!(parts[3], "INFORMATION");
        assert_eq!(parts[4], "DHCP ACK  IP=10.0.0.5");
    }

    #[test]
    fn test_syslog_layer_sends_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let layer = SyslogLayer::connect("127.0.0.1", port, "pxe-gw".to_string()).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(code = 7, "Hook script not found");
        });

        let mut buf = [0u8; 1024];
        let len = receiver.recv(&mut buf).unwrap();
        let datagram = std::str::from_utf8(&buf[..len]).unwrap();

        let expected = format!(
            "<11>pxe-gw {} ERROR Hook script not found code=7",
            std::process::id()
        );
        assert_eq!(datagram, expected);
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("tap.log");

        let appender = open_log_file(&path);
        assert!(appender.is_ok());
        assert!(dir.path().join("logs").is_dir());
    }
}
