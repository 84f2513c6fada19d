use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "/opt/bm-dhcp-tap/etc/bm-dhcp-tap.cfg";
const DEFAULT_INTERFACE: &str = "ens3";
const DEFAULT_HOOK_PATH: &str = "/opt/bm-dhcp-tap/scripts/dhcp_hook2.sh";
const DEFAULT_LOG_FILE: &str = "/opt/bm-dhcp-tap/logs/bm-dhcp-tap.log";
const DEFAULT_SYSLOG_PORT: u16 = 514;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "BM_CONFIG";

/// Keys understood in the config file and the environment.
const KEYS: [&str; 6] = [
    "IFACE",
    "HOOK_PATH",
    "LOG_FILE",
    "SYSLOG_SERVER",
    "SYSLOG_PORT",
    "LOG_LEVEL",
];

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to sniff
    pub interface: String,
    /// Executable run for every DHCPACK
    pub hook_path: PathBuf,
    /// Log file, in addition to stdout
    pub log_file: PathBuf,
    /// Remote syslog host; `None` disables remote logging
    pub syslog_server: Option<String>,
    pub syslog_port: u16,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            hook_path: PathBuf::from(DEFAULT_HOOK_PATH),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            syslog_server: None,
            syslog_port: DEFAULT_SYSLOG_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load settings: defaults, then the config file, then the process
    /// environment, then the command-line interface name.
    pub fn load(config_path: Option<&Path>, interface: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_path.map(Path::to_path_buf).unwrap_or_else(|| {
            std::env::var(CONFIG_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
        });

        Self::resolve(&path, |key| std::env::var(key).ok(), interface)
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    pub fn resolve<F>(path: &Path, env: F, interface: Option<&str>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            for (key, value) in parse_lines(&content) {
                config.set(key, value)?;
            }
        }

        // Allow environment variable overrides
        for key in KEYS {
            if let Some(value) = env(key) {
                config.set(key, &value)?;
            }
        }

        if let Some(iface) = interface.filter(|iface| !iface.is_empty()) {
            config.interface = iface.to_string();
        }

        Ok(config)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "IFACE" if !value.is_empty() => self.interface = value.to_string(),
            "HOOK_PATH" => self.hook_path = PathBuf::from(value),
            "LOG_FILE" => self.log_file = PathBuf::from(value),
            "SYSLOG_SERVER" => {
                self.syslog_server = Some(value.to_string()).filter(|s| !s.is_empty())
            }
            "SYSLOG_PORT" => {
                self.syslog_port = value.parse().map_err(|_| ConfigError::Invalid {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
            }
            "LOG_LEVEL" if !value.is_empty() => self.log_level = value.to_string(),
            _ => {}
        }
        Ok(())
    }
}

/// Parse `KEY=VALUE` lines, skipping blanks and comments and stripping
/// surrounding quotes from values.
fn parse_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Some((key, value))
    })
}
