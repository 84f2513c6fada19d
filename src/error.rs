use std::path::PathBuf;

use thiserror::Error;

/// Failures acquiring the frame source. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Network interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("Cannot bind to {0}: insufficient permissions (needs root or CAP_NET_RAW)")]
    InsufficientPermissions(String),

    #[error("Failed to create capture channel: {0}")]
    ChannelCreation(String),
}

/// Failures validating or launching the hook executable.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Hook script not found: {0}")]
    NotFound(PathBuf),

    #[error("Hook script is not executable: {0}")]
    NotExecutable(PathBuf),

    #[error("Failed to exec hook {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}
