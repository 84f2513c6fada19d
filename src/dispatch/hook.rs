//! Fire-and-forget hook execution.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::LeaseDispatcher;
use crate::domain::LeaseObservation;
use crate::error::DispatchError;

/// Runs `<hook> <ip> <mac> <hostname>` for every lease.
///
/// The child's output is discarded and it is never waited on.
#[derive(Debug, Clone)]
pub struct HookDispatcher {
    path: PathBuf,
}

impl HookDispatcher {
    /// Create a dispatcher for the given hook, checking that it exists and
    /// can be executed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DispatchError> {
        let path = path.into();
        verify_executable(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Spawn the hook for one lease and release the child handle.
    pub fn spawn(&self, lease: &LeaseObservation) -> Result<(), DispatchError> {
        Command::new(&self.path)
            .arg(lease.ip.to_string())
            .arg(lease.mac_string())
            .arg(&lease.hostname)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|source| DispatchError::Spawn {
                path: self.path.clone(),
                source,
            })
    }
}

impl LeaseDispatcher for HookDispatcher {
    fn dispatch(&self, lease: &LeaseObservation) {
        if let Err(e) = self.spawn(lease) {
            tracing::error!("{}", e);
        }
    }
}

fn verify_executable(path: &Path) -> Result<(), DispatchError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Err(DispatchError::NotFound(path.to_path_buf())),
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(DispatchError::NotExecutable(path.to_path_buf()));
        }
    }
    #[cfg(not(unix))]
    let _ = metadata;

    Ok(())
}

/// Let the kernel reap exited hook processes.
///
/// Hooks are never waited on, so without this every finished hook would
/// linger as a zombie for the life of the daemon.
#[cfg(unix)]
pub fn reap_children_automatically() {
    // SAFETY: SIG_IGN installs no handler code; nothing in this process
    // waits on its children.
    unsafe {
        libc::signal(libc::SIGCHLD, libc::SIG_IGN);
    }
}

#[cfg(not(unix))]
pub fn reap_children_automatically() {}
