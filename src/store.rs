//! Saved-profile store and activation state
//!
//! Enumerates `.conf` profiles in a single flat directory and drives the
//! tunnel backend for activation, deactivation, and status. At most one
//! profile is marked active, and only in memory; the marker does not
//! survive a process restart.

use crate::tunnel::{TunnelBackend, TunnelError, WgQuick};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File suffix for stored profiles.
pub const CONFIG_SUFFIX: &str = ".conf";

/// Interface brought down when no activation happened in this process.
const DEFAULT_INTERFACE: &str = "nordvpn";

/// Result of a status query against the tunnel backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelStatus {
    pub active: bool,
    pub details: String,
}

pub struct ConfigStore {
    dir: PathBuf,
    backend: Box<dyn TunnelBackend>,
    active: Option<String>,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_backend(dir, Box::new(WgQuick::new()))
    }

    pub fn with_backend(dir: impl Into<PathBuf>, backend: Box<dyn TunnelBackend>) -> Self {
        Self {
            dir: dir.into(),
            backend,
            active: None,
        }
    }

    /// Name of the profile activated by this process, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Path a profile with the given name is stored at.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, CONFIG_SUFFIX))
    }

    /// Stored profile names, suffix stripped, lexicographically sorted.
    pub fn list_configs(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if let Some(name) = config_name(&path) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Activate the named profile.
    ///
    /// Returns false without touching the backend when no such profile is
    /// stored. Otherwise tears down the current interface best-effort, then
    /// brings the target up; the up command alone decides success. On
    /// failure the active marker is cleared, since the teardown has likely
    /// taken the previous tunnel down already.
    pub fn activate(&mut self, name: &str) -> bool {
        let path = self.config_path(name);
        if !path.exists() {
            warn!("No stored profile named {}", name);
            return false;
        }

        let teardown = self.active.clone().unwrap_or_else(|| name.to_string());
        if let Err(e) = self.backend.down(&teardown) {
            debug!("Ignoring teardown failure for {}: {}", teardown, e);
        }

        match self.backend.up(&path) {
            Ok(()) => {
                info!("Activated {}", name);
                self.active = Some(name.to_string());
                true
            }
            Err(e) => {
                warn!("Failed to activate {}: {}", name, e);
                self.active = None;
                false
            }
        }
    }

    /// Bring the active tunnel down.
    ///
    /// On failure the marker is left as-is: the tunnel is probably still
    /// up, so the last known-good name remains the best guess.
    pub fn deactivate(&mut self) -> bool {
        let name = self.active.clone().unwrap_or_else(|| DEFAULT_INTERFACE.to_string());
        match self.backend.down(&name) {
            Ok(()) => {
                info!("Deactivated {}", name);
                self.active = None;
                true
            }
            Err(e) => {
                warn!("Failed to deactivate {}: {}", name, e);
                false
            }
        }
    }

    /// Query the tunnel backend for current status.
    pub fn status(&self) -> TunnelStatus {
        match self.backend.show() {
            Ok(output) if output.trim().is_empty() => TunnelStatus {
                active: false,
                details: "No active connections".to_string(),
            },
            Ok(output) => TunnelStatus {
                active: true,
                details: output,
            },
            Err(e) => {
                warn!("Status query failed: {}", e);
                TunnelStatus {
                    active: false,
                    details: "Error checking status".to_string(),
                }
            }
        }
    }
}

fn config_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.strip_suffix(CONFIG_SUFFIX)?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
