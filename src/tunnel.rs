//! External tunnel manager integration
//!
//! Activation, deactivation, and status queries are all delegated to the
//! `wg-quick` / `wg` command-line tools as blocking child processes. The
//! [`TunnelBackend`] trait is the seam: the store works against it, and
//! tests substitute a scripted implementation.

use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TunnelError {
    #[error("Failed to invoke tunnel manager: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Tunnel command failed: {0}")]
    CommandFailed(String),
}

/// Interface to the external tunnel manager.
pub trait TunnelBackend {
    /// Bring a tunnel up from a configuration file.
    fn up(&self, config: &Path) -> Result<(), TunnelError>;
    /// Bring the named tunnel interface down.
    fn down(&self, name: &str) -> Result<(), TunnelError>;
    /// Raw status text; empty output means no active tunnel.
    fn show(&self) -> Result<String, TunnelError>;
}

/// The real backend: `wg-quick up/down` and `wg show`.
pub struct WgQuick {
    wg_quick: String,
    wg: String,
}

impl WgQuick {
    pub fn new() -> Self {
        Self::with_commands("wg-quick", "wg")
    }

    pub fn with_commands(wg_quick: impl Into<String>, wg: impl Into<String>) -> Self {
        Self {
            wg_quick: wg_quick.into(),
            wg: wg.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output, TunnelError> {
        debug!("Running {} {:?}", self.wg_quick, args);
        let output = Command::new(&self.wg_quick).args(args).output()?;
        if !output.status.success() {
            return Err(TunnelError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            ));
        }
        Ok(output)
    }
}

impl Default for WgQuick {
    fn default() -> Self {
        Self::new()
    }
}

impl TunnelBackend for WgQuick {
    fn up(&self, config: &Path) -> Result<(), TunnelError> {
        self.run(&["up", &config.to_string_lossy()])?;
        Ok(())
    }

    fn down(&self, name: &str) -> Result<(), TunnelError> {
        self.run(&["down", name])?;
        Ok(())
    }

    fn show(&self) -> Result<String, TunnelError> {
        let output = Command::new(&self.wg).arg("show").output()?;
        if !output.status.success() {
            return Err(TunnelError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tunnel_error_display() {
        let err = TunnelError::CommandFailed("resolvconf: command not found".to_string());
        assert_eq!(
            err.to_string(),
            "Tunnel command failed: resolvconf: command not found"
        );
    }

    #[cfg(unix)]
    fn write_stub(dir: &tempfile::TempDir, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn test_up_and_down_succeed_on_zero_exit() {
        let dir = tempfile::TempDir::new().unwrap();
        let wg_quick = write_stub(&dir, "wg-quick", "exit 0");
        let backend = WgQuick::with_commands(wg_quick, "wg");

        assert!(backend.up(Path::new("/tmp/server1.conf")).is_ok());
        assert!(backend.down("server1").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_up_reports_stderr_on_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let wg_quick = write_stub(&dir, "wg-quick", r#"echo "no such interface" >&2; exit 1"#);
        let backend = WgQuick::with_commands(wg_quick, "wg");

        let err = backend.up(Path::new("/tmp/server1.conf")).unwrap_err();
        match err {
            TunnelError::CommandFailed(stderr) => assert_eq!(stderr, "no such interface"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_show_returns_raw_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let wg = write_stub(&dir, "wg", r#"echo "interface: server1""#);
        let backend = WgQuick::with_commands("wg-quick", wg);

        assert_eq!(backend.show().unwrap(), "interface: server1\n");
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let backend = WgQuick::with_commands("/nonexistent/wg-quick", "/nonexistent/wg");
        assert!(matches!(
            backend.up(Path::new("/tmp/x.conf")),
            Err(TunnelError::Spawn(_))
        ));
        assert!(matches!(backend.show(), Err(TunnelError::Spawn(_))));
    }
}
