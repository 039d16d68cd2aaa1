//! WireGuard key-pair generation
//!
//! Key material is produced entirely by the external `wg` tool: `wg genkey`
//! for the private key, then `wg pubkey` with the private key piped to
//! stdin. Keys are held in memory only until the rendered profile embeds
//! the private key.

use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Default name of the WireGuard tool on PATH.
pub const WG_COMMAND: &str = "wg";

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Failed to invoke key generator: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("wg {0} failed: {1}")]
    CommandFailed(&'static str, String),
}

/// A freshly generated WireGuard key pair, both keys base64-encoded.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

/// Generate a key pair with the given `wg` executable.
///
/// Fails if the executable is missing or either invocation exits non-zero.
/// Key generation is a precondition for everything downstream, so the CLI
/// treats this error as fatal.
pub fn generate_key_pair(wg: &str) -> Result<KeyPair, KeyError> {
    let output = Command::new(wg).arg("genkey").output()?;
    if !output.status.success() {
        return Err(KeyError::CommandFailed(
            "genkey",
            String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        ));
    }
    let private_key = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
    debug!("Generated private key");

    let mut child = Command::new(wg)
        .arg("pubkey")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(private_key.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(KeyError::CommandFailed(
            "pubkey",
            String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        ));
    }
    let public_key = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
    debug!("Derived public key");

    Ok(KeyPair {
        private_key,
        public_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn write_stub_wg(dir: &tempfile::TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("wg");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_key_pair_success() {
        let dir = tempfile::TempDir::new().unwrap();
        let wg = write_stub_wg(
            &dir,
            r#"case "$1" in
  genkey) echo "stub-private-key" ;;
  pubkey) read key; echo "derived-from-$key" ;;
esac"#,
        );

        let pair = generate_key_pair(&wg).unwrap();
        assert_eq!(pair.private_key, "stub-private-key");
        assert_eq!(pair.public_key, "derived-from-stub-private-key");
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_key_pair_trims_trailing_whitespace() {
        let dir = tempfile::TempDir::new().unwrap();
        let wg = write_stub_wg(
            &dir,
            r#"case "$1" in
  genkey) printf "key-with-newline\n\n" ;;
  pubkey) cat >/dev/null; printf "pub\n" ;;
esac"#,
        );

        let pair = generate_key_pair(&wg).unwrap();
        assert_eq!(pair.private_key, "key-with-newline");
        assert_eq!(pair.public_key, "pub");
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_key_pair_nonzero_exit() {
        let dir = tempfile::TempDir::new().unwrap();
        let wg = write_stub_wg(&dir, r#"echo "boom" >&2; exit 1"#);

        let err = generate_key_pair(&wg).unwrap_err();
        match err {
            KeyError::CommandFailed(cmd, stderr) => {
                assert_eq!(cmd, "genkey");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_generate_key_pair_missing_binary() {
        let err = generate_key_pair("/nonexistent/path/to/wg").unwrap_err();
        assert!(matches!(err, KeyError::Spawn(_)));
    }
}
