//! Session gate.
//!
//! A successful unlock is remembered per parent process (usually the user's
//! shell) in `~/.keys/.session`, so a run of commands from the same shell only
//! prompts once. When no biometric backend is available the gate lets the
//! caller through without remembering anything.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, warn};

use crate::utils::write_private_file;

const SESSION_FILENAME: &str = ".session";
const AUTH_REASON: &str = "access your keys";

/// Result of asking the platform to verify the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Granted,
    Denied,
    Unavailable,
}

pub trait BiometricVerifier {
    fn verify(&self, reason: &str) -> Verification;
}

/// Verifier for builds without a biometric backend.
pub struct NoBiometrics;

impl BiometricVerifier for NoBiometrics {
    fn verify(&self, _reason: &str) -> Verification {
        Verification::Unavailable
    }
}

#[cfg(unix)]
fn current_parent_pid() -> u32 {
    std::os::unix::process::parent_id()
}

#[cfg(not(unix))]
fn current_parent_pid() -> u32 {
    0
}

pub struct SessionGate {
    session_path: PathBuf,
    parent_pid: u32,
}

impl SessionGate {
    pub fn new(keys_dir: &Path) -> Self {
        Self::with_parent_pid(keys_dir, current_parent_pid())
    }

    pub fn with_parent_pid(keys_dir: &Path, parent_pid: u32) -> Self {
        Self { session_path: keys_dir.join(SESSION_FILENAME), parent_pid }
    }

    /// True when the last unlock happened under the same parent process.
    pub fn is_session_valid(&self) -> bool {
        fs::read_to_string(&self.session_path)
            .map(|stored| stored.trim() == self.parent_pid.to_string())
            .unwrap_or(false)
    }

    fn save_session(&self) {
        if let Err(e) =
            write_private_file(&self.session_path, self.parent_pid.to_string().as_bytes())
        {
            warn!(error = %e, "failed to remember unlock session");
        }
    }

    pub fn authenticate(&self, verifier: &dyn BiometricVerifier) -> Result<()> {
        if self.is_session_valid() {
            debug!("unlock session still valid");
            return Ok(());
        }

        match verifier.verify(AUTH_REASON) {
            Verification::Granted => {
                self.save_session();
                Ok(())
            }
            Verification::Unavailable => {
                debug!("biometrics unavailable, allowing access");
                Ok(())
            }
            Verification::Denied => bail!("authentication failed"),
        }
    }
}
