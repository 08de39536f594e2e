use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::paths::ensure_private_dir;

const KEYS_DIRNAME: &str = ".keys";

/// Get the keys directory path (~/.keys)
///
/// `HOME` wins when set so tests and sandboxes can redirect it; otherwise the
/// platform home directory is used.
pub fn get_keys_dir() -> Result<PathBuf> {
    keys_dir_under(env::var_os("HOME"))
}

fn keys_dir_under(home: Option<OsString>) -> Result<PathBuf> {
    let home = home
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .context("Could not determine home directory")?;
    Ok(home.join(KEYS_DIRNAME))
}

/// Resolve the keys directory and make sure it exists with owner-only access.
pub fn ensure_keys_dir() -> Result<PathBuf> {
    let dir = get_keys_dir()?;
    ensure_private_dir(&dir)
        .with_context(|| format!("Failed to create keys directory {}", dir.display()))?;
    Ok(dir)
}
