use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils::write_private_file;

pub const DEFAULT_PROFILE: &str = "default";

const CONFIG_FILENAME: &str = "config";

fn config_path(keys_dir: &Path) -> PathBuf {
    keys_dir.join(CONFIG_FILENAME)
}

/// The profile commands operate on. Falls back to `default` when the config
/// file is missing, unreadable or blank.
pub fn get_active_profile(keys_dir: &Path) -> String {
    fs::read_to_string(config_path(keys_dir))
        .ok()
        .map(|contents| contents.trim().to_string())
        .filter(|profile| !profile.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// Persist `name` as the active profile.
pub fn set_active_profile(keys_dir: &Path, name: &str) -> Result<()> {
    let path = config_path(keys_dir);
    write_private_file(&path, format!("{name}\n").as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}
