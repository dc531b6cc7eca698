use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `~/.tracker`, unless a home was given explicitly (`--home` / `TRACKER_HOME`).
pub fn tracker_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = std::env::var("HOME").context("HOME is not set (pass --home)")?;
    Ok(PathBuf::from(home).join(".tracker"))
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
}
