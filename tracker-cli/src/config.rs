use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use tracker_core::ScoreConfig;
use tracker_core::time::parse_timezone;

use crate::state::ensure_dir;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
    pub display: DisplaySection,
    pub scoring: ScoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Root for per-user data; defaults to `<home>/localdata`
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    pub fn data_dir(&self, home: &Path) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| home.join("localdata"))
    }

    pub fn timezone(&self) -> Result<Tz> {
        Ok(parse_timezone(&self.display.timezone)?)
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE_NAME)
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    ensure_dir(home)?;
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(home: &Path) -> Result<()> {
    let p = config_path(home);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(home, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.data_dir(dir.path()), dir.path().join("localdata"));
        assert_eq!(cfg.timezone().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            config_path(dir.path()),
            "[display]\ntimezone = \"America/Chicago\"\n\n[scoring]\nminimum_moderate_hours_per_week = 5.0\n",
        )
        .unwrap();

        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg.timezone().unwrap(), chrono_tz::America::Chicago);
        assert_eq!(cfg.scoring.minimum_moderate_hours_per_week, 5.0);
        assert_eq!(cfg.scoring.high_floor, 0.7);
        assert_eq!(cfg.storage.data_dir, None);
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.storage.data_dir = Some(PathBuf::from("/srv/tracker"));
        cfg.scoring.high_floor = 0.75;
        save_config(dir.path(), &cfg).unwrap();
        assert_eq!(load_config(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn test_bad_timezone() {
        let mut cfg = Config::default();
        cfg.display.timezone = "Nowhere/Special".to_string();
        assert!(cfg.timezone().is_err());
    }
}
