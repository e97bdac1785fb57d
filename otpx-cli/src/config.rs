use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_config_path, ensure_otpx_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoverySection,
    pub output: OutputSection,
    pub run: RunSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Glob appended to a directory source
    pub pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
    /// Write a header row before CSV output
    pub header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Documents extracted concurrently
    pub jobs: usize,
    /// Abort on the first unreadable document instead of skipping it
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            pattern: "**/*.pdf".to_string(),
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            jobs: 4,
            fail_fast: false,
        }
    }
}

/// `--config` when given, else `~/.otpx/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Missing file means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = config_path(explicit)?;
    if !p.exists() {
        log::debug!("no config at {}, using defaults", p.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => ensure_otpx_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}
