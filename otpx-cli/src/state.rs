use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn otpx_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".otpx"))
}

pub fn ensure_otpx_home() -> Result<PathBuf> {
    let dir = otpx_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(otpx_home()?.join("config.toml"))
}
