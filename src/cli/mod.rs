//! Command-line front end

pub mod classify;
pub mod guess;
pub mod imports;

use crate::config::ScanConfig;
use crate::Result;
use clap::Args;
use std::env;
use std::path::PathBuf;

/// Options shared by every command that walks a tree
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Directory to scan (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Config file (default: depguess.toml in the scan root, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of files parsed at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Give up on a single file after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ScanArgs {
    /// Resolve the scan root and the effective configuration
    pub fn resolve(&self) -> Result<(PathBuf, ScanConfig)> {
        let root = match &self.path {
            Some(p) => p.clone(),
            None => env::current_dir()?,
        };

        if !root.exists() {
            anyhow::bail!("Source path does not exist: {}", root.display());
        }

        if !root.is_dir() {
            anyhow::bail!("Source path must be a directory: {}", root.display());
        }

        let config = match &self.config {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::discover(&root)?,
        };
        let config = config.with_overrides(self.concurrency, self.timeout)?;

        Ok((root, config))
    }
}
