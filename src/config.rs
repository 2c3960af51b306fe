use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MATRIX_SIZE: usize = 1000;
pub const DEFAULT_FILE_SIZE_MB: usize = 100;
pub const DEFAULT_ITERATIONS: usize = 100;
pub const DEFAULT_SCRATCH_FILE: &str = "benchmark_test_file.dat";
pub const DEFAULT_LOG_FILE: &str = "benchmark.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matrix_size: usize,
    pub file_size_mb: usize,
    pub iterations: usize,
    pub scratch_dir: PathBuf,
    pub scratch_file: String,
    pub log_file: PathBuf,
    /// Append one JSON line per iteration here when set
    pub results_file: Option<PathBuf>,
    /// Record a failed iteration and move on instead of aborting
    pub keep_going: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matrix_size: DEFAULT_MATRIX_SIZE,
            file_size_mb: DEFAULT_FILE_SIZE_MB,
            iterations: DEFAULT_ITERATIONS,
            scratch_dir: PathBuf::from("."),
            scratch_file: DEFAULT_SCRATCH_FILE.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            results_file: None,
            keep_going: false,
        }
    }
}

impl Config {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.matrix_size == 0 {
            anyhow::bail!("matrix_size must be at least 1");
        }
        if self.file_size_mb == 0 {
            anyhow::bail!("file_size_mb must be at least 1");
        }
        if self.iterations == 0 {
            anyhow::bail!("iterations must be at least 1");
        }
        if self.scratch_file.is_empty() {
            anyhow::bail!("scratch_file must not be empty");
        }
        Ok(())
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.scratch_dir.join(&self.scratch_file)
    }
}

/// Parse a human-readable file size into whole megabytes (e.g., "100", "100m", "2g")
pub fn parse_file_size_mb(s: &str) -> anyhow::Result<usize> {
    let s = s.trim().to_lowercase();
    let (num_str, multiplier) = if let Some(num) = s.strip_suffix("mb").or_else(|| s.strip_suffix('m')) {
        (num, 1)
    } else if let Some(num) = s.strip_suffix("gb").or_else(|| s.strip_suffix('g')) {
        (num, 1024)
    } else {
        // Assume megabytes if no unit
        (s.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid file size: {}", s))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("File size too large: {}", s))
}
