use super::{ScreenConfig, DEFAULT_CONFIG_FILE};
use crate::error::{ErrorCode, Result, ScreenError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Builds a [`ScreenConfig`] from file, environment and CLI layers
pub struct ConfigLoader {
    config: ScreenConfig,
    source: Option<PathBuf>,
    working_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: ScreenConfig::default(),
            source: None,
            working_dir: None,
        }
    }

    /// Load the TOML layer.
    ///
    /// An explicit path must exist. Without one, `koscreen.toml` in `cwd` is
    /// used when present.
    pub async fn load_file(mut self, explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        self.working_dir = Some(cwd.to_path_buf());
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ScreenError::config_with_code(
                        ErrorCode::CONFIG_NOT_FOUND,
                        format!("Configuration file not found: {}", path.display()),
                        Some(path.to_path_buf()),
                    ));
                }
                path.to_path_buf()
            }
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    tracing::debug!("No {} in {}, using defaults", DEFAULT_CONFIG_FILE, cwd.display());
                    return Ok(self);
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path).await.map_err(|e| {
            ScreenError::config_with_code(
                ErrorCode::CONFIG_NOT_FOUND,
                "Failed to read configuration file",
                Some(path.clone()),
            )
            .with_source(e)
        })?;

        self.config = toml::from_str(&content).map_err(|e| {
            ScreenError::config_with_code(
                ErrorCode::CONFIG_INVALID_TOML,
                format!("Invalid configuration in {}", path.display()),
                Some(path.clone()),
            )
            .with_source(e)
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        self.source = Some(path);
        Ok(self)
    }

    pub fn merge_env_vars(mut self) -> Self {
        self.config.merge_env_vars();
        self
    }

    pub fn merge_env_vars_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.config.merge_env_vars_with(lookup);
        self
    }

    /// Command-line `--base-dir` wins over every other layer
    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = base_dir {
            self.config.base_dir = dir;
        }
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Validate the merged layers and anchor `base_dir` at the working directory.
    ///
    /// MAGeCK runs inside each replicate directory, so every path handed to it
    /// must be absolute.
    pub fn build(mut self) -> Result<ScreenConfig> {
        if self.config.tool.program.trim().is_empty() {
            return Err(ScreenError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "tool.program must not be empty",
                self.source,
            ));
        }
        if self.config.tool.timeout_secs == Some(0) {
            return Err(ScreenError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "tool.timeout_secs must be positive",
                self.source,
            ));
        }
        if self.config.quartiles.low.trim().eq_ignore_ascii_case(self.config.quartiles.high.trim()) {
            return Err(ScreenError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!(
                    "quartiles.low and quartiles.high must differ (both '{}')",
                    self.config.quartiles.low
                ),
                self.source,
            ));
        }

        if self.config.base_dir.is_relative() {
            let cwd = match self.working_dir.take() {
                Some(dir) => dir,
                None => std::env::current_dir().map_err(|e| {
                    ScreenError::config("Cannot determine working directory").with_source(e)
                })?,
            };
            self.config.base_dir = anchor(&cwd, &self.config.base_dir);
            tracing::debug!("Resolved base_dir to {}", self.config.base_dir.display());
        }
        Ok(self.config)
    }
}

/// Join `path` onto `cwd`, dropping `.` components
fn anchor(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path).components().collect()
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
