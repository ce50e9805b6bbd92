//! Run configuration.
//!
//! Paths and tool settings are collected into a [`ScreenConfig`] that is passed
//! explicitly into each entry point. Values come from built-in defaults, an
//! optional `koscreen.toml`, `KOSCREEN_*` environment variables and finally
//! command-line flags, in increasing order of precedence.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod loader;

pub use loader::ConfigLoader;

/// Name of the config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "koscreen.toml";

pub const ENV_BASE_DIR: &str = "KOSCREEN_BASE_DIR";
pub const ENV_MAGECK: &str = "KOSCREEN_MAGECK";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    /// Root of the `<donor>/<condition>` FASTQ tree and replicate outputs
    pub base_dir: PathBuf,
    /// MAGeCK library file, relative to `base_dir` unless absolute
    pub library: PathBuf,
    /// Sample metadata CSV, relative to `base_dir` unless absolute
    pub sample_info: PathBuf,
    pub tool: ToolConfig,
    pub quartiles: QuartileConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub program: String,
    /// Upper bound on a single `count` or `test` run, in seconds
    pub timeout_secs: Option<u64>,
}

impl ToolConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Quartile markers selecting the control (low) and treatment (high) sides
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuartileConfig {
    pub low: String,
    pub high: String,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            library: PathBuf::from("brunello_library.txt"),
            sample_info: PathBuf::from("sample_info.csv"),
            tool: ToolConfig::default(),
            quartiles: QuartileConfig::default(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "mageck".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for QuartileConfig {
    fn default() -> Self {
        Self {
            low: "Q1".to_string(),
            high: "Q4".to_string(),
        }
    }
}

impl ScreenConfig {
    pub fn library_path(&self) -> PathBuf {
        self.resolve(&self.library)
    }

    pub fn sample_info_path(&self) -> PathBuf {
        self.resolve(&self.sample_info)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Apply `KOSCREEN_*` overrides using the given variable lookup
    pub fn merge_env_vars_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_dir) = lookup(ENV_BASE_DIR).filter(|v| !v.trim().is_empty()) {
            self.base_dir = PathBuf::from(base_dir);
        }

        if let Some(program) = lookup(ENV_MAGECK).filter(|v| !v.trim().is_empty()) {
            self.tool.program = program;
        }
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_vars_with(|key| std::env::var(key).ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ScreenConfig::default();
        assert_eq!(config.tool.program, "mageck");
        assert_eq!(config.quartiles.low, "Q1");
        assert_eq!(config.quartiles.high, "Q4");
        assert_eq!(
            config.library_path(),
            PathBuf::from("./brunello_library.txt")
        );
    }

    #[test]
    fn test_paths_resolve_against_base_dir() {
        let config = ScreenConfig {
            base_dir: PathBuf::from("/data/screen"),
            library: PathBuf::from("/refs/brunello.txt"),
            ..ScreenConfig::default()
        };
        assert_eq!(config.library_path(), PathBuf::from("/refs/brunello.txt"));
        assert_eq!(
            config.sample_info_path(),
            PathBuf::from("/data/screen/sample_info.csv")
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_DIR, "/env/base"),
            (ENV_MAGECK, "/opt/mageck/bin/mageck"),
        ]
        .into_iter()
        .collect();

        let mut config = ScreenConfig::default();
        config.merge_env_vars_with(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_dir, PathBuf::from("/env/base"));
        assert_eq!(config.tool.program, "/opt/mageck/bin/mageck");
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = ScreenConfig::default();
        config.merge_env_vars_with(|_| Some("  ".to_string()));
        assert_eq!(config, ScreenConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ScreenConfig = toml::from_str(
            r#"
            base_dir = "/data/JE_misc/GW_screen"

            [quartiles]
            high = "Q3"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/data/JE_misc/GW_screen"));
        assert_eq!(config.quartiles.low, "Q1");
        assert_eq!(config.quartiles.high, "Q3");
        assert_eq!(config.tool.program, "mageck");
        assert_eq!(config.tool.timeout(), None);
    }

    #[test]
    fn test_tool_timeout() {
        let config: ScreenConfig =
            toml::from_str("[tool]\nprogram = \"mageck\"\ntimeout_secs = 7200\n").unwrap();
        assert_eq!(config.tool.timeout(), Some(Duration::from_secs(7200)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<ScreenConfig, _> = toml::from_str("threads = 8\n");
        assert!(result.is_err());
    }
}
