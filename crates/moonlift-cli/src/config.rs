// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! MOONLIFT project configuration.
//!
//! Configuration is loaded from `moonlift.toml` at the project root.
//! Every section and field is optional; command-line flags override
//! whatever the file provides.
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! name = "my-game"
//!
//! [build]
//! output_dir = "py-out"
//! extension = "py"
//! strict = false
//!
//! [watch]
//! debounce_ms = 750
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure loaded from `moonlift.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Translation output settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Watch mode settings.
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Project metadata.
#[derive(Debug, Deserialize, Default)]
pub struct ProjectConfig {
    /// Project name, used only for log output.
    #[serde(default)]
    pub name: Option<String>,
}

/// Translation output settings.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Output directory for directory-mode translation.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Extension for emitted files (default: "py").
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Promote recoverable warnings to errors.
    #[serde(default)]
    pub strict: bool,
}

fn default_extension() -> String {
    "py".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            extension: default_extension(),
            strict: false,
        }
    }
}

/// Watch mode settings.
#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    /// Debounce window for file events, in milliseconds (default: 750).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    750
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Config {
    /// Loads `moonlift.toml` from the given directory, falling back to
    /// defaults when the file does not exist.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join("moonlift.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = Config::load(Path::new("/nonexistent")).unwrap();
        assert_eq!(config.build.extension, "py");
        assert!(!config.build.strict);
        assert_eq!(config.watch.debounce_ms, 750);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("moonlift.toml"),
            "[build]\nstrict = true\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.build.strict);
        assert_eq!(config.build.extension, "py");
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("moonlift.toml"), "[build\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
