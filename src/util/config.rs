//! Configuration file support.
//!
//! Two optional locations are read:
//! - Global: `~/.bob/config.toml` - User-wide defaults
//! - Project: `.bob/config.toml` in the current directory
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::errors::BuildError;
use crate::core::platform::Compiler;

/// Bob configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildDefaults,
}

/// Defaults for `[build]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildDefaults {
    /// D compiler (dmd, gdc, ldc)
    pub compiler: Option<String>,

    /// Runtime-support flavour (dmd, gdc, ldc)
    pub runtime: Option<String>,

    /// D compiler options
    pub options: Option<String>,

    /// Library base name, without extension
    pub library: Option<String>,

    /// Directory for objects and the library
    pub output_dir: Option<PathBuf>,

    /// Incremental builds by default
    pub quick: Option<bool>,

    /// Leave `tango/core` out of the library
    pub no_core: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
            Self::default()
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let b = other.build;
        if b.compiler.is_some() {
            self.build.compiler = b.compiler;
        }
        if b.runtime.is_some() {
            self.build.runtime = b.runtime;
        }
        if b.options.is_some() {
            self.build.options = b.options;
        }
        if b.library.is_some() {
            self.build.library = b.library;
        }
        if b.output_dir.is_some() {
            self.build.output_dir = b.output_dir;
        }
        if b.quick.is_some() {
            self.build.quick = b.quick;
        }
        if b.no_core.is_some() {
            self.build.no_core = b.no_core;
        }
    }

    /// Configured compiler, validated.
    pub fn compiler(&self) -> Result<Option<Compiler>> {
        parse_compiler(self.build.compiler.as_deref())
    }

    /// Configured runtime, validated.
    pub fn runtime(&self) -> Result<Option<Compiler>> {
        parse_compiler(self.build.runtime.as_deref())
    }
}

fn parse_compiler(value: Option<&str>) -> Result<Option<Compiler>> {
    let parsed = value
        .map(|s| {
            s.parse::<Compiler>()
                .map_err(|e| BuildError::config(format!("invalid config file setting: {}", e)))
        })
        .transpose()?;
    Ok(parsed)
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.bob/config.toml)
/// 2. Global config (~/.bob/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global bob config directory (~/.bob).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".bob"))
}

/// Get the global config path (~/.bob/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.bob/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".bob").join("config.toml")
}
