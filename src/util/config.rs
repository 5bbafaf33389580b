//! Configuration file support for cxxparse.
//!
//! Two configuration file locations are supported:
//! - Global: `~/.cxxparse/config.toml` - User-wide defaults
//! - Project: `.cxxparse/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::abi::CppAbi;
use crate::core::language::LanguageVersion;
use crate::core::options::ParserOptions;
use crate::util::fs;

/// cxxparse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parser option defaults
    pub parser: ParserConfig,

    /// MSVC toolchain selection
    pub msvc: MsvcConfig,
}

/// Defaults applied to freshly constructed parser options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Language version (e.g., "c++11")
    pub language: Option<LanguageVersion>,

    /// Keep RTTI enabled
    pub rtti: Option<bool>,

    /// ABI override; does not change Microsoft compatibility mode
    pub abi: Option<CppAbi>,

    /// Target triple passed to the front end
    pub target: Option<String>,

    /// Macro definitions (`NAME` or `NAME=VALUE`)
    pub defines: Vec<String>,

    /// User include directories
    pub include_dirs: Vec<PathBuf>,
}

/// MSVC-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MsvcConfig {
    /// Visual Studio version token ("vs2012", "vs2013", "vs2015", "vs2017").
    /// Unknown values select the latest version.
    pub version: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        fs::write_string(path, &contents)
            .with_context(|| format!("failed to write config file: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.parser.language.is_some() {
            self.parser.language = other.parser.language;
        }
        if other.parser.rtti.is_some() {
            self.parser.rtti = other.parser.rtti;
        }
        if other.parser.abi.is_some() {
            self.parser.abi = other.parser.abi;
        }
        if other.parser.target.is_some() {
            self.parser.target = other.parser.target;
        }
        if !other.parser.defines.is_empty() {
            self.parser.defines = other.parser.defines;
        }
        if !other.parser.include_dirs.is_empty() {
            self.parser.include_dirs = other.parser.include_dirs;
        }

        if other.msvc.version.is_some() {
            self.msvc.version = other.msvc.version;
        }
    }

    /// Apply the configured defaults to parser options.
    pub fn apply(&self, opts: &mut ParserOptions) {
        if let Some(language) = self.parser.language {
            opts.language_version = language;
        }
        if let Some(rtti) = self.parser.rtti {
            opts.enable_rtti = rtti;
        }
        if let Some(abi) = self.parser.abi {
            opts.abi = abi;
        }
        if let Some(target) = &self.parser.target {
            opts.target_triple = Some(target.clone());
        }
        for define in &self.parser.defines {
            opts.add_define(define.clone());
        }
        for dir in &self.parser.include_dirs {
            opts.add_include_dir(dir.clone());
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cxxparse/config.toml)
/// 2. Global config (~/.cxxparse/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Load configuration for a project rooted at `project_root`.
pub fn load_config_for(project_root: &Path) -> Config {
    let project_path = project_config_path(project_root);
    let global_path = global_config_path().unwrap_or_default();
    load_config(&global_path, &project_path)
}

/// Get the global config directory (~/.cxxparse).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cxxparse"))
}

/// Get the global config path (~/.cxxparse/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.cxxparse/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cxxparse").join("config.toml")
}
