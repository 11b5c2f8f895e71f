//! Configuration file support for clangenv.
//!
//! clangenv reads two configuration file locations:
//! - Global: `~/.clangenv/config.toml` - User-wide defaults
//! - Project: `.clangenv/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line
//! arguments take precedence over both.
//!
//! ```toml
//! root = "/opt/llvm_9"
//! clang_version = "9.0.1"
//!
//! [options]
//! link_libcxx = true
//! use_sanitizer = "Address"
//!
//! [settings]
//! compiler = "clang"
//! libcxx = "libc++"
//! sanitizer = "Address"
//!
//! [dependency]
//! name = "llvm_9"
//! channel = "conan/stable"
//!
//! [dependency.options]
//! link_libcxx = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::OptionSet;

/// clangenv configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain root supplied by the dependency resolution step
    pub root: Option<PathBuf>,

    /// Clang resource-directory version, or `auto` to detect it
    pub clang_version: Option<String>,

    /// Wrapper option values
    pub options: OptionSet,

    /// Consumer build settings (`compiler`, `libcxx`, `sanitizer`, ...)
    pub settings: BTreeMap<String, String>,

    /// The wrapped dependency
    pub dependency: DependencyConfig,

    /// Flags used instead of the inherited CXXFLAGS/CFLAGS/LDFLAGS
    pub flags: FlagsConfig,
}

/// The wrapped dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub channel: Option<String>,

    /// Options the dependency declares, with its values. When absent the
    /// dependency is assumed to declare exactly the catalog's options.
    pub options: Option<OptionSet>,
}

/// Inherited flag overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagsConfig {
    pub cxxflags: Option<String>,
    pub cflags: Option<String>,
    pub ldflags: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.clang_version.is_some() {
            self.clang_version = other.clang_version;
        }
        self.options.merge(&other.options);
        self.settings.extend(other.settings);

        let dep = other.dependency;
        if dep.name.is_some() {
            self.dependency.name = dep.name;
        }
        if dep.version.is_some() {
            self.dependency.version = dep.version;
        }
        if dep.channel.is_some() {
            self.dependency.channel = dep.channel;
        }
        if dep.options.is_some() {
            self.dependency.options = dep.options;
        }

        let flags = other.flags;
        if flags.cxxflags.is_some() {
            self.flags.cxxflags = flags.cxxflags;
        }
        if flags.cflags.is_some() {
            self.flags.cflags = flags.cflags;
        }
        if flags.ldflags.is_some() {
            self.flags.ldflags = flags.ldflags;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.clangenv/config.toml)
/// 2. Global config (~/.clangenv/config.toml)
/// 3. Defaults
///
/// A file that exists but cannot be parsed is an error.
pub fn load_config(global_path: &Path, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    for path in [global_path, project_path] {
        if path.is_file() {
            tracing::debug!("loading config from {}", path.display());
            config.merge(Config::load(path)?);
        }
    }

    Ok(config)
}

/// Get the global clangenv config directory (~/.clangenv).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".clangenv"))
}

/// Get the global config path (~/.clangenv/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.clangenv/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".clangenv").join("config.toml")
}
