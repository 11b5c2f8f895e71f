//! Consumer build settings.
//!
//! Settings describe the build that consumes the toolchain: which compiler
//! family it uses, which C++ runtime it links and which sanitizer the
//! platform profile enables. They are inputs to the flag composer, not
//! options of the dependency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::sanitizer::SanitizerMode;
use crate::util::diagnostic::ConfigError;

/// Compiler family of the consuming build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerFamily {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl CompilerFamily {
    pub const NAMES: &'static [&'static str] = &["gcc", "clang", "apple-clang", "msvc"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
            CompilerFamily::AppleClang => "apple-clang",
            CompilerFamily::Msvc => "msvc",
        }
    }

    /// Whether this is a clang-family compiler.
    pub fn is_clang(&self) -> bool {
        matches!(self, CompilerFamily::Clang | CompilerFamily::AppleClang)
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompilerFamily {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" | "g++" => Ok(CompilerFamily::Gcc),
            "clang" | "clang++" => Ok(CompilerFamily::Clang),
            "apple-clang" | "apple_clang" | "apple clang" => Ok(CompilerFamily::AppleClang),
            "msvc" | "visual studio" | "cl" => Ok(CompilerFamily::Msvc),
            _ => Err(()),
        }
    }
}

/// C++ standard library the consuming build links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CppRuntime {
    #[serde(rename = "libstdc++")]
    Libstdcxx,
    #[serde(rename = "libstdc++11")]
    Libstdcxx11,
    #[serde(rename = "libc++")]
    Libcxx,
    #[serde(rename = "c++_static")]
    CxxStatic,
    #[serde(rename = "c++_shared")]
    CxxShared,
}

impl CppRuntime {
    pub const NAMES: &'static [&'static str] =
        &["libstdc++", "libstdc++11", "libc++", "c++_static", "c++_shared"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CppRuntime::Libstdcxx => "libstdc++",
            CppRuntime::Libstdcxx11 => "libstdc++11",
            CppRuntime::Libcxx => "libc++",
            CppRuntime::CxxStatic => "c++_static",
            CppRuntime::CxxShared => "c++_shared",
        }
    }

    /// Libraries to link for this runtime when built with `compiler`.
    pub fn link_libs(&self, compiler: CompilerFamily) -> Vec<&'static str> {
        match self {
            CppRuntime::Libstdcxx | CppRuntime::Libstdcxx11 => vec!["stdc++"],
            CppRuntime::Libcxx if compiler.is_clang() => vec!["c++"],
            CppRuntime::Libcxx => Vec::new(),
            CppRuntime::CxxStatic => vec!["c++_static", "c++abi"],
            CppRuntime::CxxShared => vec!["c++_shared", "c++abi"],
        }
    }
}

impl fmt::Display for CppRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CppRuntime {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|n| *n == s)
            .map(|i| {
                [
                    CppRuntime::Libstdcxx,
                    CppRuntime::Libstdcxx11,
                    CppRuntime::Libcxx,
                    CppRuntime::CxxStatic,
                    CppRuntime::CxxShared,
                ][i]
            })
            .ok_or(())
    }
}

/// Settings of the consuming build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Compiler family (`compiler`)
    pub compiler: CompilerFamily,
    /// C++ runtime (`compiler.libcxx`)
    pub libcxx: CppRuntime,
    /// Platform-detected sanitizer (`compiler.sanitizer`)
    pub sanitizer: SanitizerMode,
    /// Operating system of the build machine
    pub os_build: String,
    /// Architecture of the build machine
    pub arch_build: String,
    /// Target architecture of the consuming build
    pub arch: String,
    /// Build type of the consuming build
    pub build_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            compiler: CompilerFamily::Clang,
            libcxx: CppRuntime::Libcxx,
            sanitizer: SanitizerMode::None,
            os_build: host_os().to_string(),
            arch_build: std::env::consts::ARCH.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            build_type: "Release".to_string(),
        }
    }
}

impl Settings {
    pub const KEYS: &'static [&'static str] = &[
        "compiler",
        "compiler.libcxx",
        "compiler.sanitizer",
        "os_build",
        "arch_build",
        "arch",
        "build_type",
    ];

    /// Apply a single `key=value` setting.
    pub fn apply(&mut self, raw: &str) -> Result<(), ConfigError> {
        let (key, value) = raw.split_once('=').ok_or_else(|| ConfigError::InvalidSetting {
            key: raw.to_string(),
            value: String::new(),
            expected: "key=value".to_string(),
        })?;
        let (key, value) = (key.trim(), value.trim());

        let invalid = |expected: &[&str]| ConfigError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.join(", "),
        };

        match key {
            "compiler" => {
                self.compiler = value.parse().map_err(|_| invalid(CompilerFamily::NAMES))?;
            }
            "compiler.libcxx" | "libcxx" => {
                self.libcxx = value.parse().map_err(|_| invalid(CppRuntime::NAMES))?;
            }
            "compiler.sanitizer" | "sanitizer" => {
                self.sanitizer = value.parse().map_err(|_| invalid(SanitizerMode::NAMES))?;
            }
            "os_build" => self.os_build = value.to_string(),
            "arch_build" => self.arch_build = value.to_string(),
            "arch" => self.arch = value.to_string(),
            "build_type" => self.build_type = value.to_string(),
            _ => {
                return Err(ConfigError::InvalidSetting {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: format!("a setting among {}", Self::KEYS.join(", ")),
                })
            }
        }
        Ok(())
    }

    /// Directory name compiler-rt uses for this build's OS.
    pub fn runtime_os_dir(&self) -> String {
        match self.os_build.to_ascii_lowercase().as_str() {
            "macos" | "darwin" => "darwin".to_string(),
            "windows" => "windows".to_string(),
            other => other.to_string(),
        }
    }

    /// Architecture suffix of compiler-rt libraries for the build machine.
    pub fn runtime_arch(&self) -> String {
        let arch = match self.arch_build.as_str() {
            "x86" | "i686" => "i386",
            "armv8" | "arm64" => "aarch64",
            "armv7hf" => "armhf",
            "armv7" => "arm",
            other => other,
        };
        arch.to_string()
    }
}

/// Host OS in the capitalised form used for `os_build`.
pub fn host_os() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Macos",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}
