//! Reference to the wrapped toolchain package.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "llvm_9";
pub const DEFAULT_VERSION: &str = "master";
pub const DEFAULT_CHANNEL: &str = "conan/stable";

/// The `name/version@channel` triplet of the dependency providing the toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
    pub channel: String,
}

impl Default for PackageRef {
    fn default() -> Self {
        PackageRef {
            name: DEFAULT_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
        }
    }
}

impl PackageRef {
    /// Override individual parts; `None` keeps the current value.
    pub fn with_overrides(
        mut self,
        name: Option<String>,
        version: Option<String>,
        channel: Option<String>,
    ) -> Self {
        if let Some(name) = name.filter(|s| !s.is_empty()) {
            self.name = name;
        }
        if let Some(version) = version.filter(|s| !s.is_empty()) {
            self.version = version;
        }
        if let Some(channel) = channel.filter(|s| !s.is_empty()) {
            self.channel = channel;
        }
        self
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.name, self.version, self.channel)
    }
}
