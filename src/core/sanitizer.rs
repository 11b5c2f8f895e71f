//! Sanitizer modes and runtime flavors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::options::OptionSet;

/// A sanitizer runtime flavor shipped by compiler-rt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerFlavor {
    Address,
    Thread,
    Memory,
    UndefinedBehavior,
}

impl SanitizerFlavor {
    /// All flavors, in the order their environment variables are emitted.
    pub const ALL: [SanitizerFlavor; 4] = [
        SanitizerFlavor::UndefinedBehavior,
        SanitizerFlavor::Address,
        SanitizerFlavor::Thread,
        SanitizerFlavor::Memory,
    ];

    /// Short name (`asan`, `tsan`, ...).
    pub fn short_name(&self) -> &'static str {
        match self {
            SanitizerFlavor::Address => "asan",
            SanitizerFlavor::Thread => "tsan",
            SanitizerFlavor::Memory => "msan",
            SanitizerFlavor::UndefinedBehavior => "ubsan",
        }
    }

    /// Value for `-fsanitize=`.
    pub fn fsanitize(&self) -> &'static str {
        match self {
            SanitizerFlavor::Address => "address",
            SanitizerFlavor::Thread => "thread",
            SanitizerFlavor::Memory => "memory",
            SanitizerFlavor::UndefinedBehavior => "undefined",
        }
    }

    /// Runtime library stem inside the clang resource directory
    /// (`libclang_rt.<stem>-<arch>.so`).
    pub fn runtime_stem(&self) -> &'static str {
        match self {
            SanitizerFlavor::Address => "asan",
            SanitizerFlavor::Thread => "tsan",
            SanitizerFlavor::Memory => "msan",
            SanitizerFlavor::UndefinedBehavior => "ubsan_standalone",
        }
    }

    /// Environment variable naming the symbolizer for this flavor.
    pub fn symbolizer_var(&self) -> &'static str {
        match self {
            SanitizerFlavor::Address => "ASAN_SYMBOLIZER_PATH",
            SanitizerFlavor::Thread => "TSAN_SYMBOLIZER_PATH",
            SanitizerFlavor::Memory => "MSAN_SYMBOLIZER_PATH",
            SanitizerFlavor::UndefinedBehavior => "UBSAN_SYMBOLIZER_PATH",
        }
    }

    /// The mirrored `enable_*` option toggling this runtime in the dependency build.
    pub fn enable_option(&self) -> &'static str {
        match self {
            SanitizerFlavor::Address => "enable_asan",
            SanitizerFlavor::Thread => "enable_tsan",
            SanitizerFlavor::Memory => "enable_msan",
            SanitizerFlavor::UndefinedBehavior => "enable_ubsan",
        }
    }
}

/// The sanitizer mode of a build. `None` is the "no sanitizer" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SanitizerMode {
    #[default]
    None,
    Address,
    Thread,
    Memory,
    UndefinedBehavior,
    AddressUndefinedBehavior,
}

impl SanitizerMode {
    /// Canonical names, as accepted by `use_sanitizer` and `compiler.sanitizer`.
    pub const NAMES: &'static [&'static str] = &[
        "None",
        "Address",
        "Thread",
        "Memory",
        "UndefinedBehavior",
        "AddressUndefinedBehavior",
    ];

    /// Get the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SanitizerMode::None => "None",
            SanitizerMode::Address => "Address",
            SanitizerMode::Thread => "Thread",
            SanitizerMode::Memory => "Memory",
            SanitizerMode::UndefinedBehavior => "UndefinedBehavior",
            SanitizerMode::AddressUndefinedBehavior => "AddressUndefinedBehavior",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == SanitizerMode::None
    }

    /// Runtime flavors instrumented by this mode.
    pub fn flavors(&self) -> &'static [SanitizerFlavor] {
        match self {
            SanitizerMode::None => &[],
            SanitizerMode::Address => &[SanitizerFlavor::Address],
            SanitizerMode::Thread => &[SanitizerFlavor::Thread],
            SanitizerMode::Memory => &[SanitizerFlavor::Memory],
            SanitizerMode::UndefinedBehavior => &[SanitizerFlavor::UndefinedBehavior],
            SanitizerMode::AddressUndefinedBehavior => {
                &[SanitizerFlavor::Address, SanitizerFlavor::UndefinedBehavior]
            }
        }
    }

    /// The `-fsanitize=` flag for this mode, if any.
    pub fn fsanitize_flag(&self) -> Option<String> {
        if self.is_none() {
            return None;
        }
        let kinds: Vec<&str> = self.flavors().iter().map(|f| f.fsanitize()).collect();
        Some(format!("-fsanitize={}", kinds.join(",")))
    }

    /// Flavors of this mode whose runtime the dependency build leaves out.
    /// An `enable_*` option the dependency does not declare counts as on.
    pub fn disabled_runtimes(&self, dependency: &OptionSet) -> Vec<SanitizerFlavor> {
        self.flavors()
            .iter()
            .copied()
            .filter(|flavor| !dependency.bool_or(flavor.enable_option(), true))
            .collect()
    }
}

impl fmt::Display for SanitizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SanitizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(SanitizerMode::None),
            "address" | "asan" => Ok(SanitizerMode::Address),
            "thread" | "tsan" => Ok(SanitizerMode::Thread),
            "memory" | "msan" => Ok(SanitizerMode::Memory),
            "undefinedbehavior" | "ubsan" => Ok(SanitizerMode::UndefinedBehavior),
            "addressundefinedbehavior" | "asan+ubsan" => {
                Ok(SanitizerMode::AddressUndefinedBehavior)
            }
            _ => Err(format!(
                "invalid sanitizer '{}'; expected one of {}",
                s,
                Self::NAMES.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sanitizer_mode() {
        assert_eq!("Address".parse::<SanitizerMode>(), Ok(SanitizerMode::Address));
        assert_eq!("asan".parse::<SanitizerMode>(), Ok(SanitizerMode::Address));
        assert_eq!("None".parse::<SanitizerMode>(), Ok(SanitizerMode::None));
        assert_eq!(
            "AddressUndefinedBehavior".parse::<SanitizerMode>(),
            Ok(SanitizerMode::AddressUndefinedBehavior)
        );
        assert!("leak".parse::<SanitizerMode>().is_err());
    }

    #[test]
    fn test_fsanitize_flag() {
        assert_eq!(SanitizerMode::None.fsanitize_flag(), None);
        assert_eq!(
            SanitizerMode::AddressUndefinedBehavior.fsanitize_flag().as_deref(),
            Some("-fsanitize=address,undefined")
        );
    }

    #[test]
    fn test_disabled_runtimes() {
        let dependency = OptionSet::new()
            .with("enable_asan", true)
            .with("enable_ubsan", false);

        assert_eq!(
            SanitizerMode::AddressUndefinedBehavior.disabled_runtimes(&dependency),
            vec![SanitizerFlavor::UndefinedBehavior]
        );
        assert!(SanitizerMode::Address.disabled_runtimes(&dependency).is_empty());
        assert!(SanitizerMode::Thread.disabled_runtimes(&dependency).is_empty());
        assert!(SanitizerMode::None.disabled_runtimes(&dependency).is_empty());
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for name in SanitizerMode::NAMES {
            let mode: SanitizerMode = name.parse().unwrap();
            assert_eq!(mode.to_string(), *name);
        }
    }
}
