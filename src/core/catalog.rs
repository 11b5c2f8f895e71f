//! The option catalog.
//!
//! Static tables of every option the wrapper knows about: the options it
//! mirrors onto the LLVM dependency, the options it consumes itself, and the
//! dependency options it deliberately leaves alone. Sub-project and target
//! selections are listed in their own tables and folded into the catalog
//! index the first time it is used.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use crate::core::options::{OptionSet, OptionValue};
use crate::core::sanitizer::SanitizerMode;
use crate::util::diagnostic::ConfigError;

/// The value type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `True` / `False`
    Bool,
    /// One of a fixed list of names
    Choice(&'static [&'static str]),
    /// Free-form string passed through verbatim
    Any,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Bool => f.write_str("True, False"),
            OptionKind::Choice(names) => f.write_str(&names.join(", ")),
            OptionKind::Any => f.write_str("ANY"),
        }
    }
}

/// Which side(s) of the wrapper/dependency boundary an option lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    /// Declared identically by the wrapper and the dependency.
    Mirrored,
    /// Consumed only by the wrapper.
    WrapperOnly,
    /// Declared by the dependency; known here but never set.
    Passthrough,
}

/// Default value of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    Bool(bool),
    Text(&'static str),
    /// No default; the option is only present when set explicitly.
    None,
}

impl OptionDefault {
    pub fn to_value(&self) -> Option<OptionValue> {
        match self {
            OptionDefault::Bool(b) => Some(OptionValue::Bool(*b)),
            OptionDefault::Text(s) => Some(OptionValue::Text(s.to_string())),
            OptionDefault::None => None,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
    pub default: OptionDefault,
    pub scope: OptionScope,
    pub help: &'static str,
}

impl OptionSpec {
    const fn flag(key: &'static str, default: bool, scope: OptionScope, help: &'static str) -> Self {
        OptionSpec {
            key,
            kind: OptionKind::Bool,
            default: OptionDefault::Bool(default),
            scope,
            help,
        }
    }

    /// Parse a raw command-line or config string into a value of this option's kind.
    pub fn parse_value(&self, raw: &str) -> Result<OptionValue, ConfigError> {
        let raw = raw.trim();
        match self.kind {
            OptionKind::Bool => parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| self.invalid(raw)),
            OptionKind::Choice(names) => names
                .iter()
                .find(|n| n.eq_ignore_ascii_case(raw))
                .map(|n| OptionValue::Text(n.to_string()))
                .ok_or_else(|| self.invalid(raw)),
            OptionKind::Any if raw.is_empty() => Err(self.invalid(raw)),
            OptionKind::Any => Ok(OptionValue::Text(raw.to_string())),
        }
    }

    /// Check that an already-typed value fits this option, normalising choice names.
    pub fn validate(&self, value: &OptionValue) -> Result<OptionValue, ConfigError> {
        match (self.kind, value) {
            (_, OptionValue::Inherit) => Ok(OptionValue::Inherit),
            (OptionKind::Bool, OptionValue::Bool(b)) => Ok(OptionValue::Bool(*b)),
            (_, OptionValue::Text(s)) => self.parse_value(s),
            (_, other) => Err(self.invalid(&other.to_string())),
        }
    }

    fn invalid(&self, raw: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.key.to_string(),
            value: raw.to_string(),
            expected: self.kind.to_string(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// An LLVM sub-project selectable in the dependency build.
#[derive(Debug, Clone, Copy)]
pub struct Project {
    pub name: &'static str,
    pub option: &'static str,
    pub default: bool,
}

/// An LLVM code-generation target.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub name: &'static str,
    pub option: &'static str,
    pub default: bool,
}

pub static PROJECTS: &[Project] = &[
    Project { name: "clang", option: "with_clang", default: true },
    Project { name: "clang-tools-extra", option: "with_clang_tools_extra", default: true },
    Project { name: "compiler-rt", option: "with_compiler_rt", default: true },
    Project { name: "libcxx", option: "with_libcxx", default: true },
    Project { name: "libcxxabi", option: "with_libcxxabi", default: true },
    Project { name: "libunwind", option: "with_libunwind", default: true },
    Project { name: "lld", option: "with_lld", default: true },
    Project { name: "lldb", option: "with_lldb", default: false },
    Project { name: "openmp", option: "with_openmp", default: false },
    Project { name: "polly", option: "with_polly", default: false },
    Project { name: "debuginfo-tests", option: "with_debuginfo_tests", default: false },
    Project { name: "parallel-libs", option: "with_parallel_libs", default: false },
    Project { name: "pstl", option: "with_pstl", default: false },
];

pub static TARGETS: &[Target] = &[
    Target { name: "AArch64", option: "target_aarch64", default: true },
    Target { name: "AMDGPU", option: "target_amdgpu", default: false },
    Target { name: "ARM", option: "target_arm", default: true },
    Target { name: "BPF", option: "target_bpf", default: false },
    Target { name: "Hexagon", option: "target_hexagon", default: false },
    Target { name: "Lanai", option: "target_lanai", default: false },
    Target { name: "Mips", option: "target_mips", default: false },
    Target { name: "MSP430", option: "target_msp430", default: false },
    Target { name: "NVPTX", option: "target_nvptx", default: true },
    Target { name: "PowerPC", option: "target_powerpc", default: false },
    Target { name: "RISCV", option: "target_riscv", default: false },
    Target { name: "Sparc", option: "target_sparc", default: false },
    Target { name: "SystemZ", option: "target_systemz", default: false },
    Target { name: "WebAssembly", option: "target_webassembly", default: true },
    Target { name: "X86", option: "target_x86", default: true },
    Target { name: "XCore", option: "target_xcore", default: false },
];

/// Libraries exposed to consumers when `link_with_llvm_libs` is set, in link order.
pub static LLVM_LIBRARIES: &[&str] = &[
    "clangTooling",
    "clangFrontend",
    "clangDriver",
    "clangSerialization",
    "clangParse",
    "clangSema",
    "clangAnalysis",
    "clangEdit",
    "clangAST",
    "clangLex",
    "clangBasic",
    "LLVMOption",
    "LLVMSupport",
    "LLVMDemangle",
];

use OptionScope::{Mirrored, Passthrough, WrapperOnly};

pub static OPTIONS: &[OptionSpec] = &[
    OptionSpec::flag("force_x86_64", true, Mirrored, "Use the x86_64 build of the toolchain"),
    OptionSpec::flag("link_ltinfo", false, Mirrored, "Link libtinfo into LLVM tools"),
    OptionSpec::flag(
        "include_what_you_use",
        false,
        Mirrored,
        "Build and export include-what-you-use",
    ),
    OptionSpec::flag("enable_msan", false, Mirrored, "Build the memory sanitizer runtime"),
    OptionSpec::flag("enable_tsan", false, Mirrored, "Build the thread sanitizer runtime"),
    OptionSpec::flag("enable_ubsan", false, Mirrored, "Build the UB sanitizer runtime"),
    OptionSpec::flag("enable_asan", false, Mirrored, "Build the address sanitizer runtime"),
    OptionSpec {
        key: "use_sanitizer",
        kind: OptionKind::Choice(SanitizerMode::NAMES),
        default: OptionDefault::Text("None"),
        scope: Mirrored,
        help: "Sanitizer the dependency is instrumented with",
    },
    OptionSpec::flag("link_libcxx", true, Mirrored, "Link against the bundled libc++"),
    OptionSpec::flag(
        "link_with_llvm_libs",
        false,
        Mirrored,
        "Expose LLVM/clang libraries for libtooling consumers",
    ),
    OptionSpec {
        key: "llvm_build_type",
        kind: OptionKind::Any,
        default: OptionDefault::None,
        scope: Passthrough,
        help: "CMake build type of the dependency",
    },
    OptionSpec::flag("shared", false, Passthrough, "Build shared LLVM libraries"),
    OptionSpec::flag("fPIC", true, Passthrough, "Position independent code"),
    OptionSpec::flag(
        "compile_with_clang",
        true,
        WrapperOnly,
        "Export the bundled clang as CC/CXX",
    ),
    OptionSpec::flag(
        "link_runtime_libs",
        true,
        WrapperOnly,
        "Add the C++ runtime matching compiler.libcxx to the link",
    ),
];

static INDEX: LazyLock<BTreeMap<&'static str, OptionSpec>> = LazyLock::new(|| {
    let mut index: BTreeMap<&'static str, OptionSpec> =
        OPTIONS.iter().map(|spec| (spec.key, *spec)).collect();

    for project in PROJECTS {
        index.insert(
            project.option,
            OptionSpec::flag(project.option, project.default, Mirrored, project.name),
        );
    }

    for target in TARGETS {
        index.insert(
            target.option,
            OptionSpec::flag(target.option, target.default, Mirrored, target.name),
        );
    }

    index
});

/// Look up a catalog entry.
pub fn lookup(key: &str) -> Option<&'static OptionSpec> {
    INDEX.get(key)
}

/// Look up a catalog entry, failing on unknown keys.
pub fn require(key: &str) -> Result<&'static OptionSpec, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::UnknownOption {
        key: key.to_string(),
    })
}

/// All catalog entries, in key order.
pub fn all() -> impl Iterator<Item = &'static OptionSpec> {
    INDEX.values()
}

/// Keys of one scope.
pub fn keys_in(scope: OptionScope) -> BTreeSet<&'static str> {
    all().filter(|s| s.scope == scope).map(|s| s.key).collect()
}

/// Keys mirrored between wrapper and dependency.
pub fn mirrored_keys() -> BTreeSet<&'static str> {
    keys_in(Mirrored)
}

/// Every key the catalog knows about.
pub fn known_keys() -> BTreeSet<&'static str> {
    all().map(|s| s.key).collect()
}

/// Default wrapper option set (mirrored and wrapper-only options with a default).
pub fn wrapper_defaults() -> OptionSet {
    all()
        .filter(|s| s.scope != Passthrough)
        .filter_map(|s| s.default.to_value().map(|v| (s.key.to_string(), v)))
        .collect()
}

/// The option set the dependency declares when left at its defaults.
pub fn dependency_defaults() -> OptionSet {
    all()
        .filter(|s| s.scope != WrapperOnly)
        .filter_map(|s| s.default.to_value().map(|v| (s.key.to_string(), v)))
        .collect()
}

/// Parse `key=value` into a typed option.
pub fn parse_assignment(raw: &str) -> Result<(String, OptionValue), ConfigError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(ConfigError::InvalidValue {
            key: raw.to_string(),
            value: String::new(),
            expected: "key=value".to_string(),
        });
    };
    let spec = require(key.trim())?;
    Ok((spec.key.to_string(), spec.parse_value(value)?))
}

/// Validate every entry of `options` against the catalog, normalising values.
pub fn validate_set(options: &OptionSet) -> Result<OptionSet, ConfigError> {
    options
        .iter()
        .map(|(key, value)| {
            let spec = require(key)?;
            Ok((key.to_string(), spec.validate(value)?))
        })
        .collect()
}
