//! Compiler and linker flag composition.
//!
//! [`compose`] turns a resolved toolchain and the selected options into a
//! [`FlagBundle`]: compile flags, link flags and environment assignments.
//! Token lists are append-only while composing; the `CXXFLAGS`, `CFLAGS`
//! and `LDFLAGS` variables are joined once, after every other step.

use std::path::PathBuf;

use glob::Pattern;
use serde::Serialize;

use crate::builder::env::EnvMap;
use crate::builder::toolchain::{
    AnalysisTool, ToolMap, ToolName, ToolchainLayout, ToolchainRoot,
};
use crate::core::catalog::LLVM_LIBRARIES;
use crate::core::options::OptionSet;
use crate::core::sanitizer::{SanitizerFlavor, SanitizerMode};
use crate::core::settings::{CompilerFamily, CppRuntime, Settings};
use crate::util::diagnostic::ConfigError;
use crate::util::fs::matching_files;

/// Flags that select a C++ runtime other than libc++.
pub const FOREIGN_RUNTIME_FLAGS: &[&str] = &["-stdlib=libstdc++", "-static-libstdc++"];

/// Flags inherited from the calling environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritedFlags {
    pub cxxflags: Vec<String>,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
}

impl InheritedFlags {
    /// Split space-separated flag strings into tokens.
    pub fn from_strings(cxxflags: &str, cflags: &str, ldflags: &str) -> Self {
        let split = |s: &str| s.split_whitespace().map(String::from).collect();
        InheritedFlags {
            cxxflags: split(cxxflags),
            cflags: split(cflags),
            ldflags: split(ldflags),
        }
    }
}

/// Inputs of a composition besides the resolved tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Compiler family of the consuming build
    pub compiler: CompilerFamily,
    /// C++ runtime of the consuming build
    pub libcxx: CppRuntime,
    /// Platform-detected sanitizer
    pub sanitizer_mode: SanitizerMode,
    /// Sanitizer requested on the dependency (`use_sanitizer`)
    pub requested_sanitizer: SanitizerMode,
    pub link_libcxx: bool,
    pub link_runtime_libs: bool,
    pub link_with_llvm_libs: bool,
    /// compiler-rt OS directory (`linux`, `darwin`, ...)
    pub runtime_os_dir: String,
    /// compiler-rt architecture suffix of the build machine
    pub runtime_arch: String,
}

impl ComposeOptions {
    /// Derive composition inputs from settings, wrapper options and the
    /// synchronised dependency options.
    pub fn new(settings: &Settings, wrapper: &OptionSet, dependency: &OptionSet) -> Self {
        let requested_sanitizer = dependency
            .text("use_sanitizer")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        ComposeOptions {
            compiler: settings.compiler,
            libcxx: settings.libcxx,
            sanitizer_mode: settings.sanitizer,
            requested_sanitizer,
            link_libcxx: wrapper.bool_or("link_libcxx", true),
            link_runtime_libs: wrapper.bool_or("link_runtime_libs", true),
            link_with_llvm_libs: wrapper.bool_or("link_with_llvm_libs", false),
            runtime_os_dir: settings.runtime_os_dir(),
            runtime_arch: settings.runtime_arch(),
        }
    }

    /// Whether libc++ replaces the default C++ runtime.
    pub fn uses_libcxx(&self) -> bool {
        self.link_libcxx && self.compiler.is_clang()
    }
}

/// Check the sanitizer preconditions. Runs before anything is emitted.
pub fn check_sanitizer(opts: &ComposeOptions) -> Result<(), ConfigError> {
    let mode = opts.sanitizer_mode;
    if mode.is_none() {
        if !opts.requested_sanitizer.is_none() {
            tracing::warn!(
                "dependency is instrumented with `{}` but the build enables no sanitizer",
                opts.requested_sanitizer
            );
        }
        return Ok(());
    }

    if !opts.compiler.is_clang() {
        return Err(ConfigError::SanitizerRequiresClang {
            sanitizer: mode.to_string(),
            compiler: opts.compiler.to_string(),
        });
    }

    if !opts.link_libcxx || opts.libcxx != CppRuntime::Libcxx {
        return Err(ConfigError::SanitizerRequiresLibcxx);
    }

    if opts.requested_sanitizer != mode {
        return Err(ConfigError::SanitizerMismatch {
            detected: mode.to_string(),
            requested: opts.requested_sanitizer.to_string(),
        });
    }

    Ok(())
}

/// Everything a consuming build needs from the toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagBundle {
    /// C++ compile flags (inherited first)
    pub cxxflags: Vec<String>,
    /// C compile flags (inherited first)
    pub cflags: Vec<String>,
    /// Link flags (inherited first)
    pub ldflags: Vec<String>,
    /// Extra flags for linking shared libraries
    pub shared_link_flags: Vec<String>,
    /// Extra flags for linking executables
    pub exe_link_flags: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub lib_dirs: Vec<PathBuf>,
    /// Libraries to link, without `-l`
    pub libs: Vec<String>,
    /// Runtime libraries loaded before the program's own
    pub preload: Vec<PathBuf>,
    /// Environment assignments
    pub env: EnvMap,
}

impl FlagBundle {
    /// Compile flags, space-joined.
    pub fn compile_flags(&self) -> String {
        self.cxxflags.join(" ")
    }

    /// Link flags, space-joined.
    pub fn link_flags(&self) -> String {
        self.ldflags.join(" ")
    }
}

/// Compose the flag bundle for a resolved toolchain.
///
/// `tools` is empty when clang is not used; compiler and linker variables
/// are then left to the consumer's platform toolchain.
pub fn compose(
    root: &ToolchainRoot,
    layout: &ToolchainLayout,
    tools: &ToolMap,
    opts: &ComposeOptions,
    inherited: &InheritedFlags,
) -> Result<FlagBundle, ConfigError> {
    check_sanitizer(opts)?;

    let mut bundle = FlagBundle::default();
    let lib_dir = layout.lib_dir(root);

    let uses_libcxx = opts.uses_libcxx();
    if opts.link_libcxx && !uses_libcxx {
        tracing::warn!(
            "link_libcxx is ignored for compiler `{}`, libc++ needs clang",
            opts.compiler
        );
    }

    bundle.cxxflags = strip_foreign_runtime(&inherited.cxxflags, uses_libcxx, "CXXFLAGS");
    bundle.cflags = strip_foreign_runtime(&inherited.cflags, uses_libcxx, "CFLAGS");
    bundle.ldflags = strip_foreign_runtime(&inherited.ldflags, uses_libcxx, "LDFLAGS");

    bundle.env.set_path("LLVM_NORMPATH", root.path());

    for tool in AnalysisTool::ALL {
        let path = layout.analysis_tool_path(root, tool);
        if path.is_file() {
            bundle.env.set_path(tool.env_var(), &path);
        }
    }

    bundle.include_dirs.push(root.path().to_path_buf());
    bundle.include_dirs.push(layout.include_dir(root));
    bundle.lib_dirs.push(lib_dir.clone());

    bundle.env.append_path("LD_LIBRARY_PATH", &lib_dir);
    bundle.env.append_path("PATH", layout.bin_dir(root));
    bundle.env.append_path("PATH", layout.libexec_dir(root));

    for (name, tool) in tools {
        bundle.env.set_path(name.env_var(), &tool.path);
    }

    if uses_libcxx {
        add_libcxx_flags(&mut bundle, root, layout);
    }

    if opts.link_runtime_libs {
        let runtime = if uses_libcxx {
            CppRuntime::Libcxx
        } else {
            opts.libcxx
        };
        bundle
            .libs
            .extend(runtime.link_libs(opts.compiler).into_iter().map(String::from));
    }

    if opts.link_with_llvm_libs {
        bundle.libs.extend(LLVM_LIBRARIES.iter().map(|s| s.to_string()));
    }

    if !opts.sanitizer_mode.is_none() {
        add_sanitizer(&mut bundle, root, layout, tools, opts);
    }

    // Joined last: every step above may still append.
    for (key, tokens) in [
        ("CXXFLAGS", &bundle.cxxflags),
        ("CFLAGS", &bundle.cflags),
        ("LDFLAGS", &bundle.ldflags),
    ] {
        if !tokens.is_empty() {
            bundle.env.set(key, tokens.join(" "));
        }
    }

    Ok(bundle)
}

fn strip_foreign_runtime(flags: &[String], uses_libcxx: bool, var: &str) -> Vec<String> {
    if !uses_libcxx {
        return flags.to_vec();
    }
    flags
        .iter()
        .filter(|flag| {
            let foreign = FOREIGN_RUNTIME_FLAGS.contains(&flag.as_str());
            if foreign {
                tracing::info!("removing `{}` from inherited {}", flag, var);
            }
            !foreign
        })
        .cloned()
        .collect()
}

fn add_libcxx_flags(bundle: &mut FlagBundle, root: &ToolchainRoot, layout: &ToolchainLayout) {
    let lib_dir = layout.lib_dir(root).display().to_string();
    let rpath = format!("-Wl,-rpath,{}", lib_dir);
    let link_libs = ["-lc++", "-lc++abi", "-lunwind"];

    for flags in [&mut bundle.shared_link_flags, &mut bundle.exe_link_flags] {
        flags.extend(link_libs.iter().map(|s| s.to_string()));
        flags.push(rpath.clone());
        flags.push("-stdlib=libc++".to_string());
    }

    bundle.ldflags.push("-stdlib=libc++".to_string());
    bundle.ldflags.push(format!("-L{}", lib_dir));
    bundle.ldflags.push(rpath.clone());
    bundle.ldflags.extend(link_libs.iter().map(|s| s.to_string()));

    bundle.cxxflags.extend(
        [
            "-Wno-unused-command-line-argument",
            "-Wno-error=unused-command-line-argument",
            "-nostdinc++",
            "-nodefaultlibs",
            "-lc++abi",
            "-lc++",
            "-lm",
            "-lc",
            "-stdlib=libc++",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    for dir in [
        layout.libcxx_include_dir(root),
        layout.include_dir(root),
        layout.resource_include_dir(root),
    ] {
        bundle.cxxflags.push(format!("-isystem{}", dir.display()));
    }
    bundle.cxxflags.push(format!("-L{}", lib_dir));
    bundle.cxxflags.push(rpath);
    bundle
        .cxxflags
        .push(format!("-resource-dir={}", layout.resource_dir(root).display()));
}

fn add_sanitizer(
    bundle: &mut FlagBundle,
    root: &ToolchainRoot,
    layout: &ToolchainLayout,
    tools: &ToolMap,
    opts: &ComposeOptions,
) {
    let mode = opts.sanitizer_mode;

    if let Some(flag) = mode.fsanitize_flag() {
        for flags in [&mut bundle.cxxflags, &mut bundle.cflags] {
            flags.push(flag.clone());
            flags.push("-fno-omit-frame-pointer".to_string());
        }
        bundle.ldflags.push(flag);
    }

    let runtime_dir = layout.runtime_dir(root, &opts.runtime_os_dir);
    for flavor in mode.flavors() {
        let pattern = runtime_pattern(*flavor, &opts.runtime_os_dir, &opts.runtime_arch);
        let found = matching_files(&runtime_dir, &pattern).unwrap_or_else(|e| {
            tracing::warn!("cannot list sanitizer runtimes in {}: {:#}", runtime_dir.display(), e);
            Vec::new()
        });
        if found.is_empty() {
            tracing::warn!(
                "no {} runtime found in {}",
                flavor.short_name(),
                runtime_dir.display()
            );
        }
        bundle.preload.extend(found);
    }

    let preload_var = if opts.runtime_os_dir == "darwin" {
        "DYLD_INSERT_LIBRARIES"
    } else {
        "LD_PRELOAD"
    };
    for lib in &bundle.preload {
        bundle.env.append_path(preload_var, lib);
    }

    let symbolizer = tools
        .get(&ToolName::Symbolizer)
        .map(|t| t.path.clone())
        .unwrap_or_else(|| layout.tool_path(root, ToolName::Symbolizer));
    for flavor in SanitizerFlavor::ALL {
        bundle.env.set_path(flavor.symbolizer_var(), &symbolizer);
    }
}

/// File name of the shared runtime of `flavor`. Darwin runtimes are
/// universal binaries; elsewhere only the build machine's architecture is
/// loadable.
fn runtime_pattern(flavor: SanitizerFlavor, os_dir: &str, arch: &str) -> String {
    if os_dir == "darwin" {
        format!("libclang_rt.{}_osx_dynamic.dylib", flavor.runtime_stem())
    } else {
        format!(
            "libclang_rt.{}-{}.so",
            flavor.runtime_stem(),
            Pattern::escape(arch)
        )
    }
}
