//! Toolchain layout and resolution.
//!
//! A prebuilt LLVM installation has a fixed layout below its root. This
//! module names every tool the wrapper exports, knows where each one lives
//! relative to the root, and resolves them to absolute paths.

use std::fmt;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Serialize;

use crate::util::fs::normalize_path;

mod resolve;
mod version;

pub use resolve::{resolve, ToolMap};
pub use version::{detect_clang_version, parse_clang_version};

/// Root directory of an installed toolchain distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainRoot(PathBuf);

impl ToolchainRoot {
    /// Create a root from a path, normalising `.` and `..` components.
    pub fn new(path: impl AsRef<Path>) -> Self {
        ToolchainRoot(normalize_path(path.as_ref()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.0.join(rel)
    }
}

impl fmt::Display for ToolchainRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A required toolchain executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ToolName {
    CxxCompiler,
    CCompiler,
    Archiver,
    Strip,
    Linker,
    SymbolLister,
    ObjectDumper,
    Symbolizer,
    Ranlib,
    Assembler,
    ResourceCompiler,
}

impl ToolName {
    /// Every required tool, in export order.
    pub const ALL: [ToolName; 11] = [
        ToolName::CxxCompiler,
        ToolName::CCompiler,
        ToolName::Archiver,
        ToolName::Strip,
        ToolName::Linker,
        ToolName::SymbolLister,
        ToolName::ObjectDumper,
        ToolName::Symbolizer,
        ToolName::Ranlib,
        ToolName::Assembler,
        ToolName::ResourceCompiler,
    ];

    /// Environment variable the tool is exported as.
    pub fn env_var(&self) -> &'static str {
        match self {
            ToolName::CxxCompiler => "CXX",
            ToolName::CCompiler => "CC",
            ToolName::Archiver => "AR",
            ToolName::Strip => "STRIP",
            ToolName::Linker => "LD",
            ToolName::SymbolLister => "NM",
            ToolName::ObjectDumper => "OBJDUMP",
            ToolName::Symbolizer => "SYMBOLIZER",
            ToolName::Ranlib => "RANLIB",
            ToolName::Assembler => "AS",
            ToolName::ResourceCompiler => "RC",
        }
    }

    /// Executable name inside `bin/` (without platform suffix).
    pub fn file_stem(&self) -> &'static str {
        match self {
            ToolName::CxxCompiler => "clang++",
            ToolName::CCompiler => "clang",
            ToolName::Archiver => "llvm-ar",
            ToolName::Strip => "llvm-strip",
            ToolName::Linker => "ld.lld",
            ToolName::SymbolLister => "llvm-nm",
            ToolName::ObjectDumper => "llvm-objdump",
            ToolName::Symbolizer => "llvm-symbolizer",
            ToolName::Ranlib => "llvm-ranlib",
            ToolName::Assembler => "llvm-as",
            ToolName::ResourceCompiler => "llvm-rc",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Analysis tools exported when the distribution ships them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AnalysisTool {
    IncludeWhatYouUse,
    ClangFormat,
    ScanBuild,
    ClangTidy,
    CppAnalyzer,
    CccAnalyzer,
}

impl AnalysisTool {
    pub const ALL: [AnalysisTool; 6] = [
        AnalysisTool::IncludeWhatYouUse,
        AnalysisTool::ClangFormat,
        AnalysisTool::ScanBuild,
        AnalysisTool::ClangTidy,
        AnalysisTool::CppAnalyzer,
        AnalysisTool::CccAnalyzer,
    ];

    pub fn env_var(&self) -> &'static str {
        match self {
            AnalysisTool::IncludeWhatYouUse => "IWYU_PATH",
            AnalysisTool::ClangFormat => "CLANG_FORMAT_PATH",
            AnalysisTool::ScanBuild => "SCAN_BUILD_PATH",
            AnalysisTool::ClangTidy => "CLANG_TIDY_PATH",
            AnalysisTool::CppAnalyzer => "CPP_ANALYZER_PATH",
            AnalysisTool::CccAnalyzer => "CCC_ANALYZER_PATH",
        }
    }

    /// Path relative to the root.
    pub fn relative_path(&self) -> &'static str {
        match self {
            AnalysisTool::IncludeWhatYouUse => "bin/include-what-you-use",
            AnalysisTool::ClangFormat => "bin/clang-format",
            AnalysisTool::ScanBuild => "bin/scan-build",
            AnalysisTool::ClangTidy => "bin/clang-tidy",
            AnalysisTool::CppAnalyzer => "libexec/c++-analyzer",
            AnalysisTool::CccAnalyzer => "libexec/ccc-analyzer",
        }
    }
}

/// A tool resolved to an absolute path that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTool {
    pub name: ToolName,
    pub path: PathBuf,
}

/// The fixed directory layout of an LLVM distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainLayout {
    /// Version naming the clang resource directory (`lib/clang/<version>`)
    pub clang_version: Version,
    /// Suffix appended to executable names
    pub exe_suffix: &'static str,
}

impl Default for ToolchainLayout {
    fn default() -> Self {
        ToolchainLayout {
            clang_version: Version::new(9, 0, 1),
            exe_suffix: std::env::consts::EXE_SUFFIX,
        }
    }
}

impl ToolchainLayout {
    /// Layout for a specific clang version.
    pub fn with_version(clang_version: Version) -> Self {
        ToolchainLayout {
            clang_version,
            ..ToolchainLayout::default()
        }
    }

    pub fn bin_dir(&self, root: &ToolchainRoot) -> PathBuf {
        root.join("bin")
    }

    pub fn libexec_dir(&self, root: &ToolchainRoot) -> PathBuf {
        root.join("libexec")
    }

    pub fn lib_dir(&self, root: &ToolchainRoot) -> PathBuf {
        root.join("lib")
    }

    pub fn include_dir(&self, root: &ToolchainRoot) -> PathBuf {
        root.join("include")
    }

    /// libc++ headers.
    pub fn libcxx_include_dir(&self, root: &ToolchainRoot) -> PathBuf {
        root.join("include").join("c++").join("v1")
    }

    /// Clang resource directory.
    pub fn resource_dir(&self, root: &ToolchainRoot) -> PathBuf {
        root.join("lib")
            .join("clang")
            .join(self.clang_version.to_string())
    }

    /// Compiler builtin headers.
    pub fn resource_include_dir(&self, root: &ToolchainRoot) -> PathBuf {
        self.resource_dir(root).join("include")
    }

    /// Directory holding compiler-rt runtimes for `os_dir` (`linux`, `darwin`, ...).
    pub fn runtime_dir(&self, root: &ToolchainRoot, os_dir: &str) -> PathBuf {
        self.resource_dir(root).join("lib").join(os_dir)
    }

    /// Expected location of a required tool.
    pub fn tool_path(&self, root: &ToolchainRoot, tool: ToolName) -> PathBuf {
        self.bin_dir(root)
            .join(format!("{}{}", tool.file_stem(), self.exe_suffix))
    }

    /// Expected location of an analysis tool.
    pub fn analysis_tool_path(&self, root: &ToolchainRoot, tool: AnalysisTool) -> PathBuf {
        root.join(format!("{}{}", tool.relative_path(), self.exe_suffix))
    }
}
