//! Clang version detection for the resource directory.

use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use semver::Version;

use crate::util::process::ProcessBuilder;

use super::{ToolName, ToolchainLayout, ToolchainRoot};

static CLANG_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"clang version (\d+\.\d+\.\d+)").expect("valid clang version regex")
});

/// Extract the version from `clang --version` output.
pub fn parse_clang_version(output: &str) -> Option<Version> {
    CLANG_VERSION_RE
        .captures(output)
        .and_then(|c| Version::parse(&c[1]).ok())
}

/// Determine the clang version of an installation.
///
/// Prefers the highest version directory under `lib/clang`; falls back to
/// asking the bundled compiler.
pub fn detect_clang_version(root: &ToolchainRoot) -> Result<Version> {
    let clang_dir = root.join("lib").join("clang");

    if clang_dir.is_dir() {
        let mut versions: Vec<Version> = std::fs::read_dir(&clang_dir)
            .with_context(|| format!("failed to read directory: {}", clang_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| Version::parse(&entry.file_name().to_string_lossy()).ok())
            .collect();
        versions.sort();

        if let Some(version) = versions.pop() {
            tracing::debug!("clang resource directory version {}", version);
            return Ok(version);
        }
    }

    let clang = ToolchainLayout::default().tool_path(root, ToolName::CCompiler);
    if !clang.is_file() {
        bail!(
            "cannot determine clang version: no version directory in {} and no {}",
            clang_dir.display(),
            clang.display()
        );
    }

    let output = ProcessBuilder::new(&clang).arg("--version").exec_and_check()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    parse_clang_version(&stdout)
        .with_context(|| format!("unrecognized `{} --version` output", clang.display()))
}
