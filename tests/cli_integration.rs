//! CLI integration tests for clangenv.
//!
//! These tests run the binary against fake LLVM installations built in
//! temporary directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const TOOLS: &[&str] = &[
    "clang++",
    "clang",
    "llvm-ar",
    "llvm-strip",
    "ld.lld",
    "llvm-nm",
    "llvm-objdump",
    "llvm-symbolizer",
    "llvm-ranlib",
    "llvm-as",
    "llvm-rc",
];

/// A scratch workspace: a project directory, a home directory and an LLVM root.
struct Sandbox {
    tmp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("project")).unwrap();
        fs::create_dir_all(tmp.path().join("home")).unwrap();
        Sandbox { tmp }
    }

    /// A sandbox with a complete LLVM installation.
    fn with_toolchain() -> Self {
        let sandbox = Self::new();
        for tool in TOOLS {
            sandbox.touch(&format!("llvm/bin/{}{}", tool, std::env::consts::EXE_SUFFIX));
        }
        sandbox.touch("llvm/include/c++/v1/vector");
        sandbox.touch("llvm/lib/libc++.so");
        sandbox.touch("llvm/lib/clang/9.0.1/include/stddef.h");
        sandbox
    }

    fn touch(&self, rel: &str) -> PathBuf {
        let path = self.tmp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    fn root(&self) -> PathBuf {
        self.tmp.path().join("llvm")
    }

    fn project(&self) -> PathBuf {
        self.tmp.path().join("project")
    }

    fn write_project_config(&self, contents: &str) {
        let dir = self.project().join(".clangenv");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), contents).unwrap();
    }

    /// The clangenv binary, isolated from the caller's environment.
    fn clangenv(&self) -> Command {
        let mut cmd = Command::cargo_bin("clangenv").unwrap();
        cmd.current_dir(self.project())
            .env("HOME", self.tmp.path().join("home"))
            .env("USERPROFILE", self.tmp.path().join("home"));
        for var in [
            "LLVM_ROOT",
            "LLVM_PKG_NAME",
            "LLVM_PKG_VER",
            "LLVM_PKG_CHANNEL",
            "LLVM_9_PKG_NAME",
            "LLVM_9_PKG_VER",
            "LLVM_9_PKG_CHANNEL",
            "CXXFLAGS",
            "CFLAGS",
            "LDFLAGS",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// The clangenv binary pointed at the sandbox toolchain.
    fn clangenv_with_root(&self) -> Command {
        let mut cmd = self.clangenv();
        cmd.arg("--root").arg(self.root());
        cmd
    }
}

fn toml_path(path: &Path) -> String {
    format!("'{}'", path.display())
}

// ============================================================================
// clangenv env
// ============================================================================

#[test]
fn test_env_json_describes_toolchain() {
    let sandbox = Sandbox::with_toolchain();

    let output = sandbox
        .clangenv_with_root()
        .args(["env", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["package"], "llvm_9/master@conan/stable");
    assert_eq!(doc["clang_version"], "9.0.1");
    assert_eq!(doc["package_id"].as_str().unwrap().len(), 64);
    assert_eq!(doc["libs"], serde_json::json!(["c++"]));

    let env = &doc["env"];
    assert!(env["LLVM_NORMPATH"].as_str().unwrap().ends_with("llvm"));
    assert!(env["CXX"].as_str().unwrap().contains("clang++"));
    assert!(env["LD"].as_str().unwrap().contains("ld.lld"));
    assert!(env["CXXFLAGS"].as_str().unwrap().contains("-nostdinc++"));
    assert!(env.get("LD_PRELOAD").is_none());
}

#[test]
fn test_env_shell_format() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("export LLVM_NORMPATH="))
        .stdout(predicate::str::contains("export CXXFLAGS='"))
        .stdout(predicate::str::contains("${PATH}"));
}

#[test]
fn test_env_strips_inherited_libstdcxx() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .env("LDFLAGS", "-Wl,--as-needed -stdlib=libstdc++ -static-libstdc++")
        .args(["env", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LDFLAGS=-Wl,--as-needed"))
        .stdout(predicate::str::contains("libstdc++").not());
}

#[test]
fn test_env_requires_root() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv()
        .arg("env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("toolchain root is not configured"))
        .stderr(predicate::str::contains("--root"));
}

#[test]
fn test_env_reads_root_from_environment() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv()
        .env("LLVM_ROOT", sandbox.root())
        .args(["env", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LLVM_NORMPATH="));
}

#[test]
fn test_missing_tool_fails() {
    let sandbox = Sandbox::with_toolchain();
    fs::remove_file(
        sandbox
            .root()
            .join("bin")
            .join(format!("ld.lld{}", std::env::consts::EXE_SUFFIX)),
    )
    .unwrap();

    sandbox
        .clangenv_with_root()
        .arg("env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required tool `LD` not found"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_tools_allowed_without_clang() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.root()).unwrap();

    sandbox
        .clangenv_with_root()
        .args(["-o", "compile_with_clang=false", "env", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CXX=").not());
}

// ============================================================================
// option and settings errors
// ============================================================================

#[test]
fn test_unknown_option_fails() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["-o", "bogus=1", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option `bogus`"));
}

#[test]
fn test_invalid_choice_fails() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["-o", "use_sanitizer=Leak", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value `Leak`"));
}

#[test]
fn test_sanitizer_requires_clang() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["-s", "compiler=gcc", "-s", "sanitizer=Address", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires clang"));
}

#[test]
fn test_sanitizer_requires_dependency_request() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["-s", "sanitizer=Address", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("use_sanitizer"));
}

#[test]
fn test_sanitizer_exports_preload() {
    let sandbox = Sandbox::with_toolchain();
    sandbox.touch("llvm/lib/clang/9.0.1/lib/linux/libclang_rt.asan-x86_64.so");

    sandbox
        .clangenv_with_root()
        .args([
            "-o",
            "use_sanitizer=Address",
            "-s",
            "sanitizer=Address",
            "-s",
            "os_build=Linux",
            "-s",
            "arch_build=x86_64",
            "env",
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("libclang_rt.asan-x86_64.so"))
        .stdout(predicate::str::contains("ASAN_SYMBOLIZER_PATH="))
        .stdout(predicate::str::contains("-fsanitize=address"));
}

// ============================================================================
// configuration files
// ============================================================================

#[test]
fn test_project_config_supplies_root() {
    let sandbox = Sandbox::with_toolchain();
    sandbox.write_project_config(&format!("root = {}\n", toml_path(&sandbox.root())));

    sandbox
        .clangenv()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: llvm_9/master@conan/stable"))
        .stdout(predicate::str::contains("11 tools"));
}

#[test]
fn test_dependency_option_drift_fails() {
    let sandbox = Sandbox::with_toolchain();
    sandbox.write_project_config(
        "[dependency.options]\n\
         link_libcxx = true\n",
    );

    sandbox
        .clangenv_with_root()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be declared by dependency `llvm_9`"));
}

#[test]
fn test_malformed_config_fails() {
    let sandbox = Sandbox::with_toolchain();
    sandbox.write_project_config("root = [");

    sandbox
        .clangenv_with_root()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_explicit_config_must_exist() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["--config", "missing.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// clangenv options / package-id
// ============================================================================

#[test]
fn test_options_defaults_lists_catalog() {
    let sandbox = Sandbox::new();

    sandbox
        .clangenv()
        .args(["options", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("link_libcxx"))
        .stdout(predicate::str::contains("with_clang"))
        .stdout(predicate::str::contains("target_x86"))
        .stdout(predicate::str::contains("passthrough"));
}

#[test]
fn test_options_use_package_name_from_environment() {
    let sandbox = Sandbox::new();

    sandbox
        .clangenv()
        .env("LLVM_PKG_NAME", "llvm_10")
        .args(["-o", "link_ltinfo=true", "options"])
        .assert()
        .success()
        .stdout(predicate::str::contains("llvm_10:link_ltinfo=True"))
        .stdout(predicate::str::contains("compile_with_clang=True"));
}

#[test]
fn test_options_use_versioned_package_variables() {
    let sandbox = Sandbox::new();

    sandbox
        .clangenv()
        .env("LLVM_9_PKG_NAME", "llvm_9_custom")
        .env("LLVM_9_PKG_VER", "9.0.1")
        .env("LLVM_9_PKG_CHANNEL", "ci/testing")
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# Options of `llvm_9_custom/9.0.1@ci/testing`:",
        ));
}

#[test]
fn test_unversioned_package_variables_take_precedence() {
    let sandbox = Sandbox::new();

    sandbox
        .clangenv()
        .env("LLVM_PKG_NAME", "llvm_10")
        .env("LLVM_9_PKG_NAME", "llvm_9_custom")
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("llvm_10:"))
        .stdout(predicate::str::contains("llvm_9_custom").not());
}

#[test]
fn test_passthrough_option_cannot_be_set() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["-o", "shared=true", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "option `shared` belongs to the dependency",
        ))
        .stderr(predicate::str::contains("[dependency.options]"));
}

#[test]
fn test_package_id_is_stable_and_option_sensitive() {
    let sandbox = Sandbox::new();

    let run = |args: &[&str]| {
        let output = sandbox.clangenv().args(args).output().unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    };

    let first = run(&["package-id"]);
    let second = run(&["package-id"]);
    let changed = run(&["-o", "link_libcxx=false", "package-id"]);
    let other_compiler = run(&["-s", "compiler=gcc", "package-id"]);

    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(first, second);
    assert_ne!(first, changed);
    assert_eq!(first, other_compiler);
}

// ============================================================================
// clangenv flags / tools
// ============================================================================

#[test]
fn test_flags_compile_only() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["flags", "--compile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-nostdinc++"))
        .stdout(predicate::str::contains("-resource-dir="))
        .stdout(predicate::str::contains("# Link flags").not());
}

#[test]
fn test_flags_both_sections() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .arg("flags")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Compile flags for `llvm_9/master@conan/stable`"))
        .stdout(predicate::str::contains("# Link flags"))
        .stdout(predicate::str::contains("-lc++"));
}

#[test]
fn test_tools_lists_bin_dir() {
    let sandbox = Sandbox::with_toolchain();
    sandbox.touch(&format!("llvm/bin/clang-tidy{}", std::env::consts::EXE_SUFFIX));

    sandbox
        .clangenv_with_root()
        .args(["tools", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SYMBOLIZER"))
        .stdout(predicate::str::contains("CLANG_TIDY_PATH"))
        .stdout(predicate::str::contains("llvm-rc"));
}

// ============================================================================
// clangenv probe
// ============================================================================

#[cfg(unix)]
#[test]
fn test_probe_runs_in_exported_environment() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::with_toolchain();
    let probe = sandbox.tmp.path().join("probe.sh");
    let log = sandbox.tmp.path().join("probe.log");
    fs::write(
        &probe,
        format!("#!/bin/sh\necho \"$CXX $*\" >> '{}'\n", log.display()),
    )
    .unwrap();
    fs::set_permissions(&probe, fs::Permissions::from_mode(0o755)).unwrap();

    sandbox
        .clangenv_with_root()
        .arg("probe")
        .arg(&probe)
        .args(["--source", "main.cpp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passed"));

    let calls = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("clang++ --version"));
    assert!(lines[1].contains("-extra-arg=-nostdinc++"));
    assert!(lines[1].ends_with("main.cpp"));
}

#[cfg(unix)]
#[test]
fn test_probe_failure_is_reported() {
    let sandbox = Sandbox::with_toolchain();

    sandbox
        .clangenv_with_root()
        .args(["probe", "/nonexistent/probe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// clangenv completions
// ============================================================================

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .clangenv()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clangenv"));
}
