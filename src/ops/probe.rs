//! Smoke test of a configured toolchain against a probe executable.
//!
//! The probe is typically a clang tool built against the toolchain. It runs
//! with the exported environment on top of the caller's. Without sanitizers
//! it is asked for its version and then pointed at a source file with the
//! libc++ and resource-directory flags; with sanitizers it runs bare.

use std::path::{Path, PathBuf};

use crate::builder::flags::FlagBundle;
use crate::builder::toolchain::{ToolchainLayout, ToolchainRoot};
use crate::util::diagnostic::ProbeError;
use crate::util::process::{find_executable, ProcessBuilder};

/// Flags a clang tool needs to find libc++ and the builtin headers.
pub fn probe_flags(root: &ToolchainRoot, layout: &ToolchainLayout) -> Vec<String> {
    vec![
        "-nostdinc++".to_string(),
        format!("-I{}", layout.libcxx_include_dir(root).display()),
        format!("-isystem{}", layout.include_dir(root).display()),
        format!("-isystem{}", layout.resource_include_dir(root).display()),
        format!("-resource-dir={}", layout.resource_dir(root).display()),
    ]
}

/// Locate the probe. A bare name is looked up in `PATH`.
pub fn locate_probe(binary: &Path) -> Result<PathBuf, ProbeError> {
    if binary.is_file() {
        return Ok(binary.to_path_buf());
    }

    let bare = binary.components().count() == 1;
    bare.then(|| find_executable(&binary.to_string_lossy()))
        .flatten()
        .ok_or_else(|| ProbeError::NotFound {
            binary: binary.to_path_buf(),
        })
}

/// Run the probe against a configured toolchain.
pub fn probe(
    binary: &Path,
    bundle: &FlagBundle,
    root: &ToolchainRoot,
    layout: &ToolchainLayout,
    sanitized: bool,
    source: Option<&Path>,
) -> Result<(), ProbeError> {
    let binary = locate_probe(binary)?;
    let env = bundle.env.render_run_env(|key| std::env::var(key).ok());
    let base = ProcessBuilder::new(&binary).envs(env);

    if sanitized {
        return run(&base);
    }

    run(&base.clone().arg("--version"))?;

    let mut cmd = base.args(
        probe_flags(root, layout)
            .iter()
            .map(|flag| format!("-extra-arg={}", flag)),
    );
    if let Some(source) = source {
        cmd = cmd.arg(source);
    }
    run(&cmd)
}

fn run(cmd: &ProcessBuilder) -> Result<(), ProbeError> {
    let command = cmd.display_command();
    tracing::info!("running {}", command);

    let output = cmd.exec().map_err(|e| ProbeError::Spawn {
        command: command.clone(),
        message: format!("{:#}", e),
    })?;

    if !output.status.success() {
        return Err(ProbeError::Failed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_flags() {
        let root = ToolchainRoot::new("/opt/llvm_9");
        let layout = ToolchainLayout::default();
        let flags = probe_flags(&root, &layout);

        assert_eq!(flags[0], "-nostdinc++");
        assert_eq!(
            flags[1],
            format!("-I{}", Path::new("/opt/llvm_9/include/c++/v1").display())
        );
        assert_eq!(
            flags[4],
            format!(
                "-resource-dir={}",
                Path::new("/opt/llvm_9/lib/clang/9.0.1").display()
            )
        );
    }

    #[test]
    fn test_missing_probe() {
        let err = locate_probe(Path::new("/nonexistent/dir/probe")).unwrap_err();
        assert!(matches!(err, ProbeError::NotFound { .. }));

        let err = locate_probe(Path::new("clangenv-no-such-probe")).unwrap_err();
        assert!(matches!(err, ProbeError::NotFound { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::builder::flags::{compose, ComposeOptions, InheritedFlags};
        use crate::builder::toolchain::resolve;
        use crate::core::catalog;
        use crate::core::settings::Settings;
        use crate::test_support::{write_script, ToolchainFixture};

        fn bundle_for(fixture: &ToolchainFixture) -> FlagBundle {
            let root = fixture.root();
            let layout = fixture.layout();
            let tools = resolve(&root, &layout, true).unwrap();
            let defaults = catalog::wrapper_defaults();
            let opts = ComposeOptions::new(&Settings::default(), &defaults, &defaults);
            compose(&root, &layout, &tools, &opts, &InheritedFlags::default()).unwrap()
        }

        fn recording_probe(fixture: &ToolchainFixture) -> (PathBuf, PathBuf) {
            let probe = fixture.path().join("probe");
            let log = fixture.path().join("calls.log");
            write_script(
                &probe,
                &format!("echo \"$LLVM_NORMPATH|$*\" >> '{}'", log.display()),
            );
            (probe, log)
        }

        #[test]
        fn test_probe_runs_version_then_extra_args() {
            let fixture = ToolchainFixture::complete();
            let (probe_bin, log) = recording_probe(&fixture);
            let bundle = bundle_for(&fixture);
            let source = fixture.path().join("main.cpp");

            probe(
                &probe_bin,
                &bundle,
                &fixture.root(),
                &fixture.layout(),
                false,
                Some(&source),
            )
            .unwrap();

            let calls = std::fs::read_to_string(&log).unwrap();
            let lines: Vec<&str> = calls.lines().collect();
            let root = fixture.root().to_string();

            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0], format!("{}|--version", root));
            assert!(lines[1].starts_with(&format!("{}|-extra-arg=-nostdinc++", root)));
            assert!(lines[1].ends_with("main.cpp"));
        }

        #[test]
        fn test_sanitized_probe_runs_bare() {
            let fixture = ToolchainFixture::complete();
            let (probe_bin, log) = recording_probe(&fixture);
            let bundle = bundle_for(&fixture);

            probe(&probe_bin, &bundle, &fixture.root(), &fixture.layout(), true, None).unwrap();

            let calls = std::fs::read_to_string(&log).unwrap();
            assert_eq!(calls, format!("{}|\n", fixture.root()));
        }

        #[test]
        fn test_failing_probe() {
            let fixture = ToolchainFixture::complete();
            let probe_bin = fixture.path().join("probe");
            write_script(&probe_bin, "echo broken >&2\nexit 3");

            let bundle = bundle_for(&fixture);

            let err = probe(
                &probe_bin,
                &bundle,
                &fixture.root(),
                &fixture.layout(),
                false,
                None,
            )
            .unwrap_err();

            match err {
                ProbeError::Failed { command, stderr, .. } => {
                    assert!(command.ends_with("--version"));
                    assert_eq!(stderr.trim(), "broken");
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }
}
