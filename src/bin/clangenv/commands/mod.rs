//! Command implementations

pub mod check;
pub mod completions;
pub mod env;
pub mod flags;
pub mod options;
pub mod package_id;
pub mod probe;
pub mod tools;

use anyhow::{bail, Context, Result};

use crate::cli::ConfigArgs;
use clangenv::core::catalog;
use clangenv::ops::ConfigureOptions;
use clangenv::util::config::{global_config_path, load_config, project_config_path};

/// Version-qualified package variables, read when the `LLVM_PKG_*`
/// overrides are unset.
const VERSIONED_PKG_VARS: [&str; 3] = ["LLVM_9_PKG_NAME", "LLVM_9_PKG_VER", "LLVM_9_PKG_CHANNEL"];

/// Merge the configuration files with the command-line overrides.
pub fn load_options(args: &ConfigArgs) -> Result<ConfigureOptions> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let project = match &args.config {
        Some(path) if !path.is_file() => bail!("config file {} not found", path.display()),
        Some(path) => path.clone(),
        None => project_config_path(&cwd),
    };
    let global = global_config_path().unwrap_or_default();

    let config = load_config(&global, &project)?;
    let mut opts = ConfigureOptions::from_config(&config);

    if let Some(root) = &args.root {
        opts.root = Some(root.clone());
    }
    if let Some(version) = &args.clang_version {
        opts.clang_version = Some(version.clone());
    }
    for raw in &args.options {
        let (key, value) = catalog::parse_assignment(raw)?;
        opts.options.set(key, value);
    }
    opts.settings.extend(args.settings.iter().cloned());
    let [name_var, version_var, channel_var] = VERSIONED_PKG_VARS;
    opts.package = opts.package.with_overrides(
        env_fallback(&args.pkg_name, name_var),
        env_fallback(&args.pkg_version, version_var),
        env_fallback(&args.pkg_channel, channel_var),
    );

    tracing::debug!("dependency {}", opts.package);
    Ok(opts)
}

fn env_fallback(value: &Option<String>, var: &str) -> Option<String> {
    value
        .clone()
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
}
