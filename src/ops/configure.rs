//! The configuration pipeline.
//!
//! catalog → synchronize → resolve → compose, strictly in that order. Any
//! error aborts the pipeline; nothing is emitted for a failed run.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use semver::Version;

use crate::builder::flags::{check_sanitizer, compose, ComposeOptions, FlagBundle, InheritedFlags};
use crate::builder::toolchain::{
    detect_clang_version, resolve, ToolMap, ToolchainLayout, ToolchainRoot,
};
use crate::core::catalog::{self, OptionScope};
use crate::core::options::OptionSet;
use crate::core::package_id::package_id;
use crate::core::package_ref::PackageRef;
use crate::core::settings::Settings;
use crate::ops::synchronize::{synchronize, verify_consistency};
use crate::util::config::Config;
use crate::util::diagnostic::ConfigError;

/// Inputs of a configuration run.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Toolchain root handed over by dependency resolution
    pub root: Option<PathBuf>,

    /// `lib/clang/<version>` to use; `auto` detects it, `None` uses the default
    pub clang_version: Option<String>,

    /// Wrapper option values, on top of the catalog defaults
    pub options: OptionSet,

    /// `key=value` settings, applied in order
    pub settings: Vec<String>,

    /// The wrapped dependency
    pub package: PackageRef,

    /// Options declared by the dependency; the catalog defaults when `None`
    pub dependency_options: Option<OptionSet>,

    /// Inherited CXXFLAGS / CFLAGS / LDFLAGS
    pub inherited: InheritedFlags,
}

impl ConfigureOptions {
    /// Build from merged configuration files. Flags not set in the
    /// configuration are read from the process environment.
    pub fn from_config(config: &Config) -> Self {
        let flag = |configured: &Option<String>, key: &str| {
            configured
                .clone()
                .unwrap_or_else(|| std::env::var(key).unwrap_or_default())
        };

        ConfigureOptions {
            root: config.root.clone(),
            clang_version: config.clang_version.clone(),
            options: config.options.clone(),
            settings: config
                .settings
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect(),
            package: PackageRef::default().with_overrides(
                config.dependency.name.clone(),
                config.dependency.version.clone(),
                config.dependency.channel.clone(),
            ),
            dependency_options: config.dependency.options.clone(),
            inherited: InheritedFlags::from_strings(
                &flag(&config.flags.cxxflags, "CXXFLAGS"),
                &flag(&config.flags.cflags, "CFLAGS"),
                &flag(&config.flags.ldflags, "LDFLAGS"),
            ),
        }
    }
}

/// Options checked and synchronised, before anything touches the disk.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub package: PackageRef,
    /// Wrapper options, defaults included
    pub options: OptionSet,
    /// Options handed to the dependency
    pub dependency_options: OptionSet,
    pub settings: Settings,
    pub compose: ComposeOptions,
}

/// Result of a full configuration run.
#[derive(Debug, Clone)]
pub struct Configured {
    pub package: PackageRef,
    pub options: OptionSet,
    pub dependency_options: OptionSet,
    pub settings: Settings,
    pub root: ToolchainRoot,
    pub layout: ToolchainLayout,
    pub tools: ToolMap,
    pub bundle: FlagBundle,
    pub package_id: String,
}

/// Validate options, apply settings and synchronise with the dependency.
pub fn prepare(opts: &ConfigureOptions) -> Result<Prepared, ConfigError> {
    let explicit = catalog::validate_set(&opts.options)?;
    let passthrough = catalog::keys_in(OptionScope::Passthrough);
    if let Some(key) = explicit.keys().find(|key| passthrough.contains(key)) {
        return Err(ConfigError::PassthroughOption {
            key: key.to_string(),
        });
    }

    let mut options = catalog::wrapper_defaults();
    options.merge(&explicit);

    let mut settings = Settings::default();
    for raw in &opts.settings {
        settings.apply(raw)?;
    }

    let declared = match &opts.dependency_options {
        Some(declared) => declared.clone(),
        None => catalog::dependency_defaults(),
    };

    let dependency = opts.package.name.as_str();
    let dependency_options = synchronize(dependency, &options, &declared)?;
    verify_consistency(dependency, &dependency_options, &catalog::mirrored_keys())?;

    let compose = ComposeOptions::new(&settings, &options, &dependency_options);
    check_sanitizer(&compose)?;

    for flavor in settings.sanitizer.disabled_runtimes(&dependency_options) {
        tracing::warn!(
            "{} is off, `{}` does not build the {} runtime",
            flavor.enable_option(),
            dependency,
            flavor.short_name()
        );
    }

    Ok(Prepared {
        package: opts.package.clone(),
        options,
        dependency_options,
        settings,
        compose,
    })
}

/// Run the whole pipeline.
pub fn configure(opts: &ConfigureOptions) -> Result<Configured> {
    let Prepared {
        package,
        options,
        dependency_options,
        settings,
        compose: compose_opts,
    } = prepare(opts)?;

    let root = toolchain_root(opts.root.as_deref())?;
    let layout = toolchain_layout(&root, opts.clang_version.as_deref())?;
    tracing::debug!(
        "configuring {} at {} (clang {})",
        package,
        root,
        layout.clang_version
    );

    let tools = resolve(&root, &layout, options.bool_or("compile_with_clang", true))?;
    let bundle = compose(&root, &layout, &tools, &compose_opts, &opts.inherited)?;
    let package_id = package_id(&options, &settings);

    Ok(Configured {
        package,
        options,
        dependency_options,
        settings,
        root,
        layout,
        tools,
        bundle,
        package_id,
    })
}

/// The configured root, made absolute and normalised.
pub fn toolchain_root(root: Option<&Path>) -> Result<ToolchainRoot> {
    let Some(root) = root else {
        return Err(ConfigError::NoRoot.into());
    };

    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to get current directory")?
            .join(root)
    };

    if !root.is_dir() {
        bail!("toolchain root {} is not a directory", root.display());
    }
    Ok(ToolchainRoot::new(root))
}

/// Layout for the configured clang version.
pub fn toolchain_layout(root: &ToolchainRoot, clang_version: Option<&str>) -> Result<ToolchainLayout> {
    match clang_version.map(str::trim) {
        None | Some("") => Ok(ToolchainLayout::default()),
        Some(v) if v.eq_ignore_ascii_case("auto") => {
            Ok(ToolchainLayout::with_version(detect_clang_version(root)?))
        }
        Some(v) => {
            let version =
                Version::parse(v).with_context(|| format!("invalid clang_version `{}`", v))?;
            Ok(ToolchainLayout::with_version(version))
        }
    }
}
