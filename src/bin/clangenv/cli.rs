//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// clangenv - build environments from a prebuilt LLVM/Clang toolchain
#[derive(Parser)]
#[command(name = "clangenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configuration files.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// Root of the LLVM installation
    #[arg(long, global = true, env = "LLVM_ROOT", value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Clang resource directory version, or `auto`
    #[arg(long, global = true, value_name = "VERSION")]
    pub clang_version: Option<String>,

    /// Set an option
    #[arg(short = 'o', long = "option", global = true, value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Set a build setting (compiler, libcxx, sanitizer, os_build, ...)
    #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Name of the LLVM package
    #[arg(long, global = true, env = "LLVM_PKG_NAME")]
    pub pkg_name: Option<String>,

    /// Version of the LLVM package
    #[arg(long, global = true, env = "LLVM_PKG_VER")]
    pub pkg_version: Option<String>,

    /// Channel of the LLVM package
    #[arg(long, global = true, env = "LLVM_PKG_CHANNEL")]
    pub pkg_channel: Option<String>,

    /// Read this file instead of .clangenv/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the build environment
    Env(EnvArgs),

    /// Print compile and link flags
    Flags(FlagsArgs),

    /// List the resolved toolchain executables
    Tools(ToolsArgs),

    /// Show option values
    Options(OptionsArgs),

    /// Check options and the toolchain without printing the environment
    Check,

    /// Print the package id of the current configuration
    PackageId,

    /// Run a probe executable against the toolchain
    Probe(ProbeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `export KEY='value'` lines
    #[default]
    Shell,
    /// A JSON document
    Json,
    /// `KEY=value` lines
    Text,
}

#[derive(Args)]
pub struct EnvArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Shell)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Show compile flags only
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Show link flags only
    #[arg(long)]
    pub link: bool,
}

#[derive(Args)]
pub struct ToolsArgs {
    /// Also list every file in the toolchain's bin directory
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct OptionsArgs {
    /// Show the catalog with default values instead of the effective options
    #[arg(long)]
    pub defaults: bool,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Probe executable, a path or a name looked up in PATH
    pub binary: PathBuf,

    /// Source file handed to the probe
    #[arg(long)]
    pub source: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
