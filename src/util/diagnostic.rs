//! Error taxonomy and user-friendly diagnostic messages.
//!
//! Every failure in the configure pipeline is fatal. Errors carry enough
//! structure to name the violated precondition, and convert into a
//! [`Diagnostic`] with suggested fixes for terminal output.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the toolchain root is not configured.
    pub const NO_ROOT: &str =
        "help: Pass `--root <path>`, set LLVM_ROOT, or add `root = \"...\"` to .clangenv/config.toml";

    /// Suggestion when the option catalog drifted from the dependency.
    pub const CATALOG_DRIFT: &str =
        "help: Update the option catalog so it matches the options declared by the dependency";

    /// Suggestion when a dependency-only option is set on the wrapper.
    pub const PASSTHROUGH_OPTION: &str =
        "help: Set it in the `[dependency.options]` table of .clangenv/config.toml";

    /// Suggestion when a sanitizer is requested without clang.
    pub const SANITIZER_NEEDS_CLANG: &str = "help: Build with `-s compiler=clang`";

    /// Suggestion when a sanitizer is requested without libc++.
    pub const SANITIZER_NEEDS_LIBCXX: &str =
        "help: Build with `-s libcxx=libc++` and `-o link_libcxx=true`";

    /// Suggestion when the two sanitizer signals disagree.
    pub const SANITIZER_MISMATCH: &str =
        "help: Set `-o use_sanitizer=<mode>` to the same mode as `-s sanitizer=<mode>`";

    /// Suggestion when a tool is missing from the installation.
    pub const MISSING_TOOL: &str =
        "help: Check that the toolchain root points at a complete LLVM installation";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let label = if color { "\x1b[1;31merror\x1b[0m" } else { "error" };

        output.push_str(&format!("{}: {}\n", label, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Option drift or unmet preconditions. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("option `{key}` must be declared by dependency `{dependency}`")]
    #[diagnostic(code(clangenv::config::missing_in_dependency))]
    MissingInDependency { key: String, dependency: String },

    #[error("dependency `{dependency}` declares option `{key}` unknown to the option catalog")]
    #[diagnostic(code(clangenv::config::unknown_dependency_option))]
    UnknownDependencyOption { key: String, dependency: String },

    #[error("unknown option `{key}`")]
    #[diagnostic(code(clangenv::config::unknown_option))]
    UnknownOption { key: String },

    #[error("option `{key}` belongs to the dependency and cannot be set on the wrapper")]
    #[diagnostic(code(clangenv::config::passthrough_option))]
    PassthroughOption { key: String },

    #[error("invalid value `{value}` for option `{key}` (expected {expected})")]
    #[diagnostic(code(clangenv::config::invalid_value))]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("invalid value `{value}` for setting `{key}` (expected {expected})")]
    #[diagnostic(code(clangenv::config::invalid_setting))]
    InvalidSetting {
        key: String,
        value: String,
        expected: String,
    },

    #[error("sanitizer `{sanitizer}` requires clang, found `{compiler}`")]
    #[diagnostic(code(clangenv::config::sanitizer_requires_clang))]
    SanitizerRequiresClang { sanitizer: String, compiler: String },

    #[error("sanitizers require libc++ (compiler.libcxx=libc++ and link_libcxx=true)")]
    #[diagnostic(code(clangenv::config::sanitizer_requires_libcxx))]
    SanitizerRequiresLibcxx,

    #[error("sanitizer `{detected}` is enabled but dependency option use_sanitizer is `{requested}`")]
    #[diagnostic(code(clangenv::config::sanitizer_mismatch))]
    SanitizerMismatch { detected: String, requested: String },

    #[error("toolchain root is not configured")]
    #[diagnostic(code(clangenv::config::no_root))]
    NoRoot,
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ConfigError::MissingInDependency { .. } | ConfigError::UnknownDependencyOption { .. } => {
                diag.with_suggestion(suggestions::CATALOG_DRIFT)
            }
            ConfigError::SanitizerRequiresClang { .. } => {
                diag.with_suggestion(suggestions::SANITIZER_NEEDS_CLANG)
            }
            ConfigError::SanitizerRequiresLibcxx => {
                diag.with_suggestion(suggestions::SANITIZER_NEEDS_LIBCXX)
            }
            ConfigError::SanitizerMismatch { .. } => {
                diag.with_suggestion(suggestions::SANITIZER_MISMATCH)
            }
            ConfigError::NoRoot => diag.with_suggestion(suggestions::NO_ROOT),
            ConfigError::InvalidValue { expected, .. }
            | ConfigError::InvalidSetting { expected, .. } => {
                diag.with_context(format!("allowed values: {}", expected))
            }
            ConfigError::PassthroughOption { .. } => {
                diag.with_suggestion(suggestions::PASSTHROUGH_OPTION)
            }
            ConfigError::UnknownOption { .. } => {
                diag.with_suggestion("help: Run `clangenv options` to list known options")
            }
        }
    }
}

/// A required toolchain executable is absent. No fallback search is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("required tool `{tool}` not found at {}", .path.display())]
#[diagnostic(code(clangenv::toolchain::missing_tool))]
pub struct MissingToolError {
    pub tool: String,
    pub path: PathBuf,
}

impl MissingToolError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_location(&self.path)
            .with_suggestion(suggestions::MISSING_TOOL)
    }
}

/// The probe executable did not behave.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ProbeError {
    #[error("probe `{}` not found", .binary.display())]
    #[diagnostic(code(clangenv::probe::not_found))]
    NotFound { binary: PathBuf },

    #[error("failed to run probe `{command}`: {message}")]
    #[diagnostic(code(clangenv::probe::spawn))]
    Spawn { command: String, message: String },

    #[error("probe `{command}` exited with {status}")]
    #[diagnostic(code(clangenv::probe::failed))]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}
