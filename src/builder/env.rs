//! Environment variable assignments exported to consuming builds.
//!
//! Assignments keep the order they were first made in. Path-list variables
//! (`PATH`, `LD_LIBRARY_PATH`, `LD_PRELOAD`) accumulate entries and are
//! joined only when rendered; when rendered for a run environment they are
//! prepended to the value inherited from the calling process.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Separator for path-list variables on this platform.
pub const PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Value of a single variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Scalar(String),
    PathList(Vec<PathBuf>),
}

impl EnvValue {
    /// Render without any inherited value.
    pub fn render(&self) -> String {
        match self {
            EnvValue::Scalar(s) => s.clone(),
            EnvValue::PathList(paths) => join_paths(paths),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Ordered set of environment assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvMap {
    entries: Vec<(String, EnvValue)>,
}

impl EnvMap {
    pub fn new() -> Self {
        EnvMap::default()
    }

    fn slot(&mut self, key: &str) -> Option<&mut EnvValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Assign a scalar value, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = EnvValue::Scalar(value.into());
        match self.slot(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Assign a path, rendered with `display()`.
    pub fn set_path(&mut self, key: impl Into<String>, path: &Path) {
        self.set(key, path.display().to_string());
    }

    /// Append a path to a path-list variable. Duplicates are skipped.
    pub fn append_path(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let key = key.into();
        let path = path.into();
        match self.slot(&key) {
            Some(EnvValue::PathList(paths)) => {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
            Some(slot) => *slot = EnvValue::PathList(vec![path]),
            None => self.entries.push((key, EnvValue::PathList(vec![path]))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Rendered value of `key`.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).map(EnvValue::render)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered `(key, value)` pairs, in assignment order.
    pub fn render(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.render()))
            .collect()
    }

    /// Rendered pairs for running a program: path lists are prepended to the
    /// value found through `inherited`.
    pub fn render_run_env<F>(&self, inherited: F) -> Vec<(String, String)>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.entries
            .iter()
            .map(|(k, v)| {
                let value = match (v, inherited(k)) {
                    (EnvValue::PathList(paths), Some(existing)) if !existing.is_empty() => {
                        format!("{}{}{}", join_paths(paths), PATH_SEPARATOR, existing)
                    }
                    _ => v.render(),
                };
                (k.clone(), value)
            })
            .collect()
    }

    /// Render as POSIX shell `export` lines. A path list gains the
    /// separator and the inherited value only when that value is non-empty.
    pub fn to_shell(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            let quoted = shell_quote(&value.render());
            let rendered = match value {
                EnvValue::PathList(_) => {
                    let sep = PATH_SEPARATOR;
                    format!("{quoted}\"${{{key}:+{sep}${{{key}}}}}\"")
                }
                EnvValue::Scalar(_) => quoted,
            };
            out.push_str(&format!("export {}={}\n", key, rendered));
        }
        out
    }
}

/// Single-quote a string for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
