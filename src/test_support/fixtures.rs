//! Fake toolchain installations.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::builder::toolchain::{ToolName, ToolchainLayout, ToolchainRoot};

/// A toolchain tree in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct ToolchainFixture {
    _dir: TempDir,
    root: PathBuf,
    layout: ToolchainLayout,
}

impl ToolchainFixture {
    /// An empty root.
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        ToolchainFixture {
            _dir: dir,
            root,
            layout: ToolchainLayout::default(),
        }
    }

    /// A complete root in a directory called `name`.
    pub fn complete_named(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(name);
        fs::create_dir_all(&root).unwrap();
        Self::populate(ToolchainFixture {
            _dir: dir,
            root,
            layout: ToolchainLayout::default(),
        })
    }

    /// A root with every required tool, headers and the resource directory.
    pub fn complete() -> Self {
        Self::populate(Self::empty())
    }

    fn populate(fixture: Self) -> Self {
        let root = fixture.root();

        for tool in ToolName::ALL {
            fixture.touch(&fixture.layout.tool_path(&root, tool));
        }
        fixture.mkdir("libexec");
        fixture.mkdir("include/c++/v1");
        fixture.touch(&fixture.layout.lib_dir(&root).join("libc++.so"));
        fixture.touch(&fixture.layout.resource_include_dir(&root).join("stddef.h"));
        fixture
    }

    /// Remove a required tool.
    pub fn without_tool(self, tool: ToolName) -> Self {
        fs::remove_file(self.layout.tool_path(&self.root(), tool)).unwrap();
        self
    }

    /// Add a sanitizer runtime library to the Linux runtime directory.
    pub fn with_runtime(self, file_name: &str) -> Self {
        let dir = self.layout.runtime_dir(&self.root(), "linux");
        self.touch(&dir.join(file_name));
        self
    }

    /// Add an empty file at `rel` below the root.
    pub fn with_file(self, rel: &str) -> Self {
        self.touch(&self.root.join(rel));
        self
    }

    /// Create a directory below the root.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn root(&self) -> ToolchainRoot {
        ToolchainRoot::new(&self.root)
    }

    pub fn layout(&self) -> ToolchainLayout {
        self.layout.clone()
    }

    fn touch(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }
}
