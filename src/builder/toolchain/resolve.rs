//! Resolution of required tools below a toolchain root.

use std::collections::BTreeMap;

use crate::util::diagnostic::MissingToolError;

use super::{ResolvedTool, ToolName, ToolchainLayout, ToolchainRoot};

/// Resolved tools keyed by name.
pub type ToolMap = BTreeMap<ToolName, ResolvedTool>;

/// Resolve every required tool below `root`.
///
/// When `compile_with_clang` is false nothing is resolved and the map is
/// empty: the consumer keeps its platform toolchain. Otherwise the first
/// missing tool aborts resolution and no partial map is returned.
pub fn resolve(
    root: &ToolchainRoot,
    layout: &ToolchainLayout,
    compile_with_clang: bool,
) -> Result<ToolMap, MissingToolError> {
    let mut tools = ToolMap::new();

    if !compile_with_clang {
        tracing::debug!("compile_with_clang is off, skipping tool resolution");
        return Ok(tools);
    }

    for name in ToolName::ALL {
        let path = layout.tool_path(root, name);
        if !path.is_file() {
            return Err(MissingToolError {
                tool: name.env_var().to_string(),
                path,
            });
        }
        tracing::debug!("resolved {} -> {}", name, path.display());
        tools.insert(name, ResolvedTool { name, path });
    }

    Ok(tools)
}
