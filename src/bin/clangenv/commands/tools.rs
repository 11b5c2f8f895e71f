//! `clangenv tools` command

use anyhow::Result;

use super::load_options;
use crate::cli::{ConfigArgs, ToolsArgs};
use clangenv::builder::toolchain::AnalysisTool;
use clangenv::ops::configure;
use clangenv::util::fs::list_files;

pub fn execute(args: ToolsArgs, config: &ConfigArgs) -> Result<()> {
    let configured = configure(&load_options(config)?)?;
    let (root, layout) = (&configured.root, &configured.layout);

    println!("Toolchain: {}", root);
    println!();

    if configured.tools.is_empty() {
        println!("  (compile_with_clang is off, no tools resolved)");
    }
    for (name, tool) in &configured.tools {
        println!("  {:<10} {}", name.env_var(), tool.path.display());
    }

    for tool in AnalysisTool::ALL {
        let path = layout.analysis_tool_path(root, tool);
        if path.is_file() {
            println!("  {:<10} {}", tool.env_var(), path.display());
        }
    }

    if args.all {
        let bin_dir = layout.bin_dir(root);
        println!();
        println!("{}:", bin_dir.display());
        for file in list_files(&bin_dir)? {
            if let Some(name) = file.file_name() {
                println!("  {}", name.to_string_lossy());
            }
        }
    }

    Ok(())
}
