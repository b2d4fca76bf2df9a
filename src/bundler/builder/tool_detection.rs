//! External tool detection and availability checking.
//!
//! Resolves the cross-compiler and archiver in PATH before anything is
//! launched, so a missing tool is reported up front instead of after a
//! partial build.

use crate::bundler::{Error, Result, ToolSettings};
use std::path::PathBuf;

/// Resolves a single tool in PATH (or validates an explicit path).
pub fn resolve_tool(program: &str) -> Result<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program, e);
            Err(Error::ToolNotFound {
                tool: program.to_string(),
            })
        }
    }
}

/// Checks that both tools of `tools` can be launched.
///
/// # Errors
///
/// [`Error::ToolNotFound`] naming the first tool that cannot be found.
pub fn preflight(tools: &ToolSettings) -> Result<()> {
    let cross_compiler = resolve_tool(&tools.cross_compiler)?;
    let archiver = resolve_tool(&tools.archiver)?;

    log::info!(
        "✓ Tools available: {} ({}), {} ({})",
        tools.cross_compiler,
        cross_compiler.display(),
        tools.archiver,
        archiver.display()
    );

    Ok(())
}
