//! Command line interface for the matrix bundler.
//!
//! This module provides argument parsing, plan resolution, command execution
//! and user feedback.

mod args;
mod output;
mod plan;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;
pub use plan::ReleasePlan;

use crate::bundler::{Bundler, ReleaseContextBuilder, ReleaseManifest, preflight};
use crate::error::{CliError, Result};
use std::sync::Arc;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(&args);
    execute(&args, &runtime_config).await
}

/// Resolves the plan, compiles, packages and optionally records the manifest.
pub async fn execute(args: &Args, runtime_config: &RuntimeConfig) -> Result<i32> {
    let plan = ReleasePlan::resolve(args)?;

    runtime_config.section(&format!("{} {}", plan.package_name, plan.version))?;
    runtime_config.verbose_println(&format!("Working directory: {}", plan.cwd.display()))?;
    runtime_config.verbose_println(&format!("Binary: {}", plan.config.binary))?;
    runtime_config.verbose_println(&format!(
        "Matrix: arch [{}] x os [{}] = {} archives",
        plan.config.joined_arch(),
        plan.config.joined_os(),
        plan.config.matrix_len()
    ))?;

    if args.skip_preflight {
        runtime_config.warn("Skipping tool preflight; a missing tool fails at launch")?;
    } else {
        preflight(&plan.tools)?;
    }

    let ctx = ReleaseContextBuilder::new()
        .version(&plan.version)
        .package_name(&plan.package_name)
        .cwd(&plan.cwd)
        .logger(Arc::new(*runtime_config.output()))
        .build()?;

    let bundler = Bundler::new(plan.config.clone(), plan.tools.clone())?;
    let artifacts = bundler.prepare(&ctx).await?;

    for artifact in &artifacts {
        runtime_config.success(&format!(
            "{} ({} bytes)",
            artifact.path.display(),
            artifact.size
        ))?;
        runtime_config.indent(&format!("sha256: {}", artifact.checksum))?;
    }

    if let Some(path) = &plan.manifest {
        let mut manifest = ReleaseManifest::load_or_create(path, &plan.package_name).await?;
        manifest.record(&plan.version, &artifacts)?;
        manifest.write(path).await?;
        runtime_config.success(&format!("Manifest written: {}", path.display()))?;
    }

    Ok(0)
}
