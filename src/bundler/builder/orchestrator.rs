//! Main build-and-package orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that cross-compiles the
//! whole target matrix once and then archives every produced binary.

use crate::bundler::{
    BuildConfig, BundledArtifact, Error, ReleaseContext, Result, Target, ToolSettings,
    error::ErrorExt,
    process::{ProcessInvocation, ProcessRunner, SystemRunner},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::checksum::calculate_sha256;

/// Stage marker logged before cross-compilation
pub const COMPILE_STAGE: &str = "Gox Cross Compilation";

/// Stage marker logged before archiving
pub const PACKAGE_STAGE: &str = "Archive creation";

/// Build-and-package orchestrator.
///
/// Two flat phases:
///
/// 1. **Compile** - exactly one cross-compiler invocation for the whole matrix
/// 2. **Package** - one archiver invocation per (arch, os) cell, arch outer,
///    os inner
///
/// Every failure is fatal: a failed compile means no archiver runs, a failed
/// archive stops all later cells. Artifacts already on disk are left alone.
///
/// The orchestrator holds no state between runs; calling [`Bundler::prepare`]
/// twice over the same tree does the same work twice.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_matrix::bundler::{
///     BuildConfig, Bundler, ReleaseContextBuilder, ToolSettings,
/// };
///
/// # async fn example() -> kodegen_bundler_matrix::bundler::Result<()> {
/// let config = BuildConfig::new("mytool", ["amd64", "arm64"], ["linux", "darwin"]);
/// let ctx = ReleaseContextBuilder::new()
///     .version("1.2.0")
///     .package_name("mytool")
///     .build()?;
///
/// let bundler = Bundler::new(config, ToolSettings::default())?;
/// for artifact in bundler.prepare(&ctx).await? {
///     println!("{} -> {} ({})", artifact.target, artifact.path.display(), artifact.checksum);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler<R = SystemRunner> {
    config: BuildConfig,
    tools: ToolSettings,
    runner: Arc<R>,
}

impl Bundler<SystemRunner> {
    /// Creates a bundler that launches real processes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if `config` fails validation.
    pub fn new(config: BuildConfig, tools: ToolSettings) -> Result<Self> {
        let runner = SystemRunner::new(tools.timeout);
        Self::with_runner(config, tools, runner)
    }
}

impl<R: ProcessRunner> Bundler<R> {
    /// Creates a bundler on top of a custom [`ProcessRunner`].
    pub fn with_runner(config: BuildConfig, tools: ToolSettings, runner: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tools,
            runner: Arc::new(runner),
        })
    }

    /// Returns the build configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Returns the tool settings.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Runs both phases: compile the matrix, then archive every cell.
    ///
    /// # Returns
    ///
    /// One [`BundledArtifact`] per matrix cell, in arch-outer/os-inner order.
    pub async fn prepare(&self, ctx: &ReleaseContext) -> Result<Vec<BundledArtifact>> {
        ctx.log(COMPILE_STAGE);
        self.compile(ctx).await?;

        ctx.log(PACKAGE_STAGE);
        self.package(ctx).await
    }

    /// Cross-compiles every matrix cell with a single tool invocation.
    pub async fn compile(&self, ctx: &ReleaseContext) -> Result<()> {
        let invocation = self.compile_invocation(ctx);
        self.runner.run(&invocation, ctx).await?;
        log::debug!(
            "Compiled {} targets into pkg/",
            self.config.matrix_len()
        );
        Ok(())
    }

    /// Archives every compiled binary.
    ///
    /// Runs strictly in matrix order when `jobs == 1`; otherwise up to `jobs`
    /// archivers run at once. The first failure aborts the running archivers
    /// and no queued archiver starts afterwards.
    pub async fn package(&self, ctx: &ReleaseContext) -> Result<Vec<BundledArtifact>> {
        let targets = self.config.targets();
        if self.tools.jobs <= 1 {
            self.package_sequential(ctx, targets).await
        } else {
            self.package_parallel(ctx, targets).await
        }
    }

    /// Cross-compiler invocation for the whole matrix.
    ///
    /// The arch and os lists are each passed as one space-joined argument;
    /// the cross-compiler splits them itself.
    pub fn compile_invocation(&self, ctx: &ReleaseContext) -> ProcessInvocation {
        ProcessInvocation::new(&self.tools.cross_compiler, ctx).args([
            "-arch".to_string(),
            self.config.joined_arch(),
            "-os".to_string(),
            self.config.joined_os(),
            "-output".to_string(),
            format!("pkg/{{{{.OS}}}}-{{{{.Arch}}}}/{}", self.config.binary),
        ])
    }

    /// Archiver invocation for one matrix cell (`-j` stores the file without its path).
    pub fn archive_invocation(&self, target: &Target, ctx: &ReleaseContext) -> ProcessInvocation {
        ProcessInvocation::new(&self.tools.archiver, ctx).args([
            "-j".to_string(),
            target.archive_name(ctx.package_name(), ctx.version()),
            target.binary_path(&self.config.binary),
        ])
    }

    async fn package_sequential(
        &self,
        ctx: &ReleaseContext,
        targets: Vec<Target>,
    ) -> Result<Vec<BundledArtifact>> {
        let mut artifacts = Vec::with_capacity(targets.len());

        for target in targets {
            let invocation = self.archive_invocation(&target, ctx);
            self.runner.run(&invocation, ctx).await?;
            artifacts.push(collect_artifact(target, ctx).await?);
        }

        Ok(artifacts)
    }

    async fn package_parallel(
        &self,
        ctx: &ReleaseContext,
        targets: Vec<Target>,
    ) -> Result<Vec<BundledArtifact>> {
        let total = targets.len();
        let semaphore = Arc::new(Semaphore::new(self.tools.jobs));
        let failed = Arc::new(AtomicBool::new(false));
        let mut tasks = JoinSet::new();

        for (index, target) in targets.into_iter().enumerate() {
            let invocation = self.archive_invocation(&target, ctx);
            let runner = Arc::clone(&self.runner);
            let semaphore = Arc::clone(&semaphore);
            let failed = Arc::clone(&failed);
            let ctx = ctx.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::GenericError(format!("archive pool closed: {}", e)))?;
                if failed.load(Ordering::SeqCst) {
                    return Ok(None);
                }

                let outcome = match runner.run(&invocation, &ctx).await {
                    Ok(()) => collect_artifact(target, &ctx).await,
                    Err(e) => Err(e),
                };
                // Set before the permit is released so a queued task sees it.
                if outcome.is_err() {
                    failed.store(true, Ordering::SeqCst);
                }
                outcome.map(|artifact| Some((index, artifact)))
            });
        }

        let mut finished = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::GenericError(format!("archive task failed: {}", e))),
            };
            match outcome {
                Ok(Some(entry)) => finished.push(entry),
                Ok(None) => {}
                Err(e) => {
                    // Dropped children are killed (kill_on_drop).
                    failed.store(true, Ordering::SeqCst);
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        finished.sort_by_key(|(index, _)| *index);
        Ok(finished.into_iter().map(|(_, artifact)| artifact).collect())
    }
}

/// Stats and hashes the archive the archiver just wrote.
async fn collect_artifact(target: Target, ctx: &ReleaseContext) -> Result<BundledArtifact> {
    let path = ctx
        .cwd()
        .join(target.archive_name(ctx.package_name(), ctx.version()));

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingArtifact { path });
        }
        Err(e) => return Err(e).fs_context("reading artifact metadata", &path),
    };

    let checksum = calculate_sha256(&path).await?;
    log::info!("Created {} ({} bytes)", path.display(), metadata.len());

    Ok(BundledArtifact {
        target,
        path,
        size: metadata.len(),
        checksum,
    })
}
