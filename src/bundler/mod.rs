//! Multi-target build-and-package pipeline.
//!
//! Compiles one binary per (OS, architecture) pair with an external
//! cross-compiler, then zips every binary with an external archiver:
//!
//! ```text
//! gox -arch "amd64 arm64" -os "linux windows" -output "pkg/{{.OS}}-{{.Arch}}/app"
//! zip -j app_1.0.0_linux_amd64.zip   ./pkg/linux-amd64/app
//! zip -j app_1.0.0_windows_amd64.zip ./pkg/windows-amd64/app.exe
//! ...
//! ```
//!
//! # Module Organization
//!
//! - [`settings`] - build matrix, tool selection and release context
//! - [`process`] - process invocation, runners and output passthrough
//! - `builder` - the [`Bundler`] orchestrator, tool detection, checksums
//! - [`manifest`] - JSON release manifest of produced archives

#![warn(missing_docs)]

mod builder;
mod error;
pub mod manifest;
pub mod process;
pub mod settings;

// Public re-exports
pub use builder::{Bundler, COMPILE_STAGE, PACKAGE_STAGE, preflight, resolve_tool};
pub use error::{Context, Error, ErrorExt, Result};
pub use manifest::ReleaseManifest;
pub use process::{OutputSink, ProcessInvocation, ProcessRunner, SystemRunner};
pub use settings::{
    BuildConfig, DEFAULT_ARCHIVER, DEFAULT_CROSS_COMPILER, LogLogger, PKG_DIR, ReleaseContext,
    ReleaseContextBuilder, StageLogger, Target, ToolSettings,
};

/// An archive produced for one matrix cell.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_matrix::bundler::{Bundler, BuildConfig, ReleaseContext, ToolSettings};
///
/// # async fn example(ctx: ReleaseContext) -> kodegen_bundler_matrix::bundler::Result<()> {
/// let bundler = Bundler::new(BuildConfig::new("app", ["amd64"], ["linux"]), ToolSettings::default())?;
/// for artifact in bundler.prepare(&ctx).await? {
///     println!("Created {}: {} bytes", artifact.path.display(), artifact.size);
///     println!("SHA256: {}", artifact.checksum);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Matrix cell the archive was built for.
    pub target: Target,

    /// Archive location (working directory + archive name).
    pub path: std::path::PathBuf,

    /// Archive size in bytes.
    pub size: u64,

    /// SHA-256 checksum of the archive, hex encoded.
    pub checksum: String,
}
