//! Per-release execution context.

use crate::bundler::process::OutputSink;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Receiver for stage markers ("Gox Cross Compilation", "Archive creation").
pub trait StageLogger: Send + Sync {
    /// Records one stage message.
    fn log(&self, message: &str);
}

/// [`StageLogger`] that forwards to the `log` facade at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogLogger;

impl StageLogger for LogLogger {
    fn log(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Everything the orchestrator needs from the surrounding release run.
///
/// Built once per release with [`ReleaseContextBuilder`](super::ReleaseContextBuilder)
/// and only read afterwards, except for the output sinks which every launched
/// process appends to. Cloning is cheap and shares the sinks and logger.
#[derive(Clone)]
pub struct ReleaseContext {
    pub(super) version: String,
    pub(super) package_name: String,
    pub(super) cwd: PathBuf,
    pub(super) env: BTreeMap<OsString, OsString>,
    pub(super) stdout: OutputSink,
    pub(super) stderr: OutputSink,
    pub(super) logger: Arc<dyn StageLogger>,
}

impl fmt::Debug for ReleaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseContext")
            .field("version", &self.version)
            .field("package_name", &self.package_name)
            .field("cwd", &self.cwd)
            .field("env", &format_args!("<{} vars>", self.env.len()))
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .field("logger", &"<StageLogger>")
            .finish()
    }
}

impl ReleaseContext {
    /// Version of the release being prepared, used verbatim in archive names.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Package name from the host project descriptor.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Working directory every process is launched in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Environment every process is launched with.
    pub fn env(&self) -> &BTreeMap<OsString, OsString> {
        &self.env
    }

    /// Shared sink for child standard output.
    pub fn stdout(&self) -> &OutputSink {
        &self.stdout
    }

    /// Shared sink for child standard error.
    pub fn stderr(&self) -> &OutputSink {
        &self.stderr
    }

    /// Logs a stage marker.
    pub fn log(&self, message: &str) {
        self.logger.log(message);
    }
}
