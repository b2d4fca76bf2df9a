//! Builder for constructing a ReleaseContext.

use super::context::{LogLogger, ReleaseContext, StageLogger};
use crate::bundler::process::OutputSink;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Builder for [`ReleaseContext`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_matrix::bundler::ReleaseContextBuilder;
///
/// # fn example() -> kodegen_bundler_matrix::bundler::Result<()> {
/// let ctx = ReleaseContextBuilder::new()
///     .version("1.4.0")
///     .package_name("my-tool")
///     .cwd("/src/my-tool")
///     .build()?;
/// assert_eq!(ctx.version(), "1.4.0");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ReleaseContextBuilder {
    version: Option<String>,
    package_name: Option<String>,
    cwd: Option<PathBuf>,
    env: Option<BTreeMap<OsString, OsString>>,
    extra_env: BTreeMap<OsString, OsString>,
    stdout: Option<OutputSink>,
    stderr: Option<OutputSink>,
    logger: Option<Arc<dyn StageLogger>>,
}

impl ReleaseContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the release version.
    ///
    /// # Required
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the package name used in archive names.
    ///
    /// # Required
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Sets the working directory.
    ///
    /// Default: current process directory
    pub fn cwd<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cwd = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the whole environment.
    ///
    /// Default: current process environment, including non-UTF-8 entries
    pub fn env(mut self, env: BTreeMap<OsString, OsString>) -> Self {
        self.env = Some(env);
        self
    }

    /// Adds or overrides one variable on top of the base environment.
    pub fn env_var(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.extra_env.insert(key.into(), value.into());
        self
    }

    /// Sets the sink for child standard output.
    ///
    /// Default: this process' stdout
    pub fn stdout(mut self, sink: OutputSink) -> Self {
        self.stdout = Some(sink);
        self
    }

    /// Sets the sink for child standard error.
    ///
    /// Default: this process' stderr
    pub fn stderr(mut self, sink: OutputSink) -> Self {
        self.stderr = Some(sink);
        self
    }

    /// Sets the stage logger.
    ///
    /// Default: [`LogLogger`]
    pub fn logger(mut self, logger: Arc<dyn StageLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` or `package_name` is missing or empty,
    /// or if the current directory cannot be determined.
    pub fn build(self) -> crate::bundler::Result<ReleaseContext> {
        use crate::bundler::error::Context;

        let version = self
            .version
            .filter(|v| !v.is_empty())
            .context("version is required")?;
        let package_name = self
            .package_name
            .filter(|n| !n.is_empty())
            .context("package_name is required")?;

        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()?,
        };

        let mut env = self.env.unwrap_or_else(|| std::env::vars_os().collect());
        env.extend(self.extra_env);

        Ok(ReleaseContext {
            version,
            package_name,
            cwd,
            env,
            stdout: self.stdout.unwrap_or_else(OutputSink::stdout),
            stderr: self.stderr.unwrap_or_else(OutputSink::stderr),
            logger: self.logger.unwrap_or_else(|| Arc::new(LogLogger)),
        })
    }
}
