//! External tool selection and execution limits.

use std::time::Duration;

/// Default cross-compiler executable.
pub const DEFAULT_CROSS_COMPILER: &str = "gox";

/// Default archiver executable.
pub const DEFAULT_ARCHIVER: &str = "zip";

/// Which tools to run and how.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_matrix::bundler::ToolSettings;
/// use std::time::Duration;
///
/// let tools = ToolSettings::default()
///     .with_timeout(Some(Duration::from_secs(600)))
///     .with_jobs(4);
/// assert_eq!(tools.cross_compiler, "gox");
/// assert_eq!(tools.jobs, 4);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToolSettings {
    /// Cross-compiler program (name in PATH or explicit path)
    pub cross_compiler: String,

    /// Archiver program (name in PATH or explicit path)
    pub archiver: String,

    /// Per-invocation timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Maximum concurrent archiver invocations.
    ///
    /// `1` keeps strict arch-then-os order; higher values package cells in
    /// parallel but still stop at the first failure.
    pub jobs: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            cross_compiler: DEFAULT_CROSS_COMPILER.to_string(),
            archiver: DEFAULT_ARCHIVER.to_string(),
            timeout: None,
            jobs: 1,
        }
    }
}

impl ToolSettings {
    /// Overrides the cross-compiler program.
    pub fn with_cross_compiler(mut self, program: impl Into<String>) -> Self {
        self.cross_compiler = program.into();
        self
    }

    /// Overrides the archiver program.
    pub fn with_archiver(mut self, program: impl Into<String>) -> Self {
        self.archiver = program.into();
        self
    }

    /// Sets the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the archive worker count. Zero is treated as one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}
