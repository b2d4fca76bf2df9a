//! Launching external processes and streaming their output.

use super::{OutputSink, ProcessInvocation};
use crate::bundler::{Error, ReleaseContext, Result};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::process::Command;

/// Grace period for reaping a killed child after a timeout
const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes a [`ProcessInvocation`] to completion.
///
/// The orchestrator only talks to external tools through this trait.
pub trait ProcessRunner: Send + Sync + 'static {
    /// Runs the invocation and waits for it to exit.
    ///
    /// Child stdout/stderr must be forwarded into the context's sinks without
    /// closing them. Returns an error on launch failure or non-zero exit.
    fn run(
        &self,
        invocation: &ProcessInvocation,
        ctx: &ReleaseContext,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// [`ProcessRunner`] backed by real OS processes.
#[derive(Clone, Debug, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Creates a runner; `None` waits for each process indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Per-invocation timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &ProcessInvocation, ctx: &ReleaseContext) -> Result<()> {
        let command = invocation.to_string();
        log::debug!("Running: {} (in {})", command, invocation.cwd.display());

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .env_clear()
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Launch {
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // The timeout covers streaming too: a hung tool keeps its pipes open.
        let completion = async {
            let (out, err) = tokio::join!(
                forward(stdout, ctx.stdout()),
                forward(stderr, ctx.stderr())
            );
            if let Err(e) = out.and(err) {
                log::warn!("Failed to forward output of `{}`: {}", command, e);
            }
            child.wait().await
        };

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, completion).await.ok(),
            None => Some(completion.await),
        };

        let status = match outcome {
            Some(Ok(status)) => status,
            Some(Err(e)) => return Err(Error::IoError(e)),
            None => {
                let timeout = self.timeout.unwrap_or_default();
                log::warn!("`{}` timed out after {:?}, terminating...", command, timeout);

                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill `{}`: {}", command, e);
                }
                let _ = tokio::time::timeout(KILL_REAP_TIMEOUT, child.wait()).await;

                return Err(Error::Timeout { command, timeout });
            }
        };

        if !status.success() {
            return Err(Error::ToolFailed {
                command,
                code: status.code(),
            });
        }

        Ok(())
    }
}

async fn forward<R: AsyncRead + Unpin>(reader: Option<R>, sink: &OutputSink) -> std::io::Result<()> {
    if let Some(reader) = reader {
        sink.pump(reader).await?;
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::bundler::ReleaseContextBuilder;

    fn context(stdout: &OutputSink, stderr: &OutputSink) -> ReleaseContext {
        ReleaseContextBuilder::new()
            .version("1.0.0")
            .package_name("tool")
            .cwd(std::env::temp_dir())
            .stdout(stdout.clone())
            .stderr(stderr.clone())
            .env_var("MATRIX_TEST_VAR", "from-context")
            .build()
            .unwrap()
    }

    fn sh(ctx: &ReleaseContext, script: &str) -> ProcessInvocation {
        ProcessInvocation::new("sh", ctx).args(["-c", script])
    }

    #[tokio::test]
    async fn forwards_both_streams_and_keeps_sinks_open() {
        let (out, err) = (OutputSink::capture(), OutputSink::capture());
        let ctx = context(&out, &err);
        let runner = SystemRunner::default();

        runner
            .run(&sh(&ctx, "echo one; echo oops >&2"), &ctx)
            .await
            .unwrap();
        runner.run(&sh(&ctx, "echo two"), &ctx).await.unwrap();

        assert_eq!(out.captured_string(), "one\ntwo\n");
        assert_eq!(err.captured_string(), "oops\n");
    }

    #[tokio::test]
    async fn passes_context_environment() {
        let (out, err) = (OutputSink::capture(), OutputSink::capture());
        let ctx = context(&out, &err);

        SystemRunner::default()
            .run(&sh(&ctx, "printf %s \"$MATRIX_TEST_VAR\""), &ctx)
            .await
            .unwrap();

        assert_eq!(out.captured_string(), "from-context");
    }

    #[tokio::test]
    async fn passes_non_utf8_environment_values() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let out = OutputSink::capture();
        let ctx = ReleaseContextBuilder::new()
            .version("1.0.0")
            .package_name("tool")
            .cwd(std::env::temp_dir())
            .stdout(out.clone())
            .stderr(OutputSink::capture())
            .env_var("MATRIX_RAW_VAR", OsString::from_vec(vec![b'a', 0xff, b'b']))
            .build()
            .unwrap();

        SystemRunner::default()
            .run(&sh(&ctx, "printf %s \"$MATRIX_RAW_VAR\""), &ctx)
            .await
            .unwrap();

        assert_eq!(out.captured().unwrap(), [b'a', 0xff, b'b']);
    }

    #[tokio::test]
    async fn non_zero_exit_is_tool_failure() {
        let (out, err) = (OutputSink::capture(), OutputSink::capture());
        let ctx = context(&out, &err);

        let result = SystemRunner::default().run(&sh(&ctx, "exit 3"), &ctx).await;
        assert!(matches!(result, Err(Error::ToolFailed { code: Some(3), .. })));
    }

    #[tokio::test]
    async fn missing_program_is_launch_failure() {
        let (out, err) = (OutputSink::capture(), OutputSink::capture());
        let ctx = context(&out, &err);
        let invocation = ProcessInvocation::new("definitely-not-a-real-tool-7f3a", &ctx);

        let result = SystemRunner::default().run(&invocation, &ctx).await;
        assert!(matches!(result, Err(Error::Launch { .. })));
    }

    #[tokio::test]
    async fn hung_process_times_out() {
        let (out, err) = (OutputSink::capture(), OutputSink::capture());
        let ctx = context(&out, &err);
        let runner = SystemRunner::new(Some(Duration::from_millis(200)));

        let error = runner.run(&sh(&ctx, "sleep 30"), &ctx).await.unwrap_err();
        assert!(matches!(error, Error::Timeout { .. }));
        assert!(error.to_string().ends_with("timed out after 200ms"), "{}", error);
    }
}
