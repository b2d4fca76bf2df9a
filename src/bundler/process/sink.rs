//! Shared passthrough targets for child process output.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncRead, AsyncReadExt};

enum SinkTarget {
    Writer(Box<dyn Write + Send>),
    Capture(Vec<u8>),
}

/// Append-only output stream shared by every launched process.
///
/// Child output is appended chunk by chunk and flushed; the sink is never
/// closed or shut down, so the next process can keep writing to it. There is
/// intentionally no `close` operation.
///
/// Clones share the same underlying target.
#[derive(Clone)]
pub struct OutputSink {
    name: &'static str,
    inner: Arc<Mutex<SinkTarget>>,
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OutputSink").field(&self.name).finish()
    }
}

impl OutputSink {
    /// Sink writing to this process' standard output.
    pub fn stdout() -> Self {
        Self::from_writer("stdout", io::stdout())
    }

    /// Sink writing to this process' standard error.
    pub fn stderr() -> Self {
        Self::from_writer("stderr", io::stderr())
    }

    /// Sink writing to an arbitrary writer (log file, pipe, ...).
    pub fn from_writer<W: Write + Send + 'static>(name: &'static str, writer: W) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(SinkTarget::Writer(Box::new(writer)))),
        }
    }

    /// In-memory sink; read back with [`OutputSink::captured`].
    pub fn capture() -> Self {
        Self {
            name: "capture",
            inner: Arc::new(Mutex::new(SinkTarget::Capture(Vec::new()))),
        }
    }

    /// Appends bytes and flushes, leaving the sink open.
    pub fn append(&self, bytes: &[u8]) -> io::Result<()> {
        let mut target = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *target {
            SinkTarget::Writer(writer) => {
                writer.write_all(bytes)?;
                writer.flush()
            }
            SinkTarget::Capture(buffer) => {
                buffer.extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    /// Copies `reader` into the sink until EOF. Returns the byte count.
    ///
    /// End of the reader does not end the sink.
    pub async fn pump<R: AsyncRead + Unpin>(&self, mut reader: R) -> io::Result<u64> {
        let mut buffer = vec![0u8; 8192];
        let mut total = 0u64;

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            self.append(&buffer[..n])?;
            total += n as u64;
        }

        Ok(total)
    }

    /// Bytes captured so far, or `None` for writer-backed sinks.
    pub fn captured(&self) -> Option<Vec<u8>> {
        let target = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match &*target {
            SinkTarget::Capture(buffer) => Some(buffer.clone()),
            SinkTarget::Writer(_) => None,
        }
    }

    /// Captured bytes as lossy UTF-8; empty for writer-backed sinks.
    pub fn captured_string(&self) -> String {
        self.captured()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pump_keeps_sink_open() {
        let sink = OutputSink::capture();

        let first: &[u8] = b"first process\n";
        let second: &[u8] = b"second process\n";
        assert_eq!(sink.pump(first).await.unwrap(), 14);
        assert_eq!(sink.pump(second).await.unwrap(), 15);
        sink.append(b"trailer").unwrap();

        assert_eq!(
            sink.captured_string(),
            "first process\nsecond process\ntrailer"
        );
    }

    #[test]
    fn clones_share_target() {
        let sink = OutputSink::capture();
        let clone = sink.clone();
        clone.append(b"shared").unwrap();
        assert_eq!(sink.captured().as_deref(), Some(&b"shared"[..]));
    }

    #[test]
    fn writer_sinks_have_no_capture() {
        let sink = OutputSink::from_writer("sink", Vec::new());
        sink.append(b"data").unwrap();
        assert!(sink.captured().is_none());
        assert_eq!(sink.captured_string(), "");
    }
}
