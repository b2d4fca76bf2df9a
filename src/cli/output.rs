//! Colored terminal output.

use crate::bundler::StageLogger;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Verbose/quiet aware terminal printer.
///
/// Status lines go to stdout, warnings to stderr.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color_choice: ColorChoice,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `quiet` suppresses everything except warnings and errors; `verbose`
    /// enables [`OutputManager::verbose`] lines.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let color_choice = if std::env::var_os("NO_COLOR").is_some() {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };

        Self {
            verbose,
            quiet,
            color_choice,
        }
    }

    /// Whether verbose lines are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Prints a line only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        self.print(false, None, false, "", message)
    }

    /// Prints a green success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.print(false, Some(Color::Green), true, "✓ ", message)
    }

    /// Prints a yellow warning line to stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.print(true, Some(Color::Yellow), true, "⚠ ", message)
    }

    /// Prints a bold section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.print(false, Some(Color::Blue), true, "\n== ", title)
    }

    /// Prints an indented line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.print(false, None, false, "  ", message)
    }

    fn print(
        &self,
        to_stderr: bool,
        color: Option<Color>,
        bold: bool,
        prefix: &str,
        message: &str,
    ) -> io::Result<()> {
        let mut stream = if to_stderr {
            StandardStream::stderr(self.color_choice)
        } else {
            StandardStream::stdout(self.color_choice)
        };

        if color.is_some() || bold {
            let mut spec = ColorSpec::new();
            spec.set_fg(color).set_bold(bold);
            stream.set_color(&spec)?;
        }
        write!(stream, "{}{}", prefix, message)?;
        stream.reset()?;
        writeln!(stream)?;
        stream.flush()
    }
}

/// Stage markers show up as section headers.
impl StageLogger for OutputManager {
    fn log(&self, message: &str) {
        if let Err(e) = self.section(message) {
            log::warn!("Failed to print stage marker: {}", e);
        }
    }
}
