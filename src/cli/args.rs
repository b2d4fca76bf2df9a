//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! of the values that clap cannot check on its own.

use crate::bundler::{DEFAULT_ARCHIVER, DEFAULT_CROSS_COMPILER};
use clap::Parser;
use std::path::PathBuf;

/// Cross-compile a binary for a target matrix and zip every result
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_matrix",
    version,
    about = "Cross-compile a binary for a target matrix and zip every result",
    long_about = "Runs the cross-compiler once for the whole (arch x os) matrix, then zips each
produced binary into <package>_<version>_<os>_<arch>.zip in the working directory.

Matrix values not given on the command line are read from the host project's
Cargo.toml ([package.metadata.matrix]) or package.json (\"matrix\").

Usage:
  kodegen_bundler_matrix --release-version 1.4.0 --binary mytool --arch amd64,arm64 --os linux,darwin,windows
  RELEASE_VERSION=1.4.0 kodegen_bundler_matrix -C ./go-project --manifest dist/manifest.json

Exit code 0 = one archive exists per matrix cell."
)]
pub struct Args {
    /// Executable name produced by the cross-compiler (without .exe)
    #[arg(short, long, value_name = "NAME")]
    pub binary: Option<String>,

    /// Target architecture; repeat or comma-separate for several
    #[arg(short, long, value_name = "ARCH", value_delimiter = ',')]
    pub arch: Vec<String>,

    /// Target operating system; repeat or comma-separate for several
    #[arg(short, long, value_name = "OS", value_delimiter = ',')]
    pub os: Vec<String>,

    /// Version of the release being prepared (semver, no leading `v`)
    #[arg(short = 'r', long, env = "RELEASE_VERSION", value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Package name used in archive names (default: from the descriptor)
    #[arg(long, value_name = "NAME")]
    pub package_name: Option<String>,

    /// Working directory for every tool invocation
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,

    /// Package descriptor (default: Cargo.toml or package.json in the working directory)
    #[arg(long, value_name = "PATH")]
    pub descriptor: Option<PathBuf>,

    /// Write or extend a JSON release manifest with archive checksums
    #[arg(short, long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Cross-compiler program or path
    #[arg(long, env = "GOX", value_name = "PROGRAM", default_value = DEFAULT_CROSS_COMPILER)]
    pub gox: String,

    /// Archiver program or path
    #[arg(long, env = "ZIP_TOOL", value_name = "PROGRAM", default_value = DEFAULT_ARCHIVER)]
    pub zip: String,

    /// Kill any single tool invocation running longer than this
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Number of archives to create concurrently
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    /// Skip resolving both tools in PATH before starting
    #[arg(long)]
    pub skip_preflight: bool,

    /// Print resolved plan details
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs == 0 {
            return Err("--jobs must be at least 1".to_string());
        }

        if self.timeout_secs == Some(0) {
            return Err("--timeout-secs must be greater than 0".to_string());
        }

        if let Some(version) = &self.release_version {
            validate_version(version)?;
        }

        if self.gox.is_empty() || self.zip.is_empty() {
            return Err("Tool programs cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Checks that `version` is a semantic version.
pub fn validate_version(version: &str) -> Result<(), String> {
    semver::Version::parse(version)
        .map(|_| ())
        .map_err(|e| format!("Invalid release version '{}': {}", version, e))
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
