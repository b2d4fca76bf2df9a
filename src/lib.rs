//! Multi-target build-and-package pipeline for release automation
//!
//! This library cross-compiles one binary per (OS, architecture) pair with an
//! external cross-compiler and packages each into a zip archive named
//! `<package>_<version>_<os>_<arch>.zip`:
//! - [`bundler`] - matrix settings, process execution, orchestration, manifest
//! - [`metadata`] - host package descriptor (`Cargo.toml` / `package.json`)
//! - [`cli`] - the `kodegen_bundler_matrix` command line front end
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use bundler::{BuildConfig, Bundler, ReleaseContext, ReleaseContextBuilder, ToolSettings};
pub use error::{BundlerError, CliError, Result};
