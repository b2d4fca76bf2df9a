//! Configuration structures for build-and-package runs.
//!
//! [`BuildConfig`] says what to build, [`ToolSettings`] which programs do
//! the work, and [`ReleaseContext`] where and for which release.

mod build;
mod builder;
mod context;
mod target;
mod tools;

pub use build::BuildConfig;
pub use builder::ReleaseContextBuilder;
pub use context::{LogLogger, ReleaseContext, StageLogger};
pub use target::{PKG_DIR, Target};
pub use tools::{DEFAULT_ARCHIVER, DEFAULT_CROSS_COMPILER, ToolSettings};
