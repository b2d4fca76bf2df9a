//! Build orchestration and coordination.
//!
//! - [`checksum`] - SHA-256 of produced archives
//! - [`orchestrator`] - the [`Bundler`] compile/package pipeline
//! - [`tool_detection`] - external tool availability checking

mod checksum;
mod orchestrator;
mod tool_detection;

pub use orchestrator::{Bundler, COMPILE_STAGE, PACKAGE_STAGE};
pub use tool_detection::{preflight, resolve_tool};
