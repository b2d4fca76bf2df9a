//! External process execution.
//!
//! - [`ProcessInvocation`] - what to launch
//! - [`ProcessRunner`] - how to launch it ([`SystemRunner`] for real processes)
//! - [`OutputSink`] - where child output goes

mod invocation;
mod runner;
mod sink;

pub use invocation::ProcessInvocation;
pub use runner::{ProcessRunner, SystemRunner};
pub use sink::OutputSink;
