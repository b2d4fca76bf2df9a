//! Description of a single external process launch.

use crate::bundler::ReleaseContext;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// One external process launch: program, arguments, directory and environment.
///
/// Ephemeral; built right before the launch and dropped afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessInvocation {
    /// Program name or path
    pub program: String,
    /// Arguments, passed without shell interpretation
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Complete environment of the child
    pub env: BTreeMap<OsString, OsString>,
}

impl ProcessInvocation {
    /// Starts an invocation using the context's directory and environment.
    pub fn new(program: impl Into<String>, ctx: &ReleaseContext) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: ctx.cwd().to_path_buf(),
            env: ctx.env().clone(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Renders a shell-like command line for logs and error messages.
impl fmt::Display for ProcessInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+@,".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::ReleaseContextBuilder;

    #[test]
    fn display_quotes_only_when_needed() {
        let ctx = ReleaseContextBuilder::new()
            .version("1.0.0")
            .package_name("tool")
            .cwd("/work")
            .env(BTreeMap::new())
            .build()
            .unwrap();

        let invocation = ProcessInvocation::new("gox", &ctx)
            .args(["-arch", "amd64 arm64", "-output"])
            .arg("pkg/{{.OS}}-{{.Arch}}/app");

        assert_eq!(
            invocation.to_string(),
            r#"gox -arch "amd64 arm64" -output "pkg/{{.OS}}-{{.Arch}}/app""#
        );
        assert_eq!(invocation.cwd, PathBuf::from("/work"));
    }
}
