//! Build matrix configuration.

use super::Target;
use crate::bundler::{Error, Result};

/// What to build: one binary for every (arch, os) pair.
///
/// Immutable once handed to the [`Bundler`](crate::bundler::Bundler). The
/// order of `arch` and `os` is significant, it fixes the order in which
/// archives are produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildConfig {
    /// Executable name (without `.exe`)
    pub binary: String,
    /// Target architectures, in declaration order
    pub arch: Vec<String>,
    /// Target operating systems, in declaration order
    pub os: Vec<String>,
}

impl BuildConfig {
    /// Creates a config from any string-ish sequences.
    pub fn new<A, O>(binary: impl Into<String>, arch: A, os: O) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            binary: binary.into(),
            arch: arch.into_iter().map(Into::into).collect(),
            os: os.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks the config before any process is launched.
    ///
    /// The arch and os lists are space-joined into a single argument each for
    /// the cross-compiler, so an entry containing whitespace would silently
    /// change the matrix. Such entries are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() {
            return Err(Error::InvalidConfig("binary name cannot be empty".into()));
        }
        if self.binary.contains(['/', '\\']) {
            return Err(Error::InvalidConfig(format!(
                "binary name must not contain path separators: {}",
                self.binary
            )));
        }

        validate_list("arch", &self.arch)?;
        validate_list("os", &self.os)?;
        Ok(())
    }

    /// Architectures joined with single spaces, as the cross-compiler expects.
    pub fn joined_arch(&self) -> String {
        self.arch.join(" ")
    }

    /// Operating systems joined with single spaces, as the cross-compiler expects.
    pub fn joined_os(&self) -> String {
        self.os.join(" ")
    }

    /// Number of matrix cells (`|arch| x |os|`).
    pub fn matrix_len(&self) -> usize {
        self.arch.len() * self.os.len()
    }

    /// Matrix cells, arch outer and os inner.
    pub fn targets(&self) -> Vec<Target> {
        self.arch
            .iter()
            .flat_map(|arch| self.os.iter().map(move |os| Target::new(os, arch)))
            .collect()
    }
}

fn validate_list(field: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidConfig(format!("{} list cannot be empty", field)));
    }
    for value in values {
        if value.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{} list contains an empty entry",
                field
            )));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(Error::InvalidConfig(format!(
                "{} entry '{}' contains whitespace",
                field, value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_arch_outer_os_inner() {
        let config = BuildConfig::new("app", ["amd64", "arm64"], ["linux", "darwin", "windows"]);
        let cells: Vec<String> = config.targets().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            cells,
            [
                "linux-amd64",
                "darwin-amd64",
                "windows-amd64",
                "linux-arm64",
                "darwin-arm64",
                "windows-arm64",
            ]
        );
        assert_eq!(config.matrix_len(), 6);
    }

    #[test]
    fn joins_with_single_spaces() {
        let config = BuildConfig::new("app", ["386", "amd64"], ["linux", "windows"]);
        assert_eq!(config.joined_arch(), "386 amd64");
        assert_eq!(config.joined_os(), "linux windows");
    }

    #[test]
    fn rejects_empty_lists() {
        let config = BuildConfig::new("app", Vec::<String>::new(), ["linux"]);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = BuildConfig::new("app", ["amd64"], Vec::<String>::new());
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_whitespace_entries() {
        let config = BuildConfig::new("app", ["amd64 arm64"], ["linux"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn rejects_bad_binary_names() {
        assert!(BuildConfig::new("", ["amd64"], ["linux"]).validate().is_err());
        assert!(
            BuildConfig::new("bin/app", ["amd64"], ["linux"])
                .validate()
                .is_err()
        );
    }

    #[test]
    fn accepts_valid_config() {
        let config = BuildConfig::new("app", ["amd64"], ["linux", "windows"]);
        assert!(config.validate().is_ok());
    }
}
