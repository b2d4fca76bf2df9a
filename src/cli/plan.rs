//! Merging command line arguments with the package descriptor.

use super::Args;
use super::args::validate_version;
use crate::bundler::{BuildConfig, ToolSettings};
use crate::error::{BundlerError, CliError, Result};
use crate::metadata::{self, PackageMetadata};
use path_absolutize::Absolutize;
use std::path::PathBuf;
use std::time::Duration;

/// Fully resolved inputs of one release run.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Matrix to build
    pub config: BuildConfig,
    /// Tools and limits
    pub tools: ToolSettings,
    /// Release version
    pub version: String,
    /// Package name for archive names
    pub package_name: String,
    /// Absolute working directory
    pub cwd: PathBuf,
    /// Manifest to write, absolute
    pub manifest: Option<PathBuf>,
}

impl ReleasePlan {
    /// Resolves the plan: command line first, descriptor second.
    ///
    /// # Errors
    ///
    /// [`CliError::MissingArgument`] when a value is neither passed nor
    /// declared in the descriptor.
    pub fn resolve(args: &Args) -> Result<Self> {
        let cwd = args.cwd.absolutize()?.into_owned();
        let package = load_descriptor(args, &cwd)?;

        let package_name = args
            .package_name
            .clone()
            .or_else(|| package.as_ref().map(|p| p.name.clone()))
            .ok_or_else(|| missing("package-name"))?;

        let version = match &args.release_version {
            Some(version) => version.clone(),
            None => {
                let version = package
                    .as_ref()
                    .and_then(|p| p.version.clone())
                    .ok_or_else(|| missing("release-version"))?;
                log::info!("No --release-version given, using descriptor version {}", version);
                validate_version(&version)
                    .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;
                version
            }
        };

        let binary = args
            .binary
            .clone()
            .or_else(|| package.as_ref().and_then(|p| p.matrix.binary.clone()))
            .or_else(|| package.as_ref().and_then(|p| p.binary_name.clone()))
            .ok_or_else(|| missing("binary"))?;

        let arch = pick_list(&args.arch, package.as_ref().map(|p| &p.matrix.arch))
            .ok_or_else(|| missing("arch"))?;
        let os = pick_list(&args.os, package.as_ref().map(|p| &p.matrix.os))
            .ok_or_else(|| missing("os"))?;

        let tools = ToolSettings::default()
            .with_cross_compiler(&args.gox)
            .with_archiver(&args.zip)
            .with_timeout(args.timeout_secs.map(Duration::from_secs))
            .with_jobs(args.jobs);

        let manifest = args.manifest.as_ref().map(|path| cwd.join(path));

        Ok(Self {
            config: BuildConfig::new(binary, arch, os),
            tools,
            version,
            package_name,
            cwd,
            manifest,
        })
    }
}

/// Descriptor is optional only when the package name is passed explicitly.
fn load_descriptor(args: &Args, cwd: &std::path::Path) -> Result<Option<PackageMetadata>> {
    if let Some(path) = &args.descriptor {
        return metadata::load_package(&cwd.join(path)).map(Some);
    }

    match metadata::discover(cwd) {
        Ok(path) => metadata::load_package(&path).map(Some),
        Err(e) if args.package_name.is_some() => {
            log::debug!("Continuing without descriptor: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn pick_list(cli: &[String], declared: Option<&Vec<String>>) -> Option<Vec<String>> {
    if !cli.is_empty() {
        return Some(cli.to_vec());
    }
    declared.filter(|values| !values.is_empty()).cloned()
}

fn missing(argument: &str) -> BundlerError {
    BundlerError::Cli(CliError::MissingArgument {
        argument: argument.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(dir: &std::path::Path, extra: &[&str]) -> Args {
        let cwd = dir.to_string_lossy().into_owned();
        let mut argv = vec!["kodegen_bundler_matrix", "-C", cwd.as_str()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn descriptor_fills_in_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "mytool"
version = "0.4.0"

[package.metadata.matrix]
binary = "mt"
arch = ["amd64"]
os = ["linux", "darwin"]
"#,
        )
        .unwrap();

        let plan = ReleasePlan::resolve(&args(dir.path(), &["-r", "1.0.0", "--os", "windows"])).unwrap();
        assert_eq!(plan.package_name, "mytool");
        assert_eq!(plan.version, "1.0.0");
        assert_eq!(plan.config.binary, "mt");
        assert_eq!(plan.config.arch, ["amd64"]);
        assert_eq!(plan.config.os, ["windows"]);
        assert_eq!(plan.tools.cross_compiler, "gox");
    }

    #[test]
    fn falls_back_to_descriptor_version() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "tool", "version": "3.1.0", "matrix": { "binary": "tool", "arch": ["amd64"], "os": ["linux"] } }"#,
        )
        .unwrap();

        let mut parsed = args(dir.path(), &["-m", "dist/manifest.json"]);
        parsed.release_version = None;
        let plan = ReleasePlan::resolve(&parsed).unwrap();
        assert_eq!(plan.version, "3.1.0");
        assert_eq!(
            plan.manifest.as_deref(),
            Some(dir.path().join("dist/manifest.json").as_path())
        );
    }

    #[test]
    fn works_without_descriptor_when_everything_is_passed() {
        let dir = tempfile::tempdir().unwrap();
        let plan = ReleasePlan::resolve(&args(
            dir.path(),
            &["--package-name", "p", "-r", "1.0.0", "-b", "app", "-a", "amd64", "-o", "linux"],
        ))
        .unwrap();
        assert_eq!(plan.config.matrix_len(), 1);
    }

    #[test]
    fn missing_matrix_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleasePlan::resolve(&args(
            dir.path(),
            &["--package-name", "p", "-r", "1.0.0", "-b", "app", "-a", "amd64"],
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "CLI error: Missing required argument: os");
    }

    #[test]
    fn missing_descriptor_without_package_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleasePlan::resolve(&args(dir.path(), &["-r", "1.0.0"])).unwrap_err();
        assert!(err.to_string().contains("No package descriptor"));
    }
}
