//! Host package descriptor loading.
//!
//! The package name that prefixes every archive comes from the host project's
//! descriptor: `Cargo.toml` or `package.json`. The descriptor may also carry
//! matrix defaults so CI only has to pass the release version:
//!
//! ```toml
//! [package.metadata.matrix]
//! binary = "mytool"
//! arch = ["amd64", "arm64"]
//! os = ["linux", "darwin", "windows"]
//! ```
//!
//! ```json
//! { "name": "mytool", "matrix": { "binary": "mytool", "arch": ["amd64"], "os": ["linux"] } }
//! ```

use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Descriptor file names, in lookup order
pub const DESCRIPTOR_FILES: [&str; 2] = ["Cargo.toml", "package.json"];

/// Matrix defaults declared in the descriptor. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatrixDefaults {
    /// Executable name
    pub binary: Option<String>,
    /// Target architectures
    pub arch: Vec<String>,
    /// Target operating systems
    pub os: Vec<String>,
}

/// Package metadata extracted from the host descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Package name, used verbatim in archive names
    pub name: String,

    /// Package version, if the descriptor states one literally
    pub version: Option<String>,

    /// Primary binary name ([[bin]] or package name for Cargo, `bin` key for npm)
    pub binary_name: Option<String>,

    /// Matrix defaults
    pub matrix: MatrixDefaults,
}

/// Finds the descriptor in `dir`, preferring `Cargo.toml`.
pub fn discover(dir: &Path) -> Result<PathBuf> {
    DESCRIPTOR_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!(
                    "No package descriptor ({}) found in {}",
                    DESCRIPTOR_FILES.join(" or "),
                    dir.display()
                ),
            })
        })
}

/// Loads package metadata from a `Cargo.toml` or `package.json`.
pub fn load_package(path: &Path) -> Result<PackageMetadata> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_descriptor".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let metadata = match path.file_name().and_then(|n| n.to_str()) {
        Some("package.json") => parse_package_json(&content)?,
        _ => parse_cargo_toml(&content)?,
    };

    log::debug!(
        "Loaded package '{}' from {}",
        metadata.name,
        path.display()
    );
    Ok(metadata)
}

fn parse_cargo_toml(content: &str) -> Result<PackageMetadata> {
    let toml_value: toml::Value = toml::from_str(content)?;

    let package = toml_value.get("package").ok_or_else(|| {
        BundlerError::Cli(CliError::InvalidArguments {
            reason: "No [package] section in Cargo.toml".to_string(),
        })
    })?;

    let name = package
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: "Missing 'name' in [package]".to_string(),
            })
        })?
        .to_string();

    // `version.workspace = true` is a table, not a literal version
    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .map(String::from);

    // Try [[bin]] section first, fall back to the package name
    let binary_name = toml_value
        .get("bin")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|first| first.get("name"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .or_else(|| Some(name.clone()));

    let matrix = match package.get("metadata").and_then(|m| m.get("matrix")) {
        Some(section) => section.clone().try_into::<MatrixDefaults>().map_err(|e| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Invalid [package.metadata.matrix]: {}", e),
            })
        })?,
        None => MatrixDefaults::default(),
    };

    Ok(PackageMetadata {
        name,
        version,
        binary_name,
        matrix,
    })
}

fn parse_package_json(content: &str) -> Result<PackageMetadata> {
    let json: serde_json::Value = serde_json::from_str(content)?;

    let name = json
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: "Missing 'name' in package.json".to_string(),
            })
        })?
        .to_string();

    let version = json
        .get("version")
        .and_then(|v| v.as_str())
        .map(String::from);

    // `bin` is either a string or a { name: path } map
    let binary_name = match json.get("bin") {
        Some(serde_json::Value::Object(map)) => map.keys().next().cloned(),
        Some(serde_json::Value::String(_)) => Some(unscoped(&name).to_string()),
        _ => None,
    };

    let matrix = match json.get("matrix") {
        Some(section) => serde_json::from_value(section.clone()).map_err(|e| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Invalid \"matrix\" in package.json: {}", e),
            })
        })?,
        None => MatrixDefaults::default(),
    };

    Ok(PackageMetadata {
        name,
        version,
        binary_name,
        matrix,
    })
}

fn unscoped(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_manifest_with_matrix() {
        let meta = parse_cargo_toml(
            r#"
[package]
name = "mytool"
version = "0.3.1"

[[bin]]
name = "mt"
path = "src/main.rs"

[package.metadata.matrix]
arch = ["amd64", "arm64"]
os = ["linux", "windows"]
"#,
        )
        .unwrap();

        assert_eq!(meta.name, "mytool");
        assert_eq!(meta.version.as_deref(), Some("0.3.1"));
        assert_eq!(meta.binary_name.as_deref(), Some("mt"));
        assert_eq!(meta.matrix.arch, ["amd64", "arm64"]);
        assert_eq!(meta.matrix.os, ["linux", "windows"]);
        assert_eq!(meta.matrix.binary, None);
    }

    #[test]
    fn cargo_workspace_version_is_not_literal() {
        let meta = parse_cargo_toml(
            r#"
[package]
name = "member"
version.workspace = true
"#,
        )
        .unwrap();
        assert_eq!(meta.version, None);
        assert_eq!(meta.binary_name.as_deref(), Some("member"));
        assert_eq!(meta.matrix, MatrixDefaults::default());
    }

    #[test]
    fn cargo_without_package_is_rejected() {
        let err = parse_cargo_toml("[workspace]\nmembers = []\n").unwrap_err();
        assert!(err.to_string().contains("No [package] section"));
    }

    #[test]
    fn package_json_with_matrix() {
        let meta = parse_package_json(
            r#"{
                "name": "@acme/gox-release",
                "version": "2.0.0",
                "bin": "./cli.js",
                "matrix": { "binary": "acme", "arch": ["386"], "os": ["linux", "darwin"] }
            }"#,
        )
        .unwrap();

        assert_eq!(meta.name, "@acme/gox-release");
        assert_eq!(meta.binary_name.as_deref(), Some("gox-release"));
        assert_eq!(meta.matrix.binary.as_deref(), Some("acme"));
        assert_eq!(meta.matrix.os, ["linux", "darwin"]);
    }

    #[test]
    fn package_json_requires_name() {
        let err = parse_package_json(r#"{ "version": "1.0.0" }"#).unwrap_err();
        assert!(err.to_string().contains("Missing 'name'"));
    }

    #[test]
    fn discover_prefers_cargo_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"name":"a"}"#).unwrap();
        assert_eq!(
            discover(dir.path()).unwrap(),
            dir.path().join("package.json")
        );

        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"b\"\n").unwrap();
        assert_eq!(discover(dir.path()).unwrap(), dir.path().join("Cargo.toml"));
    }

    #[test]
    fn discover_fails_on_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).is_err());
    }

    #[test]
    fn load_package_reads_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("Cargo.toml");
        let meta = load_package(&path).unwrap();
        assert_eq!(meta.name, "mock-binary");
        assert_eq!(meta.binary_name.as_deref(), Some("mock-app"));
        assert_eq!(meta.matrix.arch, ["amd64"]);
    }
}
