//! Release manifest of produced archives.
//!
//! A JSON document listing, per release version, every archive with its
//! checksum. Re-running a release appends new versions to an existing
//! manifest; recording the same (os, arch) twice for one version is refused.
//!
//! ```json
//! {
//!   "name": "mytool",
//!   "versions": [
//!     {
//!       "version": "1.2.0",
//!       "released_at": "2026-10-19T10:00:00Z",
//!       "artifacts": [
//!         {
//!           "os": "linux",
//!           "arch": "amd64",
//!           "file": "mytool_1.2.0_linux_amd64.zip",
//!           "size": 1048576,
//!           "checksum_type": "sha256",
//!           "checksum": "..."
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use super::{BundledArtifact, Error, Result, error::ErrorExt};
use crate::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Checksum algorithm recorded for every artifact
pub const CHECKSUM_TYPE: &str = "sha256";

/// One archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestArtifact {
    /// Target operating system
    pub os: String,
    /// Target architecture
    pub arch: String,
    /// Archive file name (no directory)
    pub file: String,
    /// Archive size in bytes
    pub size: u64,
    /// Checksum algorithm
    pub checksum_type: String,
    /// Hex-encoded checksum
    pub checksum: String,
}

impl From<&BundledArtifact> for ManifestArtifact {
    fn from(artifact: &BundledArtifact) -> Self {
        Self {
            os: artifact.target.os.clone(),
            arch: artifact.target.arch.clone(),
            file: artifact
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: artifact.size,
            checksum_type: CHECKSUM_TYPE.to_string(),
            checksum: artifact.checksum.clone(),
        }
    }
}

/// All archives of one release version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestVersion {
    /// Release version
    pub version: String,
    /// When the version entry was first created
    pub released_at: DateTime<Utc>,
    /// Archives, in the order they were recorded
    pub artifacts: Vec<ManifestArtifact>,
}

/// Manifest for one package across releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    /// Package name
    pub name: String,
    /// Versions, in the order they were recorded
    #[serde(default)]
    pub versions: Vec<ManifestVersion>,
}

impl ReleaseManifest {
    /// Empty manifest for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: Vec::new(),
        }
    }

    /// Reads the manifest at `path`, or starts a new one if the file does not exist.
    ///
    /// An existing manifest must belong to package `name`.
    pub async fn load_or_create(path: &Path, name: &str) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let manifest: Self = serde_json::from_str(&content)?;
                if manifest.name != name {
                    bail!(
                        "Manifest {} belongs to package '{}', not '{}'",
                        path.display(),
                        manifest.name,
                        name
                    );
                }
                log::debug!(
                    "Loaded manifest {} ({} versions)",
                    path.display(),
                    manifest.versions.len()
                );
                Ok(manifest)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Manifest create: {}", name);
                Ok(Self::new(name))
            }
            Err(e) => Err(e).fs_context("reading manifest", path),
        }
    }

    /// Looks up a version entry.
    pub fn version(&self, version: &str) -> Option<&ManifestVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Records one artifact under `version`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateArtifact`] if the version already lists the same
    /// (os, arch) pair. The manifest is left unchanged in that case.
    pub fn add(&mut self, version: &str, artifact: ManifestArtifact) -> Result<()> {
        if let Some(entry) = self.versions.iter_mut().find(|v| v.version == version) {
            if entry
                .artifacts
                .iter()
                .any(|a| a.os == artifact.os && a.arch == artifact.arch)
            {
                return Err(Error::DuplicateArtifact {
                    target: format!("{}-{}", artifact.os, artifact.arch),
                    version: version.to_string(),
                });
            }
            entry.artifacts.push(artifact);
            return Ok(());
        }

        self.versions.push(ManifestVersion {
            version: version.to_string(),
            released_at: Utc::now(),
            artifacts: vec![artifact],
        });
        Ok(())
    }

    /// Records every artifact of a run, stopping at the first duplicate.
    pub fn record(&mut self, version: &str, artifacts: &[BundledArtifact]) -> Result<()> {
        for artifact in artifacts {
            log::info!("Manifest add: {} ({})", artifact.target, version);
            self.add(version, artifact.into())?;
        }
        Ok(())
    }

    /// Writes the manifest as pretty JSON, creating parent directories.
    pub async fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating manifest directory", parent)?;
        }

        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        tokio::fs::write(path, json)
            .await
            .fs_context("writing manifest", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Target;

    fn artifact(os: &str, arch: &str) -> BundledArtifact {
        BundledArtifact {
            target: Target::new(os, arch),
            path: format!("/work/tool_1.0.0_{}_{}.zip", os, arch).into(),
            size: 42,
            checksum: "abc123".into(),
        }
    }

    #[test]
    fn add_groups_by_version() {
        let mut manifest = ReleaseManifest::new("tool");
        manifest.add("1.0.0", (&artifact("linux", "amd64")).into()).unwrap();
        manifest.add("1.0.0", (&artifact("darwin", "amd64")).into()).unwrap();
        manifest.add("1.1.0", (&artifact("linux", "amd64")).into()).unwrap();

        assert_eq!(manifest.versions.len(), 2);
        let first = manifest.version("1.0.0").unwrap();
        assert_eq!(first.artifacts.len(), 2);
        assert_eq!(first.artifacts[0].file, "tool_1.0.0_linux_amd64.zip");
        assert_eq!(first.artifacts[0].checksum_type, "sha256");
    }

    #[test]
    fn duplicate_cell_is_rejected() {
        let mut manifest = ReleaseManifest::new("tool");
        manifest.add("1.0.0", (&artifact("linux", "amd64")).into()).unwrap();

        let err = manifest
            .add("1.0.0", (&artifact("linux", "amd64")).into())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "linux-amd64 artifact already exists in manifest for version 1.0.0"
        );
        assert_eq!(manifest.version("1.0.0").unwrap().artifacts.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_starts_empty_and_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist").join("manifest.json");

        let mut manifest = ReleaseManifest::load_or_create(&path, "tool").await.unwrap();
        assert!(manifest.versions.is_empty());

        manifest
            .record("1.0.0", &[artifact("linux", "amd64"), artifact("windows", "amd64")])
            .unwrap();
        manifest.write(&path).await.unwrap();

        let reloaded = ReleaseManifest::load_or_create(&path, "tool").await.unwrap();
        assert_eq!(reloaded, manifest);
    }

    #[tokio::test]
    async fn manifest_of_other_package_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        ReleaseManifest::new("other").write(&path).await.unwrap();

        let err = ReleaseManifest::load_or_create(&path, "tool").await.unwrap_err();
        assert!(err.to_string().contains("belongs to package 'other'"));
    }

    #[tokio::test]
    async fn corrupt_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ReleaseManifest::load_or_create(&path, "tool").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
