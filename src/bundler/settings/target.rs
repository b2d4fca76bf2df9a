//! A single cell of the target matrix.

use std::fmt;
use std::path::PathBuf;

/// Directory the cross-compiler writes binaries into, relative to the working directory.
pub const PKG_DIR: &str = "pkg";

/// One (OS, architecture) pair of the build matrix.
///
/// Names are passed through verbatim to the external tools, so `os` and `arch`
/// use whatever spelling the cross-compiler understands (`linux`, `darwin`,
/// `windows`, `amd64`, `arm64`, `386`, ...).
///
/// # Examples
///
/// ```
/// use kodegen_bundler_matrix::bundler::Target;
///
/// let target = Target::new("windows", "amd64");
/// assert_eq!(target.binary_path("app"), "./pkg/windows-amd64/app.exe");
/// assert_eq!(target.archive_name("tool", "1.2.0"), "tool_1.2.0_windows_amd64.zip");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Target {
    /// Target operating system
    pub os: String,
    /// Target architecture
    pub arch: String,
}

impl Target {
    /// Creates a matrix cell.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Whether binaries for this OS carry the `.exe` suffix.
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// Output directory of this cell, `pkg/<os>-<arch>`.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(PKG_DIR).join(self.to_string())
    }

    /// Executable file name produced for this cell.
    pub fn executable_name(&self, binary: &str) -> String {
        if self.is_windows() {
            format!("{}.exe", binary)
        } else {
            binary.to_string()
        }
    }

    /// Source path handed to the archiver: `./pkg/<os>-<arch>/<binary>[.exe]`.
    pub fn binary_path(&self, binary: &str) -> String {
        format!(
            "./{}/{}/{}",
            PKG_DIR,
            self,
            self.executable_name(binary)
        )
    }

    /// Archive file name: `<package>_<version>_<os>_<arch>.zip`.
    ///
    /// Never contains a directory component; the archive is written into the
    /// working directory.
    pub fn archive_name(&self, package: &str, version: &str) -> String {
        format!("{}_{}_{}_{}.zip", package, version, self.os, self.arch)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
