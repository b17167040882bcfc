//! Canonical paths inside an environment root.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base name of the linker executable, without platform suffix.
pub const LINKER_NAME: &str = "conda-link";

/// Directory names making up an environment's layout.
///
/// Defaults describe a Windows conda/venv environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Layout {
    /// Executable-scripts directory, already on `PATH` when the environment is active.
    pub scripts_dir: String,
    /// Library directory directly under the root.
    pub lib_dir: String,
    /// Package directory under `lib_dir`.
    pub site_packages_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            scripts_dir: "Scripts".to_string(),
            lib_dir: "Lib".to_string(),
            site_packages_dir: "site-packages".to_string(),
        }
    }
}

impl Layout {
    /// Return a description of every invalid directory name.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (field, value) in [
            ("layout.scripts_dir", &self.scripts_dir),
            ("layout.lib_dir", &self.lib_dir),
            ("layout.site_packages_dir", &self.site_packages_dir),
        ] {
            if let Some(reason) = invalid_component(value) {
                problems.push(format!("{field} {reason}"));
            }
        }
        problems
    }
}

fn invalid_component(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some("must not be empty");
    }
    if value.contains(['/', '\\']) {
        return Some("must be a single directory name");
    }
    if value == "." || value == ".." {
        return Some("must not be '.' or '..'");
    }
    None
}

/// All canonical paths for an environment root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPaths {
    pub root: PathBuf,
    pub scripts_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub site_packages_dir: PathBuf,
    /// Installed linker executable inside `scripts_dir`.
    pub linker_path: PathBuf,
    pub config_path: PathBuf,
}

impl EnvPaths {
    pub fn new(root: impl Into<PathBuf>, layout: &Layout) -> Self {
        let root = root.into();
        let scripts_dir = root.join(&layout.scripts_dir);
        let lib_dir = root.join(&layout.lib_dir);
        let site_packages_dir = lib_dir.join(&layout.site_packages_dir);
        Self {
            root: root.clone(),
            linker_path: scripts_dir.join(linker_file_name()),
            scripts_dir,
            lib_dir,
            site_packages_dir,
            config_path: default_config_path(&root),
        }
    }

    /// Path of the entry that would be replaced for `package_name`.
    pub fn package_path(&self, package_name: &str) -> PathBuf {
        self.site_packages_dir.join(package_name)
    }
}

/// `<root>/etc/conda-link.toml`.
pub fn default_config_path(root: &Path) -> PathBuf {
    root.join("etc").join(format!("{LINKER_NAME}.toml"))
}

/// `conda-link` plus the host executable suffix (`.exe` on Windows).
pub fn linker_file_name() -> String {
    format!("{LINKER_NAME}{EXE_SUFFIX}")
}
