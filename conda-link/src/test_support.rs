//! Test-only helpers for building throwaway environment roots.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::layout::{EnvPaths, Layout};

/// A temporary environment root plus a sibling directory for checkouts.
///
/// ```text
/// <temp>/env/Lib/site-packages/
/// <temp>/env/Scripts/
/// <temp>/checkouts/
/// ```
pub struct TestEnv {
    temp: TempDir,
    paths: EnvPaths,
}

impl TestEnv {
    /// Environment with `Lib/site-packages` and `Scripts` present.
    pub fn new() -> Result<Self> {
        let env = Self::bare()?;
        fs::create_dir_all(&env.paths.site_packages_dir).context("create site-packages")?;
        fs::create_dir_all(&env.paths.scripts_dir).context("create Scripts")?;
        Ok(env)
    }

    /// Environment root with no subdirectories.
    pub fn bare() -> Result<Self> {
        let temp = tempfile::tempdir().context("tempdir")?;
        let root = temp.path().join("env");
        fs::create_dir_all(&root).context("create env root")?;
        fs::create_dir_all(temp.path().join("checkouts")).context("create checkouts")?;
        let paths = EnvPaths::new(root, &Layout::default());
        Ok(Self { temp, paths })
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    pub fn paths(&self) -> &EnvPaths {
        &self.paths
    }

    pub fn site_packages(&self) -> PathBuf {
        self.paths.site_packages_dir.clone()
    }

    /// Create `<temp>/checkouts/<name>` containing `__init__.py`.
    pub fn checkout(&self, name: &str) -> Result<PathBuf> {
        let dir = self.temp.path().join("checkouts").join(name);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        fs::write(dir.join("__init__.py"), format!("# checkout of {name}\n"))
            .context("write checkout __init__.py")?;
        Ok(dir)
    }

    /// Path under `checkouts/` that is never created.
    pub fn missing_checkout(&self, name: &str) -> PathBuf {
        self.temp.path().join("checkouts").join(name)
    }

    /// Create an installed package directory `site-packages/<name>`.
    pub fn install_package(&self, name: &str) -> Result<PathBuf> {
        let dir = self.paths.package_path(name);
        fs::create_dir_all(dir.join("data")).with_context(|| format!("create {}", dir.display()))?;
        fs::write(dir.join("__init__.py"), "# installed\n").context("write installed module")?;
        fs::write(dir.join("data").join("table.csv"), "a,b\n").context("write data file")?;
        Ok(dir)
    }
}
