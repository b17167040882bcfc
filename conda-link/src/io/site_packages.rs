//! Package-library directory lookup and entry inspection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::entry::EntryKind;
use crate::core::layout::EnvPaths;
use crate::error::{Error, Result};

/// Locate `<root>/Lib/site-packages` (per the configured layout).
///
/// Pure lookup: nothing is created or modified.
pub fn resolve_site_packages(paths: &EnvPaths) -> Result<PathBuf> {
    if !paths.lib_dir.is_dir() {
        return Err(Error::configuration(format!(
            "Invalid conda environment path: {}",
            paths.root.display()
        )));
    }
    if !paths.site_packages_dir.exists() {
        return Err(Error::configuration(format!(
            "Unable to locate site-packages in the given conda environment: {}",
            paths.site_packages_dir.display()
        )));
    }
    debug!(site_packages = %paths.site_packages_dir.display(), "site-packages found");
    Ok(paths.site_packages_dir.clone())
}

/// Classify whatever occupies `path` without following links.
pub fn inspect_entry(path: &Path) -> Result<EntryKind> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(EntryKind::from_file_type(metadata.file_type())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(EntryKind::Absent),
        Err(e) => Err(Error::io_at("inspect", path, e)),
    }
}
