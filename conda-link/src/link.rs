//! Orchestration for `conda-link <target_dir>`.
//!
//! A single guard chain: validate the target, derive the package name, clear
//! whatever directory or link holds that name in site-packages, then create
//! the link. Every failure is fatal; nothing is retried or rolled back.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::core::entry::{EntryKind, LinkPlan, plan_for};
use crate::core::package::package_name;
use crate::error::{Error, Result};
use crate::io::backend::LinkBackend;
use crate::io::site_packages::inspect_entry;

/// Result of a successful link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub package_name: String,
    /// `site-packages/<package_name>`, now a link.
    pub link_path: PathBuf,
    /// Absolute form of the requested target.
    pub target: PathBuf,
    /// What was removed first, if anything.
    pub replaced: Option<EntryKind>,
}

/// Replace `site_packages/<name of target_dir>` with a link to `target_dir`.
#[instrument(skip(backend))]
pub fn link_package(
    site_packages: &Path,
    target_dir: &Path,
    backend: &dyn LinkBackend,
) -> Result<LinkOutcome> {
    if !target_dir.exists() {
        return Err(Error::configuration(format!(
            "Target directory does not exist: {}",
            target_dir.display()
        )));
    }
    if !target_dir.is_dir() {
        return Err(Error::configuration(format!(
            "Target is not a directory: {}",
            target_dir.display()
        )));
    }

    let target =
        std::path::absolute(target_dir).map_err(|e| Error::io_at("resolve", target_dir, e))?;
    let name = package_name(&target).ok_or_else(|| {
        Error::configuration(format!(
            "Cannot derive a package name from {}",
            target_dir.display()
        ))
    })?;
    let link_path = site_packages.join(&name);
    debug!(package = %name, link = %link_path.display(), target = %target.display(), "planned link");

    let kind = inspect_entry(&link_path)?;
    let replaced = match plan_for(kind) {
        LinkPlan::Create => None,
        LinkPlan::Refuse => {
            return Err(Error::configuration(format!(
                "Cannot remove {}. It is not a directory or symlink.",
                link_path.display()
            )));
        }
        LinkPlan::Replace => {
            if target_within_entry(&target, &link_path, kind) {
                return Err(Error::configuration(format!(
                    "Refusing to replace {}: the target {} lies inside it",
                    link_path.display(),
                    target.display()
                )));
            }
            println!("Removing existing package: {}", link_path.display());
            backend.remove_tree(&link_path)?;
            info!(path = %link_path.display(), ?kind, "removed existing entry");
            Some(kind)
        }
    };

    println!(
        "Creating a {} from {} to {}",
        backend.link_label(),
        link_path.display(),
        target.display()
    );
    backend.create_directory_link(&link_path, &target)?;
    info!(link = %link_path.display(), target = %target.display(), "link created");

    Ok(LinkOutcome {
        package_name: name,
        link_path,
        target,
        replaced,
    })
}

/// True when removing the entry at `link_path` would destroy `target`.
///
/// Must run while the entry still exists. The target is addressed through the
/// entry when its own location (parent resolved, final component kept) is the
/// entry or lies below it. For a real directory, a target that resolves into
/// it by any route also counts. A link whose destination is the target is the
/// normal relink case and does not.
fn target_within_entry(target: &Path, link_path: &Path, kind: EntryKind) -> bool {
    // Lexically under the entry: the target path would dangle once it is removed.
    if std::path::absolute(link_path).is_ok_and(|link| target.starts_with(link)) {
        return true;
    }
    let Some(entry) = entry_location(link_path) else {
        return false;
    };
    if entry_location(target).is_some_and(|location| location.starts_with(&entry)) {
        return true;
    }
    if kind == EntryKind::Directory
        && let Ok(resolved) = fs::canonicalize(target)
    {
        return resolved.starts_with(&entry);
    }
    false
}

/// Resolve every component except the last, so a link is located, not followed.
fn entry_location(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(name))
}
