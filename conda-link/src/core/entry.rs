//! Classification of whatever already occupies a package path.

use std::fs::FileType;

/// What currently sits at `site-packages/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Absent,
    /// A real directory (an installed package).
    Directory,
    /// A symbolic link or junction, possibly dangling.
    Link,
    /// Anything else: regular files, devices, sockets.
    File,
}

impl EntryKind {
    /// Classify from link metadata (`symlink_metadata`), so links are never followed.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Link
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// Action to take before creating the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPlan {
    /// Nothing in the way.
    Create,
    /// Remove the existing directory or link, then create.
    Replace,
    /// A non-directory entry owns the name; leave it untouched and fail.
    Refuse,
}

pub fn plan_for(kind: EntryKind) -> LinkPlan {
    match kind {
        EntryKind::Absent => LinkPlan::Create,
        EntryKind::Directory | EntryKind::Link => LinkPlan::Replace,
        EntryKind::File => LinkPlan::Refuse,
    }
}
