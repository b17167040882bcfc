//! Package name derivation from a link target.

use std::path::Path;

const SEPARATORS: [char; 2] = ['\\', '/'];

/// Return the package name for `target`: its final path segment.
///
/// Both `\` and `/` count as separators regardless of host platform, and
/// trailing separators and `.` segments are ignored (`C:\repos\myutil\.`
/// yields `myutil`).
/// Returns `None` for names that would not address a child of site-packages
/// (empty, `.`, `..`).
pub fn package_name(target: &Path) -> Option<String> {
    let raw = target.to_string_lossy();
    let mut trimmed = raw.trim_end_matches(SEPARATORS);
    while let Some(rest) = trimmed.strip_suffix('.') {
        if !rest.ends_with(SEPARATORS) {
            break;
        }
        trimmed = rest.trim_end_matches(SEPARATORS);
    }
    let name = match trimmed.rfind(SEPARATORS) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };
    // `C:` alone has no final segment worth linking.
    let name = if name.len() == 2 && name.ends_with(':') {
        ""
    } else {
        name
    };
    match name {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}
