//! Stable exit codes for `conda-link` and `conda-link-setup`.

/// Command succeeded.
pub const OK: i32 = 0;
/// Validation failure, OS command failure, or any other error.
pub const FAILURE: i32 = 1;
