//! Replace installed packages with junctions to development checkouts.
//!
//! `conda-link <dir>` swaps `<env>/Lib/site-packages/<name>` for a directory
//! junction pointing at `<dir>`, so edits to the checkout are picked up without
//! reinstalling. The layout mirrors the rest of the workspace:
//!
//! - **[`core`]**: Pure, deterministic logic (name derivation, path layout,
//!   entry classification). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files, environment lookup,
//!   child processes, link creation). Isolated behind small seams so tests can
//!   swap them.
//!
//! [`link`] coordinates core logic with I/O to implement the `conda-link` command.
//! The installer binary (`conda-link-setup`) reuses [`io`] and [`core`].

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod link;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{Error, Result};
