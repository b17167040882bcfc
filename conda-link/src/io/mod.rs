//! I/O helpers for the linker and installer.

pub mod backend;
pub mod config;
pub mod env;
pub mod process;
pub mod site_packages;
