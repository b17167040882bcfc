//! Deterministic, pure logic shared by the linker and installer.
//!
//! Core modules must be free of I/O side effects. They operate on paths and
//! in-memory values and return deterministic outputs suitable for tests.

pub mod entry;
pub mod layout;
pub mod package;
