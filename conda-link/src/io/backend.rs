//! Filesystem link seam: tree removal and directory-link creation.
//!
//! `std` has no junction primitive, so on Windows the default backend shells
//! out to `cmd /C mklink /J`. Removal is native in every backend. Elsewhere
//! the native backend uses `std::fs` and directory symlinks.

use std::fs;
use std::path::Path;
use std::process::Command;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::io::process::run_command;

/// Backend selection as written in config or on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `shell` on Windows, `native` everywhere else.
    #[default]
    Auto,
    /// `std::fs` removal plus directory symlinks.
    Native,
    /// Native removal plus `cmd /C mklink /J`.
    Shell,
}

impl BackendKind {
    /// Replace `Auto` with the concrete backend for the host platform.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(windows) => Self::Shell,
            Self::Auto => Self::Native,
            other => other,
        }
    }
}

/// Structural filesystem operations needed to swap a package for a link.
pub trait LinkBackend {
    /// Remove `path` recursively. Links are removed without touching their target.
    fn remove_tree(&self, path: &Path) -> Result<()>;

    /// Create a directory link at `link` resolving to `target`.
    fn create_directory_link(&self, link: &Path, target: &Path) -> Result<()>;

    /// Name of the kind of link created, for progress messages.
    fn link_label(&self) -> &'static str;
}

/// Build the backend for `kind`.
pub fn backend_for(kind: BackendKind, output_limit_bytes: usize) -> Box<dyn LinkBackend> {
    match kind.resolve() {
        BackendKind::Shell => Box::new(ShellBackend { output_limit_bytes }),
        BackendKind::Native | BackendKind::Auto => Box::new(NativeBackend),
    }
}

/// Delegates to `cmd.exe` builtins.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    pub output_limit_bytes: usize,
}

impl ShellBackend {
    fn run(&self, cmd: Command, action: String) -> Result<()> {
        let output = run_command(cmd, self.output_limit_bytes)?;
        if output.success() {
            return Ok(());
        }
        Err(Error::operation(action, output.diagnostic()))
    }
}

impl LinkBackend for ShellBackend {
    /// Removal has a native primitive; only junction creation needs `cmd`.
    #[instrument(skip(self))]
    fn remove_tree(&self, path: &Path) -> Result<()> {
        remove_entry(path)
    }

    #[instrument(skip(self))]
    fn create_directory_link(&self, link: &Path, target: &Path) -> Result<()> {
        self.run(
            junction_command(link, target)?,
            "Error creating junction".to_string(),
        )
    }

    fn link_label(&self) -> &'static str {
        "junction"
    }
}

/// Arguments passed to `cmd` for `mklink /J`, with both paths quoted.
///
/// `/S /C "..."` makes `cmd` strip exactly the outer quote pair, so the inner
/// quotes survive and `&`, `|`, `^`, `(`, `)` in paths stay literal. Paths
/// containing `"` cannot be quoted for `cmd` and are rejected.
pub fn junction_command_line(link: &Path, target: &Path) -> Result<String> {
    let link = quote_for_cmd(link)?;
    let target = quote_for_cmd(target)?;
    Ok(format!("/S /C \"mklink /J {link} {target}\""))
}

fn quote_for_cmd(path: &Path) -> Result<String> {
    let raw = path.to_string_lossy();
    if raw.contains('"') {
        return Err(Error::configuration(format!(
            "Path contains a double quote and cannot be passed to cmd: {raw}"
        )));
    }
    Ok(format!("\"{raw}\""))
}

/// `cmd /S /C "mklink /J "<link>" "<target>""`.
pub fn junction_command(link: &Path, target: &Path) -> Result<Command> {
    let line = junction_command_line(link, target)?;
    let mut cmd = Command::new("cmd");
    append_raw(&mut cmd, &line);
    Ok(cmd)
}

#[cfg(windows)]
fn append_raw(cmd: &mut Command, line: &str) {
    use std::os::windows::process::CommandExt;

    // `arg` would apply MSVC quoting, which `cmd` does not understand.
    cmd.raw_arg(line);
}

#[cfg(not(windows))]
fn append_raw(cmd: &mut Command, line: &str) {
    cmd.arg(line);
}

/// Uses `std::fs` only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl LinkBackend for NativeBackend {
    #[instrument(skip(self))]
    fn remove_tree(&self, path: &Path) -> Result<()> {
        remove_entry(path)
    }

    #[instrument(skip(self))]
    fn create_directory_link(&self, link: &Path, target: &Path) -> Result<()> {
        symlink_dir(target, link)
            .map_err(|e| Error::operation("Error creating symlink", e.to_string()))
    }

    fn link_label(&self) -> &'static str {
        "symlink"
    }
}

/// Remove a link without touching its target, or a real directory recursively.
fn remove_entry(path: &Path) -> Result<()> {
    let action = format!("Error removing {}", path.display());
    let metadata =
        fs::symlink_metadata(path).map_err(|e| Error::operation(&action, e.to_string()))?;
    let removed = if metadata.file_type().is_symlink() {
        debug!("removing link");
        remove_link(path)
    } else {
        debug!("removing directory tree");
        fs::remove_dir_all(path)
    };
    removed.map_err(|e| Error::operation(action, e.to_string()))
}

#[cfg(windows)]
fn remove_link(path: &Path) -> std::io::Result<()> {
    // Directory symlinks and junctions are directories to the Win32 API.
    fs::remove_dir(path).or_else(|_| fs::remove_file(path))
}

#[cfg(not(windows))]
fn remove_link(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_dir(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "directory links are not supported on this platform",
    ))
}
