//! Copy the linker into `<env>/Scripts` and write its wrapper.

use std::fs;
use std::path::{Path, PathBuf};

use conda_link::core::layout::{EnvPaths, LINKER_NAME, linker_file_name};
use conda_link::{Error, Result};
use tracing::{debug, info, instrument};

/// Wrapper script flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// `cmd.exe` batch file.
    Batch,
    /// POSIX `sh` script.
    Shell,
}

impl WrapperKind {
    pub fn host() -> Self {
        if cfg!(windows) { Self::Batch } else { Self::Shell }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Batch => "conda_link.bat",
            Self::Shell => "conda_link",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Batch => "batch file",
            Self::Shell => "shell wrapper",
        }
    }
}

/// Render a wrapper that runs `linker_file_name` from its own directory,
/// forwarding every argument verbatim.
pub fn render_wrapper(kind: WrapperKind, linker_file_name: &str) -> String {
    match kind {
        // `%~dp0` already ends with a backslash.
        WrapperKind::Batch => format!("@echo off\r\n\"%~dp0{linker_file_name}\" %*\r\n"),
        WrapperKind::Shell => {
            format!("#!/bin/sh\nexec \"$(dirname \"$0\")/{linker_file_name}\" \"$@\"\n")
        }
    }
}

/// Files written by [`install_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub linker_path: PathBuf,
    pub wrapper_path: PathBuf,
}

/// The `conda-link` executable shipped next to the running installer.
pub fn default_source() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| Error::io("locate installer executable", e))?;
    let dir = exe.parent().ok_or_else(|| {
        Error::configuration(format!("installer path has no parent: {}", exe.display()))
    })?;
    Ok(dir.join(linker_file_name()))
}

/// Copy `source` into the scripts directory and write the wrapper beside it.
///
/// Both files are overwritten if present. A missing source or unwritable
/// scripts directory fails with an I/O error naming the path.
#[instrument(skip(paths), fields(scripts_dir = %paths.scripts_dir.display()))]
pub fn install_files(paths: &EnvPaths, source: &Path, kind: WrapperKind) -> Result<InstallOutcome> {
    let linker_path = paths.linker_path.clone();
    if is_same_file(source, &linker_path) {
        debug!("source is already installed in place, skipping copy");
        println!("{} is already installed", linker_path.display());
    } else {
        fs::copy(source, &linker_path).map_err(|e| {
            Error::io(
                format!("copy {} to {}", source.display(), linker_path.display()),
                e,
            )
        })?;
        println!("Copied {} to {}", source.display(), linker_path.display());
    }

    let wrapper_path = paths.scripts_dir.join(kind.file_name());
    let contents = render_wrapper(kind, &linker_file_name());
    fs::write(&wrapper_path, contents).map_err(|e| Error::io_at("write", &wrapper_path, e))?;
    make_executable(&wrapper_path)?;
    println!(
        "Created {} at {} to wrap the {LINKER_NAME} command.",
        kind.label(),
        wrapper_path.display()
    );
    info!(linker = %linker_path.display(), wrapper = %wrapper_path.display(), "installed");

    Ok(InstallOutcome {
        linker_path,
        wrapper_path,
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| Error::io_at("set permissions on", path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
