//! Discovery of the active environment root.
//!
//! The root is resolved once at the entry point and then passed explicitly.
//! Both binaries consult the same variables; only the linker may fall back to
//! its own install location, since it lives inside the environment it serves.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::layout::Layout;
use crate::error::{Error, Result};

/// Variables identifying an active environment, in priority order.
pub const ENV_ROOT_VARS: [&str; 2] = ["CONDA_PREFIX", "VIRTUAL_ENV"];

/// Where an environment root came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    /// `--prefix` on the command line.
    Flag,
    Variable(&'static str),
    /// Derived from the running executable's location.
    Executable,
}

impl fmt::Display for RootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("--prefix"),
            Self::Variable(name) => write!(f, "${name}"),
            Self::Executable => f.write_str("executable location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRoot {
    pub path: PathBuf,
    pub source: RootSource,
}

impl EnvRoot {
    /// Root from the first non-empty variable in [`ENV_ROOT_VARS`].
    pub fn from_env<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        ENV_ROOT_VARS.iter().find_map(|&name| {
            let value = lookup(name)?;
            if value.is_empty() {
                return None;
            }
            Some(Self {
                path: PathBuf::from(value),
                source: RootSource::Variable(name),
            })
        })
    }

    /// Root from the process environment.
    pub fn from_process_env() -> Option<Self> {
        Self::from_env(|name| std::env::var_os(name))
    }

    /// Root derived from an executable installed at `<root>/<scripts_dir>/<exe>`.
    ///
    /// Returns `None` when the executable does not sit in a scripts directory.
    pub fn from_executable(exe: &Path, layout: &Layout) -> Option<Self> {
        let scripts_dir = exe.parent()?;
        let dir_name = scripts_dir.file_name()?.to_str()?;
        if !dir_name.eq_ignore_ascii_case(&layout.scripts_dir) {
            return None;
        }
        let root = scripts_dir.parent()?;
        Some(Self {
            path: root.to_path_buf(),
            source: RootSource::Executable,
        })
    }

    /// Resolve the linker's environment root.
    ///
    /// Order: explicit flag, environment variables, executable location.
    pub fn resolve<F>(
        explicit: Option<PathBuf>,
        lookup: F,
        exe: Option<&Path>,
        layout: &Layout,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let root = explicit
            .map(|path| Self {
                path,
                source: RootSource::Flag,
            })
            .or_else(|| Self::from_env(lookup))
            .or_else(|| exe.and_then(|exe| Self::from_executable(exe, layout)))
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Unable to detect the active environment: set --prefix or activate an environment ({})",
                    ENV_ROOT_VARS.join(", ")
                ))
            })?;
        debug!(root = %root.path.display(), source = %root.source, "resolved environment root");
        Ok(root)
    }
}
