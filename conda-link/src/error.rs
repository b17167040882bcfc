//! Error taxonomy shared by the linker and the installer.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors surfaced by link and install operations.
///
/// Every variant is fatal to the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A required directory is missing, malformed, or of an unexpected type.
    #[error("{0}")]
    Configuration(String),

    /// An underlying OS operation (tree removal, link creation) failed.
    #[error("{action}: {detail}")]
    Operation {
        /// What was being attempted, e.g. `Error creating junction`.
        action: String,
        /// Captured diagnostic output or the OS error text.
        detail: String,
    },

    /// File I/O outside of the link seam (config reads, installer copies).
    ///
    /// Displays only `context`; the OS error is the `source`, which `{:#}`
    /// rendering appends.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn operation(action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Operation {
            action: action.into(),
            detail: detail.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Shorthand for an I/O error whose context is an action on `path`.
    pub fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Self::io(format!("{action} {}", path.display()), source)
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation { .. })
    }
}
