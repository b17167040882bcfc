//! Linker configuration stored at `<env>/etc/conda-link.toml`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::layout::Layout;
use crate::error::{Error, Result};
use crate::io::backend::BackendKind;

/// Linker configuration (TOML).
///
/// Every field is optional in the file; missing fields default to the
/// standard Windows environment layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinkConfig {
    /// Which link backend to use (`auto`, `native`, `shell`).
    pub backend: BackendKind,

    /// Cap on captured stdout/stderr from OS commands, in bytes.
    pub output_limit_bytes: usize,

    pub layout: Layout,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Auto,
            output_limit_bytes: 100_000,
            layout: Layout::default(),
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<()> {
        let mut problems = self.layout.problems();
        if self.output_limit_bytes == 0 {
            problems.push("output_limit_bytes must be > 0".to_string());
        }
        if !problems.is_empty() {
            return Err(Error::configuration(format!(
                "invalid config:\n- {}",
                problems.join("\n- ")
            )));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LinkConfig::default()`.
pub fn load_config(path: &Path) -> Result<LinkConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        let cfg = LinkConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).map_err(|e| Error::io_at("read", path, e))?;
    let cfg: LinkConfig = toml::from_str(&contents)
        .map_err(|e| Error::configuration(format!("parse {}: {e}", path.display())))?;
    cfg.validate()?;
    debug!(path = %path.display(), backend = ?cfg.backend, "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, LinkConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("conda-link.toml");
        fs::write(&path, "backend = \"native\"\n[layout]\nlib_dir = \"lib\"\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.backend, BackendKind::Native);
        assert_eq!(cfg.layout.lib_dir, "lib");
        assert_eq!(cfg.layout.site_packages_dir, "site-packages");
        assert_eq!(cfg.output_limit_bytes, 100_000);
    }

    #[test]
    fn serialized_default_loads_back_unchanged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("conda-link.toml");
        let cfg = LinkConfig::default();
        fs::write(&path, toml::to_string_pretty(&cfg).expect("serialize")).expect("write");
        assert_eq!(load_config(&path).expect("load"), cfg);
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("conda-link.toml");
        fs::write(&path, "output_limit_bytes = 0\n[layout]\nscripts_dir = \"\"\n").expect("write");

        let err = load_config(&path).expect_err("invalid config");
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("output_limit_bytes must be > 0"));
        assert!(msg.contains("layout.scripts_dir must not be empty"));
    }

    #[test]
    fn unparseable_file_names_the_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("conda-link.toml");
        fs::write(&path, "backend = \"symlinkish\"\n").expect("write");

        let err = load_config(&path).expect_err("bad backend");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("conda-link.toml"));
    }
}
