//! `conda-link`: replace a package in the active environment with a junction.
//!
//! Resolves the environment root once (flag, `CONDA_PREFIX`/`VIRTUAL_ENV`, or
//! this executable's own `Scripts` directory), then swaps
//! `<env>/Lib/site-packages/<name>` for a link to the given directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use conda_link::core::layout::{EnvPaths, Layout, default_config_path};
use conda_link::exit_codes;
use conda_link::io::backend::{BackendKind, backend_for};
use conda_link::io::config::load_config;
use conda_link::io::env::EnvRoot;
use conda_link::io::site_packages::resolve_site_packages;
use conda_link::link::link_package;
use conda_link::logging;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "conda-link",
    version,
    about = "Replace a package in the current conda environment with a junction to the given directory."
)]
struct Cli {
    /// Directory to link the package to (e.g., C:\Users\user\repos\myutil).
    target_dir: PathBuf,

    /// Environment root. Defaults to the active environment.
    #[arg(long)]
    prefix: Option<PathBuf>,

    /// Config file. Defaults to `<env>/etc/conda-link.toml`.
    #[arg(long, env = "CONDA_LINK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured link backend.
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_codes::FAILURE);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let exe = std::env::current_exe().ok();
    let root = EnvRoot::resolve(
        cli.prefix,
        |name| std::env::var_os(name),
        exe.as_deref(),
        &Layout::default(),
    )?;

    let config_path = cli
        .config
        .unwrap_or_else(|| default_config_path(&root.path));
    let mut config = load_config(&config_path)?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    debug!(backend = ?config.backend.resolve(), "selected backend");

    let paths = EnvPaths::new(&root.path, &config.layout);
    let site_packages = resolve_site_packages(&paths)?;
    println!("Site-packages found at: {}", site_packages.display());

    let backend = backend_for(config.backend, config.output_limit_bytes);
    let outcome = link_package(&site_packages, &cli.target_dir, backend.as_ref())?;
    println!(
        "{} created successfully: {} -> {}",
        capitalize(backend.link_label()),
        outcome.link_path.display(),
        outcome.target.display()
    );
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_only() {
        let cli = Cli::parse_from(["conda-link", r"C:\repos\myutil"]);
        assert_eq!(cli.target_dir, PathBuf::from(r"C:\repos\myutil"));
        assert!(cli.prefix.is_none());
        assert!(cli.backend.is_none());
    }

    #[test]
    fn parse_prefix_and_backend() {
        let cli = Cli::parse_from([
            "conda-link",
            "--prefix",
            "env",
            "--backend",
            "native",
            "checkout",
        ]);
        assert_eq!(cli.prefix, Some(PathBuf::from("env")));
        assert_eq!(cli.backend, Some(BackendKind::Native));
    }

    #[test]
    fn target_dir_is_required() {
        assert!(Cli::try_parse_from(["conda-link"]).is_err());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("junction"), "Junction");
        assert_eq!(capitalize(""), "");
    }
}
