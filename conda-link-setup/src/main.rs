//! `conda-link-setup`: install `conda-link` into the active environment.
//!
//! Must run with an environment activated (`CONDA_PREFIX` or `VIRTUAL_ENV`).
//! Copies the linker into `<env>/Scripts` and writes a wrapper beside it.

mod install;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use conda_link::core::layout::{EnvPaths, default_config_path};
use conda_link::exit_codes;
use conda_link::io::config::load_config;
use conda_link::io::env::EnvRoot;
use conda_link::logging;
use tracing::debug;

use crate::install::{WrapperKind, default_source, install_files};

#[derive(Parser)]
#[command(
    name = "conda-link-setup",
    version,
    about = "Install conda-link into the Scripts directory of the active conda environment"
)]
struct Cli {
    /// Linker executable to install. Defaults to `conda-link` next to this installer.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Config file. Defaults to `<env>/etc/conda-link.toml`.
    #[arg(long, env = "CONDA_LINK_CONFIG")]
    config: Option<PathBuf>,
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

    let Some(root) = EnvRoot::from_process_env() else {
        bail!("This script must be run inside an activated conda environment.");
    };
    println!("Detected conda environment: {}", root.path.display());
    debug!(source = %root.source, "environment root");

    let config_path = cli
        .config
        .unwrap_or_else(|| default_config_path(&root.path));
    let config = load_config(&config_path)?;
    let paths = EnvPaths::new(&root.path, &config.layout);

    let source = match cli.source {
        Some(source) => source,
        None => default_source()?,
    };
    install_files(&paths, &source, WrapperKind::host())?;

    println!("Installation completed successfully!");
    println!("You can now use the command: conda link <path-to-directory>");
    Ok(())
}
