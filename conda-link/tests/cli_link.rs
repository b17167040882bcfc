//! CLI tests for `conda-link`.
//!
//! Spawns the binary against throwaway environment roots and checks exit
//! codes and the resulting site-packages state.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use conda_link::exit_codes;
use conda_link::test_support::TestEnv;

fn conda_link(env_root: Option<&Path>, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conda-link"));
    cmd.env_remove("CONDA_PREFIX")
        .env_remove("VIRTUAL_ENV")
        .env_remove("CONDA_LINK_CONFIG");
    if let Some(root) = env_root {
        cmd.env("CONDA_PREFIX", root);
    }
    cmd.args(args).output().expect("run conda-link")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn missing_target_exits_with_failure_and_mutates_nothing() {
    let env = TestEnv::new().expect("env");
    let installed = env.install_package("myutil").expect("install");
    let target = env.missing_checkout("myutil");

    let output = conda_link(Some(env.root()), &[target.to_str().expect("utf8")]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let err = stderr(&output);
    assert!(err.starts_with("Error: Target directory does not exist"), "{err}");
    assert!(err.contains("myutil"));
    assert!(installed.join("__init__.py").is_file());
}

#[test]
fn environment_without_lib_exits_with_failure() {
    let env = TestEnv::bare().expect("env");
    let target = env.checkout("myutil").expect("checkout");

    let output = conda_link(Some(env.root()), &[target.to_str().expect("utf8")]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(stderr(&output).contains("Invalid conda environment path"));
}

#[test]
fn no_active_environment_exits_with_failure() {
    let env = TestEnv::new().expect("env");
    let target = env.checkout("myutil").expect("checkout");

    let output = conda_link(None, &[target.to_str().expect("utf8")]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(stderr(&output).contains("Unable to detect the active environment"));
}

#[test]
fn plain_file_in_the_way_is_left_alone() {
    let env = TestEnv::new().expect("env");
    let occupied = env.site_packages().join("myutil");
    fs::write(&occupied, "keep me").expect("write");
    let target = env.checkout("myutil").expect("checkout");

    let output = conda_link(Some(env.root()), &[target.to_str().expect("utf8")]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(stderr(&output).contains("is not a directory or symlink"));
    assert_eq!(fs::read_to_string(&occupied).expect("read"), "keep me");
}

#[cfg(unix)]
#[test]
fn links_then_relinks_idempotently() {
    let env = TestEnv::new().expect("env");
    let target = env.checkout("myutil").expect("checkout");
    let target_arg = target.to_str().expect("utf8");
    let link = env.site_packages().join("myutil");

    let first = conda_link(Some(env.root()), &["--backend", "native", target_arg]);
    assert_eq!(first.status.code(), Some(exit_codes::OK), "{}", stderr(&first));
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("Site-packages found at:"));
    assert!(stdout.contains("Symlink created successfully:"));

    let second = conda_link(Some(env.root()), &["--backend", "native", target_arg]);
    assert_eq!(second.status.code(), Some(exit_codes::OK), "{}", stderr(&second));
    assert!(String::from_utf8_lossy(&second.stdout).contains("Removing existing package:"));

    assert_eq!(fs::read_link(&link).expect("read_link"), target);
    assert!(link.join("__init__.py").is_file());
}

#[cfg(unix)]
#[test]
fn installed_directory_is_replaced_with_link() {
    let env = TestEnv::new().expect("env");
    let installed = env.install_package("myutil").expect("install");
    let target = env.checkout("myutil").expect("checkout");
    let trailing = format!("{}/", target.display());

    let output = conda_link(Some(env.root()), &[&trailing]);

    assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
    let meta = fs::symlink_metadata(&installed).expect("metadata");
    assert!(meta.file_type().is_symlink());
    assert!(!target.join("data").exists());
}

#[cfg(unix)]
#[test]
fn prefix_flag_and_config_layout_are_honored() {
    let env = TestEnv::bare().expect("env");
    let site = env.root().join("lib").join("dist-packages");
    fs::create_dir_all(&site).expect("mkdir");
    let config = env.root().join("layout.toml");
    fs::write(
        &config,
        "[layout]\nlib_dir = \"lib\"\nsite_packages_dir = \"dist-packages\"\n",
    )
    .expect("write config");
    let target = env.checkout("myutil").expect("checkout");

    let output = conda_link(
        None,
        &[
            "--prefix",
            env.root().to_str().expect("utf8"),
            "--config",
            config.to_str().expect("utf8"),
            target.to_str().expect("utf8"),
        ],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
    assert_eq!(fs::read_link(site.join("myutil")).expect("read_link"), target);
}
