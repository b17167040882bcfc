//! CLI tests for `conda-link-setup`.
//!
//! Spawns the installer with and without an activated environment and checks
//! exit codes and what lands in `Scripts/`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use conda_link::exit_codes;
use conda_link::test_support::TestEnv;

fn setup(env_var: Option<(&str, &Path)>, source: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conda-link-setup"));
    cmd.env_remove("CONDA_PREFIX")
        .env_remove("VIRTUAL_ENV")
        .env_remove("CONDA_LINK_CONFIG")
        .arg("--source")
        .arg(source);
    if let Some((name, root)) = env_var {
        cmd.env(name, root);
    }
    cmd.output().expect("run conda-link-setup")
}

fn fake_linker(env: &TestEnv) -> PathBuf {
    let source = env.root().parent().expect("temp").join("conda-link-build");
    fs::write(&source, "linker bytes").expect("write source");
    source
}

fn scripts_entries(env: &TestEnv) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(&env.paths().scripts_dir)
        .expect("read Scripts")
        .map(|entry| {
            entry
                .expect("entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[test]
fn refuses_to_run_outside_an_environment() {
    let env = TestEnv::new().expect("env");
    let source = fake_linker(&env);

    let output = setup(None, &source);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("must be run inside an activated conda environment")
    );
    assert!(scripts_entries(&env).is_empty());
}

#[test]
fn installs_into_active_conda_environment() {
    let env = TestEnv::new().expect("env");
    let source = fake_linker(&env);

    let output = setup(Some(("CONDA_PREFIX", env.root())), &source);

    assert_eq!(
        output.status.code(),
        Some(exit_codes::OK),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Detected conda environment:"));
    assert!(stdout.contains("Installation completed successfully!"));
    assert_eq!(
        fs::read_to_string(&env.paths().linker_path).expect("read linker"),
        "linker bytes"
    );
    assert_eq!(scripts_entries(&env).len(), 2);
}

#[test]
fn virtual_env_is_recognized() {
    let env = TestEnv::new().expect("env");
    let source = fake_linker(&env);

    let output = setup(Some(("VIRTUAL_ENV", env.root())), &source);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(env.paths().linker_path.is_file());
}

#[test]
fn missing_source_fails_with_path_in_message() {
    let env = TestEnv::new().expect("env");
    let source = env.root().join("no-such-linker");

    let output = setup(Some(("CONDA_PREFIX", env.root())), &source);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no-such-linker"));
    assert!(scripts_entries(&env).is_empty());
}
