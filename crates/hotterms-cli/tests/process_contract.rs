use std::path::Path;
use std::process::{Command, Output};
use std::{env, path::PathBuf};

use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_hotterms-cli") {
        return PathBuf::from(path);
    }
    if let Ok(path) = env::var("CARGO_BIN_EXE_hotterms_cli") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) {
        "hotterms-cli.exe"
    } else {
        "hotterms-cli"
    };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "hotterms-cli binary not found at {}",
        fallback.display()
    );
    fallback
}

fn run_cli(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(cli_bin_path())
        .env_remove("HOTTERMS_CONFIG")
        .env_remove("HOTTERMS_DATA_DIR")
        .env_remove("HOTTERMS_BACKEND")
        .env_remove("HOTTERMS_MAX_ENTRIES")
        .env_remove("HOTTERMS_DEFAULT_LIST_LIMIT")
        .env_remove("HOTTERMS_MAX_TERM_CHARS")
        .env("HOTTERMS_ADMIN_PASSWORD", "s3cret")
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("run hotterms-cli")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn recorded_terms_survive_across_invocations() {
    // Given a fresh data dir
    // When recording in one process and listing in another
    // Then the ranking reflects every recording.
    let root = tempdir().expect("tempdir");
    stdout_json(&run_cli(root.path(), &["record", "电影", "--times", "2"]));
    stdout_json(&run_cli(root.path(), &["record", "游戏"]));

    let listed = stdout_json(&run_cli(root.path(), &["list"]));
    let terms = listed.as_array().expect("array");
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0]["term"], "电影");
    assert_eq!(terms[0]["score"], 2);
    assert_eq!(terms[1]["term"], "游戏");
    assert_eq!(terms[1]["score"], 1);

    let status = stdout_json(&run_cli(root.path(), &["status"]));
    assert_eq!(status["mode"], "durable");
    assert_eq!(status["entries"], 2);
    assert_eq!(status["default_admin_password"], false);
}

#[test]
fn delete_with_wrong_password_exits_non_zero() {
    let root = tempdir().expect("tempdir");
    stdout_json(&run_cli(root.path(), &["record", "rust"]));

    let output = run_cli(root.path(), &["delete", "rust", "--password", "nope"]);
    assert!(
        !output.status.success(),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("incorrect password"));

    let removed = stdout_json(&run_cli(
        root.path(),
        &["delete", "rust", "--password", "s3cret"],
    ));
    assert_eq!(removed["removed"], true);

    let stats = stdout_json(&run_cli(root.path(), &["stats"]));
    assert_eq!(stats["total"], 0);
}

#[test]
fn memory_backend_does_not_persist() {
    let root = tempdir().expect("tempdir");
    stdout_json(&run_cli(
        root.path(),
        &["--backend", "memory", "record", "fleeting"],
    ));
    let listed = stdout_json(&run_cli(root.path(), &["--backend", "memory", "list"]));
    assert_eq!(listed, serde_json::json!([]));
}
