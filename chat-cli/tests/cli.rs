//! End-to-end tests for the revalue-chat binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn revalue_chat() -> Command {
    let mut cmd = Command::cargo_bin("revalue-chat").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    revalue_chat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("ask"));
}

#[test]
fn status_reads_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat.toml");
    std::fs::write(
        &path,
        "[backend]\nbase_url = \"http://chat.test\"\n\n[chat]\npoll_interval_ms = 1500\nsender_id = \"guest-7\"\n",
    )
    .unwrap();

    revalue_chat()
        .arg("--config")
        .arg(&path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://chat.test"))
        .stdout(predicate::str::contains("1500ms"))
        .stdout(predicate::str::contains("guest-7"));
}

#[test]
fn base_url_flag_overrides_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat.toml");
    std::fs::write(&path, "[backend]\nbase_url = \"http://chat.test\"\n").unwrap();

    revalue_chat()
        .arg("--config")
        .arg(&path)
        .args(["--base-url", "http://override.test", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://override.test"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = tempdir().unwrap();

    revalue_chat()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn sections_splits_description() {
    revalue_chat()
        .args(["sections", "【Condition】Light wear\n[Size] 27cm\nHand stitched"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Condition\n  Light wear"))
        .stdout(predicate::str::contains("Size\n  27cm"))
        .stdout(predicate::str::contains("  Hand stitched"));
}

#[test]
fn items_shows_samples_when_backend_is_down() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat.toml");
    std::fs::write(&path, "[backend]\nbase_url = \"http://127.0.0.1:9\"\n").unwrap();

    revalue_chat()
        .arg("--config")
        .arg(&path)
        .arg("items")
        .assert()
        .success()
        .stdout(predicate::str::contains("showing samples"))
        .stdout(predicate::str::contains("sample-1"))
        .stdout(predicate::str::contains("    Repaired: "));
}
