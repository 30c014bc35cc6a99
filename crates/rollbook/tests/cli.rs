use std::path::Path;
use std::process::{Command, Output};

fn rollbook(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rollbook"))
        .args(args)
        .env("ROLLBOOK_STORAGE__DATABASE_PATH", data_dir.join("slots.db"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_broken_config(dir: &Path) -> String {
    let path = dir.join("broken.toml");
    std::fs::write(&path, "[display]\nvisible_rows = \"many\"\n").unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn validate_reports_a_broken_file_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_broken_config(dir.path());

    let output = rollbook(dir.path(), &["config", "validate", "--file", &broken]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[test]
fn config_path_and_validate_ignore_a_broken_active_config() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_broken_config(dir.path());
    let good = dir.path().join("good.toml");
    std::fs::write(&good, "[display]\nvisible_rows = 5\n").unwrap();

    let path = rollbook(dir.path(), &["-c", &broken, "config", "path"]);
    assert!(path.status.success());

    let validate = rollbook(
        dir.path(),
        &["-c", &broken, "config", "validate", "--file", &good.to_string_lossy()],
    );
    assert!(validate.status.success());
    assert!(String::from_utf8_lossy(&validate.stdout).contains("Configuration is valid."));

    let list = rollbook(dir.path(), &["-c", &broken, "list"]);
    assert!(!list.status.success());
}

#[test]
fn add_then_list_plain() {
    let dir = tempfile::tempdir().unwrap();

    let add = rollbook(
        dir.path(),
        &[
            "add", "--name", "Ann Lee", "--uid", "101", "--email", "a@b.co", "--contact",
            "1234567890",
        ],
    );
    assert!(add.status.success());

    let list = rollbook(dir.path(), &["list", "--format", "plain"]);
    assert!(list.status.success());
    let stdout = String::from_utf8_lossy(&list.stdout);
    let fields: Vec<&str> = stdout.trim_end().split('\t').collect();
    assert_eq!(fields.len(), 5);
    assert_eq!(&fields[1..], ["Ann Lee", "101", "a@b.co", "1234567890"]);
}

#[test]
fn add_with_whitespace_name_fails() {
    let dir = tempfile::tempdir().unwrap();

    let add = rollbook(
        dir.path(),
        &[
            "add", "--name", "   ", "--uid", "101", "--email", "a@b.co", "--contact",
            "1234567890",
        ],
    );
    assert!(!add.status.success());

    let list = rollbook(dir.path(), &["list", "--format", "plain"]);
    assert!(list.stdout.is_empty());
}
