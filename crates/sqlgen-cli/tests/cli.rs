//! Integration tests for the `sqlgen` binary.
//!
//! These tests spawn the actual binary against temporary query trees and
//! check what ends up on stdout, stderr and disk.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn query_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (relative, content) in files {
        let path = dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
    }
    dir
}

fn sqlgen(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlgen"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SQLGEN_OUT")
        .env_remove("SQLGEN_DIALECT")
        .env_remove("SQLGEN_POLICY")
        .env_remove("SQLGEN_PERMS")
        .env_remove("SQLGEN_SUFFIX")
        .env_remove("SQLGEN_ROOT")
        .output()
        .expect("failed to spawn sqlgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_writes_to_stdout_by_default() {
    let dir = query_tree(&[("users/find_by_id.sql", "SELECT * FROM users WHERE id = :id")]);
    let output = sqlgen(dir.path(), &[]);

    assert!(output.status.success(), "{}", stderr(&output));
    let code = stdout(&output);
    assert!(code.contains("pub mod users {"));
    assert!(code.contains("pub struct FindById;"));
    assert!(code.contains("\"SELECT * FROM users WHERE id = $1\""));
}

#[test]
fn test_writes_to_file() {
    let dir = query_tree(&[("users/all.sql", "SELECT * FROM users LIMIT :n")]);
    let out: PathBuf = dir.path().join("queries.rs");
    let output = sqlgen(dir.path(), &["--out", out.to_str().unwrap(), "--perms", "0600"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
    let code = std::fs::read_to_string(&out).unwrap();
    assert!(code.contains("pub struct All;"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_question_mark_dialect() {
    let dir = query_tree(&[("users/search.sql", "SELECT * FROM users WHERE a = :q OR b = :q")]);
    let output = sqlgen(dir.path(), &["--dialect", "question"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("\"SELECT * FROM users WHERE a = ? OR b = ?\""));
}

#[test]
fn test_malformed_query_fails_without_output() {
    let dir = query_tree(&[("users/broken.sql", "SELECT 'unterminated")]);
    let out = dir.path().join("queries.rs");
    let output = sqlgen(dir.path(), &["--out", out.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(!out.exists(), "no output may be written on failure");
    let err = stderr(&output);
    assert!(err.contains("unterminated string literal"), "{err}");
    assert!(err.contains("broken.sql"), "{err}");
}

#[test]
fn test_invalid_permissions() {
    let dir = query_tree(&[("users/all.sql", "SELECT 1")]);
    let out = dir.path().join("queries.rs");
    let output = sqlgen(dir.path(), &["--out", out.to_str().unwrap(), "--perms", "rw-r--r--"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid permission format"));
    assert!(!out.exists());
}

#[test]
fn test_unopenable_output() {
    let dir = query_tree(&[("users/all.sql", "SELECT 1")]);
    let out = dir.path().join("no/such/dir/queries.rs");
    let output = sqlgen(dir.path(), &["--out", out.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unable to open"));
}

#[test]
fn test_unsupported_dialect() {
    let dir = query_tree(&[("users/all.sql", "SELECT 1")]);
    let output = sqlgen(dir.path(), &["--dialect", "named"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported dialect 'named'"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_root() {
    let dir = query_tree(&[]);
    let output = sqlgen(&dir.path().join("missing"), &[]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot resolve root directory"));
}
