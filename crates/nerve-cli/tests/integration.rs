#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `nerve` running in `dir` with an isolated environment: no `.env`, no
/// inherited store, key or token settings.
fn nerve(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nerve").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DATABASE_URL")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("NERVE_BOT_TOKEN")
        .env_remove("ADMIN_PASSWORD")
        .env("NERVE_DB_PATH", dir.path().join("nerve.db"));
    cmd
}

// ---------------------------------------------------------------------------
// nerve schema
// ---------------------------------------------------------------------------

#[test]
fn schema_creates_sqlite_file() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlite"));
    assert!(dir.path().join("nerve.db").exists());
}

#[test]
fn schema_is_idempotent() {
    let dir = TempDir::new().unwrap();
    nerve(&dir).arg("schema").assert().success();
    nerve(&dir).arg("schema").assert().success();
}

#[test]
fn schema_fails_on_unusable_path() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .args(["schema", "--db-path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// nerve console
// ---------------------------------------------------------------------------

#[test]
fn console_walkthrough() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("console")
        .env("ADMIN_PASSWORD", "sesame")
        .write_stdin(
            "/truth\n\
             /addtruth hello world\n\
             /admin sesame\n\
             /addtruth hello world\n\
             /truth\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("No truths found."))
        .stdout(predicate::str::contains("You need admin rights"))
        .stdout(predicate::str::contains("✅ Admin mode activated!"))
        .stdout(predicate::str::contains("✅ Truth added!"))
        .stdout(predicate::str::contains("[Truth]\nhello world"));
}

#[test]
fn console_admin_is_per_author() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("console")
        .env("ADMIN_PASSWORD", "sesame")
        .write_stdin("alice: /admin sesame\nbob: /adddare sing\nalice: /adddare sing\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You need admin rights"))
        .stdout(predicate::str::contains("✅ Dare added!"));
}

#[test]
fn console_roast_without_key_uses_fallback() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("console")
        .args(["--admin-password", "sesame"])
        .write_stdin("/admin sesame\n/addtruth I snore\n/roastmode\n/truth\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Truth]\nI snore"))
        .stdout(predicate::str::contains("isn't plugged in"));
}

#[test]
fn console_ignores_chatter() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("console")
        .write_stdin("hello\nhow is everyone\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ---------------------------------------------------------------------------
// nerve serve
// ---------------------------------------------------------------------------

#[test]
fn serve_requires_token() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--token"));
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    nerve(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("console"))
        .stdout(predicate::str::contains("schema"));
}
