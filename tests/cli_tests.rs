//! Command line tests for the git-land binary

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command as StdCommand;
use tempfile::TempDir;

const CHANGE_ID: &str = "I0123456789abcdef0123456789abcdef01234567";

fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Repository on branch `fix` with one pending commit over `origin/master`
fn pending_repo(remote_url: &str) -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path();
    git(path, &["init", "-q"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/fix"]);
    git(path, &["config", "user.name", "Test Author"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    git(path, &["remote", "add", "origin", remote_url]);

    std::fs::write(path.join("README"), "hello\n").unwrap();
    git(path, &["add", "README"]);
    git(path, &["commit", "-q", "-m", "initial"]);
    git(path, &["update-ref", "refs/remotes/origin/master", "HEAD"]);

    std::fs::write(path.join("README"), "hello, world\n").unwrap();
    let message = format!("readme: greet the world\n\nChange-Id: {CHANGE_ID}\n");
    git(path, &["commit", "-q", "-a", "-m", &message]);
    let hash = git(path, &["rev-parse", "HEAD"]);

    (dir, hash)
}

fn git_land() -> Command {
    let mut cmd = Command::cargo_bin("git-land").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("GERRIT_HOST")
        .env("GERRIT_USER", "jdoe")
        .env("GERRIT_PASSWORD", "s3cret");
    cmd
}

#[test]
fn test_help_lists_commands() {
    git_land()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn test_submit_takes_one_commit() {
    git_land().args(["submit", "abc", "def"]).assert().code(2);
}

#[test]
fn test_submit_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    git_land()
        .args(["submit", "--path"])
        .arg(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("rev-parse"));
}

#[test]
fn test_submit_without_remote_fails() {
    let (dir, _) = pending_repo("https://gerrit.example.com/demo");
    git_land()
        .args(["submit", "--remote", "review", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote not found: review"));
}

#[test]
fn test_dry_run_checks_without_submitting() {
    let mut server = mockito::Server::new();
    let (dir, hash) = pending_repo(&format!("{}/demo", server.url()));

    let body = format!(
        r#")]}}'
{{"project":"demo","branch":"master","change_id":"{CHANGE_ID}","subject":"readme: greet the world",
"status":"NEW","_number":4242,"current_revision":"{hash}","mergeable":true,
"labels":{{"Code-Review":{{"approved":{{"name":"Reviewer"}}}}}}}}"#
    );
    let get = server
        .mock("GET", format!("/a/changes/demo~master~{CHANGE_ID}").as_str())
        .match_query(Matcher::Any)
        .match_header("authorization", "Basic amRvZTpzM2NyZXQ=")
        .with_status(200)
        .with_body(body)
        .create();
    let submit = server
        .mock("POST", Matcher::Regex("/submit$".to_string()))
        .expect(0)
        .create();

    git_land()
        .args(["submit", "-n", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would submit change #4242"))
        .stdout(predicate::str::contains("/c/demo/+/4242"));

    get.assert();
    submit.assert();
    assert_eq!(git(dir.path(), &["rev-parse", "HEAD"]), hash);
}
