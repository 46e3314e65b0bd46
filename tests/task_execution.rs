//! Integration tests for task execution

mod common;

use common::load;
use rcall::error::{ConfigError, RcallError};
use rcall::runner::{Context, TaskRunner, Verbosity};
use std::fs;
use tempfile::TempDir;

fn ctx_in(dir: &TempDir) -> Context {
    Context::new()
        .with_working_dir(dir.path().to_path_buf())
        .with_verbosity(Verbosity::Silent)
}

fn read_log(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("log")).unwrap_or_default()
}

#[test]
fn test_execute_simple_task() {
    let dir = TempDir::new().unwrap();
    let config = load(
        "[build]\ncmd = sh -c 'echo compile >> log'\ncmd = sh -c 'echo link >> log'\n",
        &[],
    );

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("build").unwrap();

    assert_eq!(read_log(&dir), "compile\nlink\n");
}

#[test]
fn test_execute_task_with_variables() {
    let dir = TempDir::new().unwrap();
    let config = load("name ?= Rust\n[greet]\nshell = echo \"Hello, ${name}!\" > log\n", &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("greet").unwrap();

    assert_eq!(read_log(&dir), "Hello, Rust!\n");
}

#[test]
fn test_override_changes_command() {
    let dir = TempDir::new().unwrap();
    let config = load("level ?= 1\n[t]\nshell = echo ${level} > log\n", &[("level", "5")]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("t").unwrap();

    assert_eq!(read_log(&dir), "5\n");
}

#[test]
fn test_children_before_parent() {
    let dir = TempDir::new().unwrap();
    let source = "\
[release] test build
shell = echo release >> log
[build] fmt
shell = echo build >> log
[test]
shell = echo test >> log
[fmt]
shell = echo fmt >> log
";
    let config = load(source, &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("release").unwrap();

    assert_eq!(read_log(&dir), "test\nfmt\nbuild\nrelease\n");
}

#[test]
fn test_shared_child_runs_each_time() {
    let dir = TempDir::new().unwrap();
    let source = "[all] a b\n[a] gen\n[b] gen\n[gen]\nshell = echo gen >> log\n";
    let config = load(source, &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("all").unwrap();

    assert_eq!(read_log(&dir), "gen\ngen\n");
}

#[test]
fn test_failing_entry_does_not_stop_siblings() {
    let dir = TempDir::new().unwrap();
    let config = load("[fail]\ncmd = false\ncmd = touch after\n", &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("fail").unwrap();

    assert!(dir.path().join("after").exists());
}

#[test]
fn test_failing_child_entry_still_runs_parent() {
    let dir = TempDir::new().unwrap();
    let source = "[deploy] check\nshell = touch deployed\n[check]\ncmd = false\n";
    let config = load(source, &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("deploy").unwrap();
    assert!(dir.path().join("deployed").exists());
}

#[test]
fn test_missing_program_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let source = "[all] broken\nshell = touch all\n[broken]\ncmd = no-such-program-rcall\n";
    let config = load(source, &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("all").unwrap();
    assert!(dir.path().join("all").exists());
}

#[test]
fn test_unknown_task_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let config = load("[build]\nshell = touch built\n", &[]);

    let ctx = ctx_in(&dir);
    let result = TaskRunner::new(&config, &ctx).run("deploy");

    assert!(matches!(
        result,
        Err(RcallError::Config(ConfigError::TaskNotFound(_)))
    ));
    assert!(!dir.path().join("built").exists());
}

#[test]
fn test_parallel_mode_runs_every_entry() {
    let dir = TempDir::new().unwrap();
    let source = "[prep]\nshell = touch p1\nshell = touch p2\n\
                  [all] prep\nshell = test -f p1 && test -f p2 && touch a1\nshell = touch a2\n";
    let config = load(source, &[]);

    let ctx = ctx_in(&dir).with_parallel(true);
    TaskRunner::new(&config, &ctx).run("all").unwrap();

    for name in ["p1", "p2", "a1", "a2"] {
        assert!(dir.path().join(name).exists(), "{name} missing");
    }
}

#[test]
fn test_command_entries_are_not_shell_interpreted() {
    let dir = TempDir::new().unwrap();
    let config = load("[t]\ncmd = touch 'a b' c>d\n", &[]);

    let ctx = ctx_in(&dir);
    TaskRunner::new(&config, &ctx).run("t").unwrap();

    assert!(dir.path().join("a b").exists());
    assert!(dir.path().join("c>d").exists());
}
