use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;
use tempfile::TempDir;

/// Nothing listens on the discard port, so the seed fetch fails fast.
const UNREACHABLE_SEED: &str = "http://127.0.0.1:9/todos";

fn todoz(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.env("TODOZ_HOME", home)
        .env("TODOZ_SEED_URL", UNREACHABLE_SEED)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG");
    cmd
}

fn slot_file(home: &Path) -> std::path::PathBuf {
    home.join("todos.json")
}

/// Answers exactly one HTTP request with `body` and returns the URL.
fn serve_seed_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let mut request = Vec::new();
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    format!("http://{}/todos", addr)
}

#[test]
fn failed_seed_and_no_slot_shows_empty_list() {
    let home = TempDir::new().unwrap();

    todoz(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos."));

    // Nothing to persist yet, so the next run tries the seed again.
    assert!(!slot_file(home.path()).exists());
}

#[test]
fn first_run_persists_seed_and_later_runs_use_it() {
    let home = TempDir::new().unwrap();
    let url = serve_seed_once(
        r#"[{"userId":1,"id":1,"title":"delectus aut autem","completed":false},
            {"userId":1,"id":2,"title":"quis ut nam","completed":true}]"#,
    );

    todoz(home.path())
        .env("TODOZ_SEED_URL", &url)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 2 todos from the seed."))
        .stdout(predicate::str::contains("delectus aut autem"))
        .stdout(predicate::str::contains("[x] 2  quis ut nam"));

    let raw = fs::read_to_string(slot_file(home.path())).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["version"], 1);
    assert_eq!(stored["records"][0]["userId"], 1);

    // The seed server is gone now; the persisted copy is used.
    todoz(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("quis ut nam"))
        .stdout(predicate::str::contains("from the seed").not());
}

#[test]
fn add_toggle_delete_flow() {
    let home = TempDir::new().unwrap();

    todoz(home.path())
        .args(["--offline", "add", "Write", "report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added #1: Write report"));

    todoz(home.path())
        .args(["--offline", "a", "Ship it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added #2: Ship it"));

    todoz(home.path())
        .args(["--offline", "toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed #1: Write report"))
        .stdout(predicate::str::contains("1 of 2 done"));

    todoz(home.path())
        .args(["--offline", "rm", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted #2: Ship it"));

    todoz(home.path())
        .args(["--offline", "ls", "--completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 1  Write report"));

    todoz(home.path())
        .args(["--offline", "ls", "--active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos."));
}

#[test]
fn new_id_follows_max_existing_id() {
    let home = TempDir::new().unwrap();
    fs::write(
        slot_file(home.path()),
        r#"[{"id":1,"title":"one","completed":false},{"id":3,"title":"three","completed":false}]"#,
    )
    .unwrap();

    todoz(home.path())
        .args(["--offline", "delete", "3"])
        .assert()
        .success();

    todoz(home.path())
        .args(["--offline", "add", "X"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added #2: X"));
}

#[test]
fn unknown_ids_and_blank_titles_are_noops() {
    let home = TempDir::new().unwrap();

    todoz(home.path())
        .args(["--offline", "add", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing added"));

    todoz(home.path())
        .args(["--offline", "toggle", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No todo with id 42."));

    assert!(!slot_file(home.path()).exists());
}

#[test]
fn malformed_slot_loads_empty() {
    let home = TempDir::new().unwrap();
    fs::write(slot_file(home.path()), "not json").unwrap();

    todoz(home.path())
        .arg("--offline")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos."));
}

#[test]
fn partially_valid_slot_keeps_good_records() {
    let home = TempDir::new().unwrap();
    fs::write(
        slot_file(home.path()),
        r#"[{"id":1,"title":"A","completed":true},{"id":"bad"}]"#,
    )
    .unwrap();

    todoz(home.path())
        .arg("--offline")
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 1  A"))
        .stdout(predicate::str::contains("1 of 1 done"));
}

#[test]
fn reset_removes_slot() {
    let home = TempDir::new().unwrap();
    todoz(home.path())
        .args(["--offline", "add", "temp"])
        .assert()
        .success();
    assert!(slot_file(home.path()).exists());

    todoz(home.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local todo list removed."));
    assert!(!slot_file(home.path()).exists());
}

#[test]
fn path_points_at_slot_file() {
    let home = TempDir::new().unwrap();
    todoz(home.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("todos.json"));
}

#[test]
fn config_set_get_and_storage_key() {
    let home = TempDir::new().unwrap();

    todoz(home.path())
        .args(["config", "storage-key", "work"])
        .assert()
        .success();

    todoz(home.path())
        .args(["config", "storage-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storage-key = work"));

    todoz(home.path())
        .args(["--offline", "add", "in work list"])
        .assert()
        .success();
    assert!(home.path().join("work.json").exists());
    assert!(!slot_file(home.path()).exists());
}

#[test]
fn config_rejects_bad_input() {
    let home = TempDir::new().unwrap();

    todoz(home.path())
        .args(["config", "seed-limit", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    todoz(home.path())
        .args(["config", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}
