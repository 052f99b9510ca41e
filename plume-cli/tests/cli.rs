use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const APOLOGY: &str = "Désolé, une erreur s'est produite. Veuillez réessayer.";

/// Serves exactly one canned HTTP response on a local port.
fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = [0_u8; 8192];
        let _ = stream.read(&mut buf);
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(response.as_bytes()).expect("write");
    });

    format!("http://{addr}/generate")
}

fn reply_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
    .to_string()
}

#[test]
fn missing_api_key_fails_with_hint() {
    let temp = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plume"));
    cmd.env("PLUME_CONFIG_DIR", temp.path())
        .env_remove("PLUME_API_KEY")
        .arg("bonjour")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key"));
}

#[test]
fn one_shot_prints_rendered_reply() {
    let temp = tempdir().expect("tempdir");
    let url = serve_once("HTTP/1.1 200 OK", reply_body("c'est **gagné**"));

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plume"));
    cmd.env("PLUME_CONFIG_DIR", temp.path())
        .env("PLUME_API_KEY", "test-key")
        .env("PLUME_API_URL", url)
        .arg("bonjour")
        .assert()
        .success()
        .stdout(predicate::str::contains("<strong>gagné</strong>"));
}

#[test]
fn raw_prints_reply_verbatim() {
    let temp = tempdir().expect("tempdir");
    let url = serve_once("HTTP/1.1 200 OK", reply_body("c'est **gagné**"));

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plume"));
    cmd.env("PLUME_CONFIG_DIR", temp.path())
        .env("PLUME_API_KEY", "test-key")
        .env("PLUME_API_URL", url)
        .arg("bonjour")
        .arg("--raw")
        .assert()
        .success()
        .stdout(predicate::str::contains("c'est **gagné**"))
        .stdout(predicate::str::contains("<strong>").not());
}

#[test]
fn api_failure_shows_apology_message() {
    let temp = tempdir().expect("tempdir");
    let url = serve_once("HTTP/1.1 500 Internal Server Error", String::new());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plume"));
    cmd.env("PLUME_CONFIG_DIR", temp.path())
        .env("PLUME_API_KEY", "test-key")
        .env("PLUME_API_URL", url)
        .arg("bonjour")
        .assert()
        .success()
        .stdout(predicate::str::contains(APOLOGY));
}

#[test]
fn raw_api_failure_prints_plain_apology() {
    let temp = tempdir().expect("tempdir");
    let url = serve_once("HTTP/1.1 404 Not Found", String::new());

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plume"));
    cmd.env("PLUME_CONFIG_DIR", temp.path())
        .env("PLUME_API_KEY", "test-key")
        .env("PLUME_API_URL", url)
        .arg("bonjour")
        .arg("--raw")
        .assert()
        .success()
        .stdout(predicate::str::contains(APOLOGY))
        .stdout(predicate::str::contains("<p>").not());
}

#[test]
fn theme_command_toggles_and_persists() {
    let temp = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plume"));
    cmd.env("PLUME_CONFIG_DIR", temp.path())
        .env("PLUME_API_KEY", "test-key")
        .write_stdin("/theme\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("theme: dark"));

    let saved = fs::read_to_string(temp.path().join("theme")).expect("theme file");
    assert_eq!(saved, "dark");
}
