use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const NOON: &str = "2024-03-20T12:00:00";

fn utsav(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_utsav"))
        .env("UTSAV_CONFIG_DIR", root.join("config"))
        .env("UTSAV_DATA_DIR", root.join("data"))
        .env("UTSAV_CACHE_DIR", root.join("cache"))
        .env("UTSAV_NOW", NOON)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run utsav")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "utsav failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn theme_toggle_twice_restores_the_theme() {
    let root = TempDir::new().unwrap();

    assert_eq!(stdout(&utsav(root.path(), &["theme"])).trim(), "light (fa-moon)");
    assert_eq!(
        stdout(&utsav(root.path(), &["theme", "toggle"])).trim(),
        "dark (fa-sun)"
    );
    assert_eq!(
        stdout(&utsav(root.path(), &["theme", "show"])).trim(),
        "dark (fa-sun)"
    );
    assert_eq!(
        stdout(&utsav(root.path(), &["theme", "toggle"])).trim(),
        "light (fa-moon)"
    );

    let state = fs::read_to_string(root.path().join("config/state.toml")).unwrap();
    assert!(state.contains("theme = \"light\""), "state was: {state}");
}

#[test]
fn night_time_defaults_to_dark() {
    let root = TempDir::new().unwrap();
    let output = utsav(root.path(), &["--now", "2024-03-20T22:30:00", "theme"]);
    assert_eq!(stdout(&output).trim(), "dark (fa-sun)");
}

#[test]
fn language_toggle_persists() {
    let root = TempDir::new().unwrap();
    assert_eq!(stdout(&utsav(root.path(), &["lang"])).trim(), "EN");
    assert_eq!(stdout(&utsav(root.path(), &["lang", "toggle"])).trim(), "HI");
    assert_eq!(stdout(&utsav(root.path(), &["lang", "show"])).trim(), "HI");
}

#[test]
fn events_show_prints_the_requested_event() {
    let root = TempDir::new().unwrap();
    let text = stdout(&utsav(root.path(), &["events", "show", "2"]));
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Hindi Poetry Slam"));
    assert!(text.contains("Seminar Hall"));
    assert!(text.contains("countdown: 00d 04h 00m 00s"));
    assert!(text.contains("Express yourself through the beauty of Hindi poetry."));
}

#[test]
fn events_show_rejects_unknown_ids() {
    let root = TempDir::new().unwrap();
    let output = utsav(root.path(), &["events", "show", "99"]);
    assert!(!output.status.success());
}

#[test]
fn events_list_emits_json() {
    let root = TempDir::new().unwrap();
    let text = stdout(&utsav(root.path(), &["events", "list", "--json"]));
    let listing: serde_json::Value = serde_json::from_str(&text).unwrap();
    let events = listing.as_array().unwrap();
    assert_eq!(events.len(), 10);
    assert_eq!(events[1]["id"], 2);
    assert_eq!(events[1]["title"]["en"], "Hindi Poetry Slam");
    assert_eq!(events[1]["starts_at"], "2024-03-20T16:00:00");
    assert_eq!(events[0]["countdown"], "Event Started");
}

#[test]
fn site_config_replaces_the_catalogue() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("site.toml"),
        r#"
version = 1

[[events]]
id = 7
title = { en = "Tech Workshop", hi = "टेक वर्कशॉप" }
date = "March 21, 2024"
time = "2:00 PM"
venue = "Tech Lab 101, NSUT"
description = "Hands-on coding sessions."
"#,
    )
    .unwrap();

    let text = stdout(&utsav(root.path(), &["events", "list"]));
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("Tech Workshop"));

    stdout(&utsav(root.path(), &["lang", "toggle"]));
    let text = stdout(&utsav(root.path(), &["events", "show", "7"]));
    assert_eq!(text.lines().next(), Some("टेक वर्कशॉप"));
    assert!(text.contains("countdown: 01d 02h 00m 00s"));
}

#[test]
fn invalid_site_config_is_reported() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("site.toml"), "version = 9\n").unwrap();

    let output = utsav(root.path(), &["events", "list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("site config"));
}

#[test]
fn countdown_lists_every_event() {
    let root = TempDir::new().unwrap();
    let text = stdout(&utsav(root.path(), &["countdown"]));
    assert_eq!(text.lines().count(), 10);
    assert!(text.lines().next().unwrap().ends_with("Event Started"));
    assert!(text.contains("Hindi Film Festival"));

    let watched = stdout(&utsav(root.path(), &["countdown", "--watch", "--ticks", "2"]));
    assert_eq!(watched.lines().filter(|line| line.is_empty()).count(), 1);
}

#[test]
fn where_reports_overridden_directories() {
    let root = TempDir::new().unwrap();
    let text = stdout(&utsav(root.path(), &["where"]));
    assert!(text.contains(&root.path().join("config").display().to_string()));
    assert!(text.contains("(missing)"));
    assert!(text.contains("theme=light language=en"));
    assert!(root.path().join("data").is_dir());
}

#[test]
fn join_form_thanks_valid_submissions() {
    let root = TempDir::new().unwrap();
    let output = utsav(
        root.path(),
        &["join", "--name", "Asha", "--email", "asha@example.com"],
    );
    assert_eq!(
        stdout(&output).trim(),
        "Thank you for joining! We will contact you soon."
    );
}

#[test]
fn join_form_rejects_bad_email() {
    let root = TempDir::new().unwrap();
    let output = utsav(root.path(), &["join", "--name", "Asha", "--email", "asha"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'asha' is not a valid email address"), "stderr: {stderr}");
}

#[test]
fn newsletter_requires_an_email() {
    let root = TempDir::new().unwrap();
    let output = utsav(root.path(), &["newsletter"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("email is required"));

    let output = utsav(root.path(), &["newsletter", "--email", "reader@example.com"]);
    assert_eq!(
        stdout(&output).trim(),
        "Thank you for subscribing to our newsletter!"
    );
}
