//! Tests for last-screen persistence

use agri_common::{Screen, ScreenStore};
use tempfile::TempDir;

#[test]
fn test_fresh_state_dir_starts_at_home() {
    let temp_dir = TempDir::new().unwrap();
    let store = ScreenStore::open(temp_dir.path());
    assert_eq!(store.current(), Screen::Home);
    assert!(!store.path().exists());
}

#[test]
fn test_navigate_persists_and_restores() {
    let temp_dir = TempDir::new().unwrap();

    let mut store = ScreenStore::open(temp_dir.path());
    store.navigate(Screen::Calendar).unwrap();
    assert_eq!(store.current(), Screen::Calendar);

    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("last_screen = \"calendar\""), "got {}", content);

    let reopened = ScreenStore::open(temp_dir.path());
    assert_eq!(reopened.current(), Screen::Calendar);
}

#[test]
fn test_last_navigation_wins() {
    let temp_dir = TempDir::new().unwrap();

    let mut store = ScreenStore::open(temp_dir.path());
    store.navigate(Screen::Water).unwrap();
    store.navigate(Screen::Voice).unwrap();

    assert_eq!(ScreenStore::open(temp_dir.path()).current(), Screen::Voice);
}

#[test]
fn test_unknown_saved_screen_falls_back_to_home() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("session.toml"),
        "last_screen = \"settings\"\n",
    )
    .unwrap();

    assert_eq!(ScreenStore::open(temp_dir.path()).current(), Screen::Home);
}

#[test]
fn test_malformed_session_falls_back_to_home() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("session.toml"), "last_screen = ").unwrap();

    assert_eq!(ScreenStore::open(temp_dir.path()).current(), Screen::Home);
}

#[test]
fn test_navigate_creates_missing_state_dir() {
    let temp_dir = TempDir::new().unwrap();
    let state_dir = temp_dir.path().join("not").join("yet");

    let mut store = ScreenStore::open(&state_dir);
    store.navigate(Screen::Disease).unwrap();

    assert!(state_dir.join("session.toml").exists());
}
