//! Integration Test: Screen Core Purity
//!
//! **Policy**: The screen core is a pure interpreter. All mutable state lives
//! in the registry owned by the interpreter, the core never draws anything
//! itself, and commands fail through `Result`, never through panics.

use architectural_enforcement::{assert_clean, scan, workspace_root};

const CORE_SRC: &str = "screen/core/src";
const DAEMON_SRC: &str = "screen/daemon/src";

/// No static or thread-local mutable state in the core
#[test]
fn test_no_ambient_mutable_state() {
    let violations = scan(CORE_SRC, |code| {
        if code.contains("static mut") {
            Some("static mut")
        } else if code.contains("thread_local!") {
            Some("thread-local state")
        } else if code.contains("lazy_static!") {
            Some("lazy static")
        } else {
            None
        }
    });

    assert_clean("Ambient mutable state in screen core", &violations);
}

/// No `unwrap()` / `expect()` in production code
#[test]
fn test_no_panicking_shortcuts() {
    let check = |code: &str| {
        if code.contains(".unwrap()") {
            Some("unwrap()")
        } else if code.contains(".expect(") {
            Some("expect()")
        } else {
            None
        }
    };

    let mut violations = scan(CORE_SRC, check);
    violations.extend(scan(DAEMON_SRC, check));

    assert_clean("Panicking shortcuts in production code", &violations);
}

/// stdout carries JSON lines only; logs and prompts go elsewhere
#[test]
fn test_daemon_stdout_reserved_for_messages() {
    let violations = scan(DAEMON_SRC, |code| {
        if code.contains("println!") || code.contains("print!(") {
            Some("print to stdout")
        } else if code.contains("std::io::stdout") || code.contains("std::io::stdin") {
            Some("blocking stdio")
        } else {
            None
        }
    });

    assert_clean("Daemon writes outside the message channel", &violations);
}

/// The core depends on no UI toolkit or terminal crate
#[test]
fn test_core_has_no_ui_dependencies() {
    let manifest = workspace_root().join("screen/core/Cargo.toml");
    let content = std::fs::read_to_string(&manifest).unwrap();

    let forbidden = ["ratatui", "crossterm", "winit", "egui", "gtk", "tracing-subscriber"];
    let found: Vec<String> = forbidden
        .iter()
        .filter(|name| content.lines().any(|line| line.trim_start().starts_with(*name)))
        .map(|name| format!("{} depends on {name}", manifest.display()))
        .collect();

    assert_clean("UI or subscriber dependency in screen core", &found);
}
