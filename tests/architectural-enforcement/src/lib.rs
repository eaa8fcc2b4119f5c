//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No ambient mutable state in the screen core
//! - No UI toolkit dependencies in the screen core
//! - No panicking shortcuts in production code
//! - stdout in the daemon is reserved for the message channel
//!
//! The helpers below walk source trees relative to the workspace root and
//! hand back production lines (comments and `#[cfg(test)]` modules removed).

use std::path::{Path, PathBuf};

/// Workspace root, independent of the directory tests are run from
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    if !root.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Production lines of a source file as `(line_number, code)`
///
/// Stops at the first `#[cfg(test)]`; line comments are stripped.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// Scan every production line under `dir` with `check`
///
/// `check` returns a description for each offending line.
#[must_use]
pub fn scan(dir: &str, check: impl Fn(&str) -> Option<&'static str>) -> Vec<String> {
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        for (line_number, code) in production_lines(&content) {
            if let Some(reason) = check(code) {
                violations.push(format!(
                    "{}:{} - {}: {}",
                    path.display(),
                    line_number,
                    reason,
                    code.trim()
                ));
            }
        }
    }

    violations
}

/// Print violations and panic if there are any
pub fn assert_clean(title: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!(
        "\nFound {} violation(s): {title}.\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_tests_and_comments() {
        let source = "fn a() {}\n// comment\nlet x = 1; // trailing\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(source);
        assert_eq!(lines, vec![(1, "fn a() {}"), (3, "let x = 1; ")]);
    }

    #[test]
    fn test_workspace_root_contains_core() {
        assert!(workspace_root().join("screen").join("core").exists());
    }
}
