//! Structural tests for layer boundaries.
//!
//! These tests scan source files so a stray import or print shows up as a
//! test failure rather than in review.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and report whether a line is inside a test-only block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(...test...)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(") && trimmed.contains("test") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn src_dir(layer: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer)
}

/// Non-test, non-comment lines of every file in `layer` matching `bad`.
fn violations(layer: &str, bad: impl Fn(&str) -> bool) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(&src_dir(layer)) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            if bad(line) {
                found.push(format!("{rel}:{}: {line}", i + 1));
            }
        }
    }
    found
}

#[test]
fn domain_is_pure() {
    let found = violations("domain", |line| {
        [
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
        ]
        .iter()
        .any(|p| line.contains(p))
    });
    assert!(
        found.is_empty(),
        "domain/ must not do I/O or depend on outer layers:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let found = violations("infra", |line| {
        line.contains("crate::commands") || line.contains("crate::output")
    });
    assert!(
        found.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        found.join("\n")
    );
}

#[test]
fn library_layers_do_not_print() {
    for layer in ["domain", "application", "infra"] {
        let found = violations(layer, |line| {
            line.contains("println!") || line.contains("eprintln!")
        });
        assert!(
            found.is_empty(),
            "{layer}/ must log through tracing, not print:\n{}",
            found.join("\n")
        );
    }
}

#[test]
fn application_has_no_imports_from_commands_or_output() {
    let found = violations("application", |line| {
        line.contains("crate::commands") || line.contains("crate::output")
    });
    assert!(
        found.is_empty(),
        "application/ must not import from commands/ or output/:\n{}",
        found.join("\n")
    );
}
