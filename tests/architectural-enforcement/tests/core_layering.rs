//! Integration Test: Core Layering
//!
//! **Policy**: `calculator/core` is pure business logic. It MUST NOT depend on
//! ratatui, crossterm, tokio or any other surface/runtime crate, and its
//! production code MUST NOT `unwrap()` or `expect()`.

use std::fs;

use architectural_enforcement::{production_lines, rust_files, workspace_root};

const FORBIDDEN_CRATES: &[&str] = &["ratatui", "crossterm", "tokio", "futures"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("calculator/core/Cargo.toml"))
        .expect("core manifest should be readable");

    let violations: Vec<&str> = FORBIDDEN_CRATES
        .iter()
        .copied()
        .filter(|name| {
            manifest
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} ")) || line.trim_start().starts_with(&format!("{name}=")))
        })
        .collect();

    assert!(
        violations.is_empty(),
        "calculator-core must stay headless, found: {violations:?}"
    );
}

#[test]
fn test_core_source_does_not_use_ui_crates() {
    let files = rust_files("calculator/core/src");
    assert!(!files.is_empty(), "no core sources found");

    let mut violations = Vec::new();
    for path in files {
        let content = fs::read_to_string(&path).expect("source should be readable");
        for (line_number, line) in production_lines(&content) {
            for name in FORBIDDEN_CRATES {
                if line.contains(&format!("{name}::")) || line.contains(&format!("use {name}")) {
                    violations.push(format!("{}:{} - {}", path.display(), line_number, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI/runtime crates referenced from calculator-core:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_core_production_code_does_not_panic_on_results() {
    let mut violations = Vec::new();
    for path in rust_files("calculator/core/src") {
        let content = fs::read_to_string(&path).expect("source should be readable");
        for (line_number, line) in production_lines(&content) {
            if line.contains(".unwrap()") || line.contains(".expect(") {
                violations.push(format!("{}:{} - {}", path.display(), line_number, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "unwrap()/expect() in calculator-core production code:\n{}",
        violations.join("\n")
    );
}
