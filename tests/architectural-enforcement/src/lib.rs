//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The calculator core stays free of UI dependencies
//! - Production code in the core does not `unwrap()` or `expect()`
//!
//! These tests are designed to catch violations early in the development cycle.

use std::path::{Path, PathBuf};

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    walkdir::WalkDir::new(workspace_root().join(dir))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Lines of `content` that belong to production code
///
/// Everything from the first `#[cfg(test)]` onward is treated as test code,
/// and comment lines are skipped. Yields `(line_number, line)`.
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| (idx + 1, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let src = "fn a() {}\n// note\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }\n";
        let lines = production_lines(src);
        assert_eq!(lines, vec![(1, "fn a() {}")]);
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
