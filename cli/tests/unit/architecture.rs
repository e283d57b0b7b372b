//! Structural tests for layer boundaries.
//!
//! These scan source files so a stray import fails the build's test run
//! instead of slipping through review.

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

/// Read a file, dropping comment lines and everything after `#[cfg(test)]`.
fn read_production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.trim().starts_with("#[cfg(test)]"))
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src(sub: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(sub)
}

/// Every production line under `dir` containing any of `forbidden`.
fn find_violations(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in read_production_lines(&file).iter().enumerate() {
            if let Some(hit) = forbidden.iter().find(|f| line.contains(**f)) {
                violations.push(format!("{rel}:{}: `{hit}`: {line}", i + 1));
            }
        }
    }
    violations
}

#[test]
fn domain_is_free_of_io_and_outer_layers() {
    let violations = find_violations(
        &src("domain"),
        &[
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
        ],
    );
    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn application_does_not_reach_outer_layers() {
    let violations = find_violations(
        &src("application"),
        &["crate::infra", "crate::commands", "crate::output", "bollard", "ssh2"],
    );
    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn services_depend_on_ports_not_adapters() {
    let violations = find_violations(
        &src("application"),
        &["BollardRuntime", "Ssh2Shell", "HostPortProbe", "SystemUrlOpener"],
    );
    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_violations(&src("infra"), &["crate::commands", "crate::output"]);
    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = find_violations(&src("infra"), &["println!", "eprintln!"]);
    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn no_inline_json_branching_in_commands() {
    let violations = find_violations(&src("commands"), &["json: bool", "if json", "if !json"]);
    assert!(
        violations.is_empty(),
        "use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_handlers_accept_app_context() {
    let mut missing = Vec::new();
    for file in collect_rs_files(&src("commands")) {
        if file.file_name().and_then(|n| n.to_str()) == Some("mod.rs") {
            continue;
        }
        let content = std::fs::read_to_string(&file).unwrap_or_default();
        if !content.contains("fn run(app: &AppContext") {
            missing.push(file.display().to_string());
        }
    }
    assert!(missing.is_empty(), "handlers without AppContext: {missing:?}");
}
