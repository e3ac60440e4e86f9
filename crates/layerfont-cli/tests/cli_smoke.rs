//! CLI Smoke Tests
//!
//! Runs the `layerfont` binary against the outline fixture shipped with
//! the outline crate:
//! - `info`: lists styles, decorations, formats and sets
//! - `render`: SVG to stdout or file, JSON dump, and failure cases

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.push("layerfont-outline");
    path.push("tests");
    path.push("fixtures");
    path
}

fn temp_output(ext: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("layerfont_test_{}.{}", id, ext))
}

fn layerfont(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_layerfont"))
        .args(args)
        .env_remove("LAYERFONT_FONT_DIR")
        .env_remove("LAYERFONT_FAMILY")
        .env_remove("LAYERFONT_GSUB")
        .env_remove("LAYERFONT_CONVERTER")
        .env_remove("LAYERFONT_CACHE")
        .output()
        .expect("Failed to execute layerfont")
}

// ============================================================================
// Info Command Tests
// ============================================================================

#[test]
fn test_info_help() {
    let output = layerfont(&["info", "--help"]);
    assert!(output.status.success(), "info --help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Display layer styles"), "Help should describe the command");
}

#[test]
fn test_info_styles() {
    let output = layerfont(&["info", "--styles"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let shade = stdout.find("shade").unwrap();
    let inline = stdout.find("inline").unwrap();
    assert!(shade < inline, "Styles should be listed back to front");
    assert!(stdout.contains("#7e1414"));
    assert!(!stdout.contains("Output formats"));
}

#[test]
fn test_info_all_sections() {
    let output = layerfont(&["info"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for section in ["Layer styles", "Decorations", "Output formats", "Stylistic sets"] {
        assert!(stdout.contains(section), "Missing section {}", section);
    }
    assert!(stdout.contains("U+2588"));
    assert!(stdout.contains("image/svg+xml"));
}

// ============================================================================
// Render Command Tests - Success Cases
// ============================================================================

#[test]
fn test_render_svg_to_stdout() {
    let dir = fixture_dir();
    let output = layerfont(&[
        "render",
        "AB",
        "--font-dir",
        dir.to_str().unwrap(),
        "-l",
        "regular=ff0000",
        "-s",
        "100",
        "-q",
    ]);

    assert!(
        output.status.success(),
        "render should succeed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let svg = String::from_utf8_lossy(&output.stdout);
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<!-- AB -->"));
    assert!(svg.contains(r##"fill="#ff0000""##));
    assert!(output.stderr.is_empty(), "Quiet mode should print nothing");
}

#[test]
fn test_render_json_to_file() {
    let dir = fixture_dir();
    let output_file = temp_output("json");
    let output = layerfont(&[
        "render",
        "A\\u{2588}",
        "--font-dir",
        dir.to_str().unwrap(),
        "-o",
        output_file.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "render JSON should succeed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = fs::read_to_string(&output_file).expect("Failed to read output");
    assert!(json.contains(r#""layout""#));
    assert!(json.contains(r#""Char":"█""#));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Format: JSON"));

    let _ = fs::remove_file(output_file);
}

#[test]
fn test_render_block_from_query() {
    let dir = fixture_dir();
    let output = layerfont(&[
        "render",
        "--query",
        "text=AB&block=U%2B2B1B&size=50",
        "--font-dir",
        dir.to_str().unwrap(),
        "-q",
    ]);

    assert!(output.status.success());
    let svg = String::from_utf8_lossy(&output.stdout);
    assert_eq!(svg.matches(r##"xlink:href="#regular-u2B1B""##).count(), 2);
}

// ============================================================================
// Render Command Tests - Failure Cases
// ============================================================================

#[test]
fn test_render_missing_tables_fails() {
    let output = layerfont(&["render", "AB", "--font-dir", "/nonexistent/layerfont", "-q"]);
    assert!(!output.status.success(), "render without tables should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Nothing to render"));
}

#[test]
fn test_render_png_needs_converter() {
    let dir = fixture_dir();
    let output = layerfont(&["render", "AB", "--font-dir", dir.to_str().unwrap(), "-O", "png"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No converter configured"));
}

#[test]
fn test_render_rejects_unknown_format() {
    let output = layerfont(&["render", "AB", "-O", "gif"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gif"));
}
