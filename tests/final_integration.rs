//! End-to-end test for foldview.
//!
//! Plays the part of the request layer:
//! 1. Creates a realistic document tree
//! 2. Renders the initial view and reads the hidden state fields back
//! 3. Clicks through expand and collapse links by editing the held set
//! 4. Renders concurrently from several threads
//!
//! Run with tracing output:
//!   RUST_LOG=debug cargo test --test final_integration -- --nocapture

mod common;

use common::plain_viewer;
use foldview::expansion::DELIMITER;
use foldview::view::{EXPANDED_FIELD, ROOT_PATH_FIELD};
use foldview::FolderViewer;
use std::fs;
use std::path::Path;
use std::thread;
use tempfile::TempDir;
use tracing::{debug, info, span, Level};
use tracing_subscriber::EnvFilter;

// ───────────────────────────────────────────────────
// Helpers
// ───────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Create a document root with a few years of reports and some noise.
fn create_document_fixture(root: &Path) {
    info!("Creating document fixture at {}", root.display());

    let dirs = [
        "reports/2023/q1",
        "reports/2023/q2",
        "reports/2024",
        "reports/2025",
        "manuals",
    ];
    let files: [(&str, u64); 6] = [
        ("reports/2023/q1/summary.pdf", 1_250_000),
        ("reports/2023/q2/summary.pdf", 980_000),
        ("reports/2024/jan.txt", 500_000),
        ("reports/index.html", 2_048),
        ("reports/.DS_Store", 6_148),
        ("manuals/install.pdf", 3_400_000_000),
    ];

    for dir in &dirs {
        fs::create_dir_all(root.join(dir)).unwrap();
        debug!("  Created dir:  {}", dir);
    }
    for (file, size) in &files {
        let f = fs::File::create(root.join(file)).unwrap();
        f.set_len(*size).unwrap();
        debug!("  Created file: {} ({} bytes)", file, size);
    }
}

/// Read a hidden input's value back out of the markup.
fn hidden_value<'a>(markup: &'a str, id: &str) -> &'a str {
    let marker = format!("id=\"{id}\" value=\"");
    let start = markup.find(&marker).unwrap() + marker.len();
    let len = markup[start..].find('"').unwrap();
    &markup[start..start + len]
}

/// Paths carried by every link calling `action`.
fn action_paths(markup: &str, action: &str) -> Vec<String> {
    let marker = format!("{action}('");
    markup
        .match_indices(&marker)
        .map(|(i, _)| {
            let rest = &markup[i + marker.len()..];
            rest[..rest.find("')").unwrap()].to_string()
        })
        .collect()
}

fn expand(held: &str, path: &str) -> String {
    format!("{held}{DELIMITER}{path}")
}

fn collapse(held: &str, path: &str) -> String {
    held.split(DELIMITER)
        .filter(|p| *p != path)
        .collect::<Vec<_>>()
        .join("|")
}

// ───────────────────────────────────────────────────
// Test 1: Client round-trips
// ───────────────────────────────────────────────────

#[test]
fn test_client_round_trips() {
    init_tracing();
    let _span = span!(Level::INFO, "client_round_trips").entered();

    let tmp = TempDir::new().unwrap();
    create_document_fixture(tmp.path());
    let viewer = plain_viewer(&tmp);

    // --- Step 1: Initial page ---
    let markup = viewer.initial_render("reports").unwrap().to_markup();
    let root_path = hidden_value(&markup, ROOT_PATH_FIELD).to_string();
    let mut held = hidden_value(&markup, EXPANDED_FIELD).to_string();
    assert_eq!(root_path, "reports");
    assert_eq!(held, "reports");
    assert_eq!(
        action_paths(&markup, "ExpandFolder"),
        vec!["reports/2023", "reports/2024", "reports/2025"]
    );
    assert!(markup.contains("index.html</a> (2.05 Kb)"));
    assert!(!markup.contains(".DS_Store"));
    info!("  [PASS] initial view");

    // --- Step 2: Expand 2023, then its q1 ---
    held = expand(&held, "reports/2023");
    let markup = viewer.update_render(&root_path, &held).unwrap().to_markup();
    assert_eq!(hidden_value(&markup, EXPANDED_FIELD), "reports|reports/2023");
    assert_eq!(action_paths(&markup, "CollapseFolder"), vec!["reports/2023"]);
    assert!(markup.contains("ExpandFolder('reports/2023/q1')\">+ q1</a> (1)"));

    held = expand(&held, "reports/2023/q1");
    let markup = viewer.update_render(&root_path, &held).unwrap().to_markup();
    assert!(markup.contains("summary.pdf</a> (1.25 Mb)"));
    assert_eq!(
        action_paths(&markup, "CollapseFolder"),
        vec!["reports/2023", "reports/2023/q1"]
    );
    info!("  [PASS] nested expansion");

    // --- Step 3: Collapse 2023; q1 stays in the set but is unreachable ---
    held = collapse(&held, "reports/2023");
    let view = viewer.update_render(&root_path, &held).unwrap();
    assert_eq!(view.expanded, "reports|reports/2023/q1");
    assert!(view.tree.find("reports/2023/q1").is_none());
    assert!(!view.body.contains("summary.pdf"));
    info!("  [PASS] collapse hides descendants");

    // --- Step 4: Re-expanding restores the remembered child ---
    held = expand(&held, "reports/2023");
    let view = viewer.update_render(&root_path, &held).unwrap();
    assert!(view.tree.find("reports/2023/q1").unwrap().expanded);
    info!("  [PASS] remembered expansion restored");
}

// ───────────────────────────────────────────────────
// Test 2: Whole document root, gigabyte file
// ───────────────────────────────────────────────────

#[test]
fn test_document_root_view() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    create_document_fixture(tmp.path());
    let viewer = plain_viewer(&tmp);

    let view = viewer.update_render("", "manuals").unwrap();
    assert_eq!(view.tree.item_count, 2);
    assert!(view.body.contains("install.pdf</a> (3.4 Gb)"));
    assert!(view.body.contains("ExpandFolder('reports')\">+ reports</a> (4)"));
}

// ───────────────────────────────────────────────────
// Test 3: Concurrent callers
// ───────────────────────────────────────────────────

#[test]
fn test_concurrent_renders_are_independent() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    create_document_fixture(tmp.path());
    let viewer = FolderViewer::new(tmp.path());

    let sets = [
        "reports",
        "reports|reports/2023",
        "reports|reports/2023|reports/2023/q2",
        "reports|reports/2024",
    ];
    let expected: Vec<String> = sets
        .iter()
        .map(|s| viewer.update_render("reports", s).unwrap().to_markup())
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = sets
            .iter()
            .map(|s| {
                let viewer = &viewer;
                scope.spawn(move || viewer.update_render("reports", s).unwrap().to_markup())
            })
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), want);
        }
    });
}
