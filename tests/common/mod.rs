#![allow(dead_code)]

use foldview::render::RenderConfig;
use foldview::tree::TreeConfig;
use foldview::FolderViewer;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a directory structure from a list of paths relative to the
/// fixture root. Paths ending with '/' create directories; others create
/// empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// Create files of the given sizes (sparse where the platform allows).
pub fn add_sized_files(tmp: &TempDir, files: &[(&str, u64)]) {
    for (p, size) in files {
        let full = tmp.path().join(p);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let f = fs::File::create(&full).unwrap();
        f.set_len(*size).unwrap();
    }
}

/// The `reports` fixture: `reports/2024/jan.txt` (500,000 bytes) and an
/// empty `reports/2025/`.
pub fn reports_fixture() -> TempDir {
    let tmp = create_fixture(&["reports/2025/"]);
    add_sized_files(&tmp, &[("reports/2024/jan.txt", 500_000)]);
    tmp
}

/// Canonical fixture root; temp dirs can sit behind symlinks (macOS /var).
pub fn canonical_root(tmp: &TempDir) -> PathBuf {
    tmp.path().canonicalize().unwrap()
}

pub fn tree_config(tmp: &TempDir) -> TreeConfig {
    TreeConfig::new(canonical_root(tmp))
}

/// Viewer without icons so assertions stay short.
pub fn plain_viewer(tmp: &TempDir) -> FolderViewer {
    FolderViewer::new(tmp.path()).render_config(RenderConfig {
        show_icons: false,
        ..Default::default()
    })
}
