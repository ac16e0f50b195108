use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{DirectoryNode, FileEntry, TreeConfig};
use crate::confine;
use crate::error::{FolderViewError, Result};
use crate::expansion::ExpansionState;

/// Immediate contents of one directory, before paths are made relative.
#[derive(Default)]
struct RawListing {
    /// (name, path, size in bytes)
    files: Vec<(String, PathBuf, i64)>,
    /// (name, path)
    dirs: Vec<(String, PathBuf)>,
}

impl RawListing {
    fn item_count(&self) -> usize {
        self.files.len() + self.dirs.len()
    }
}

/// Build the tree rooted at `path`.
///
/// `path` must lie under `config.document_root`. The node whose relative path
/// equals `root_relative` is always expanded; any other directory is
/// expanded only when `expanded` contains its relative path. Collapsed
/// directories are listed once to count their items and never descended.
///
/// Only a failure to list `path` itself is an error. Unreadable
/// subdirectories become empty nodes and are logged.
pub fn build_tree(
    path: &Path,
    root_relative: &str,
    expanded: &ExpansionState,
    config: &TreeConfig,
) -> Result<DirectoryNode> {
    let relative = confine::to_relative(&config.document_root, path)?;
    let listing = list_dir(path, config).map_err(|e| FolderViewError::RootUnreadable {
        path: relative.clone(),
        source: kind_only(&e),
    })?;

    let root = visit(path, relative, listing, root_relative, expanded, config)?;
    debug!(
        root = %root.relative_path,
        nodes = root.node_count(),
        expanded = expanded.len(),
        "built directory tree"
    );
    Ok(root)
}

/// Turn an already listed directory into a node, recursing into expanded
/// subdirectories.
fn visit(
    path: &Path,
    relative: String,
    listing: RawListing,
    root_relative: &str,
    expanded: &ExpansionState,
    config: &TreeConfig,
) -> Result<DirectoryNode> {
    let name = display_name(path);
    let is_open = relative == root_relative || expanded.contains(&relative);
    if !is_open {
        return Ok(DirectoryNode::shallow(name, relative, listing.item_count()));
    }

    let item_count = listing.item_count();

    let mut files = Vec::with_capacity(listing.files.len());
    for (filename, file_path, size_bytes) in listing.files {
        files.push(FileEntry {
            relative_path: confine::to_relative(&config.document_root, &file_path)?,
            filename,
            size_bytes,
        });
    }

    let mut children = Vec::with_capacity(listing.dirs.len());
    for (dir_name, dir_path) in listing.dirs {
        let dir_relative = confine::to_relative(&config.document_root, &dir_path)?;
        let child = match list_dir(&dir_path, config) {
            Ok(sub) if expanded.contains(&dir_relative) => {
                visit(&dir_path, dir_relative, sub, root_relative, expanded, config)?
            }
            Ok(sub) => DirectoryNode::shallow(dir_name, dir_relative, sub.item_count()),
            Err(e) => {
                let reason = describe(&e);
                warn!(path = %dir_relative, error = %reason, "directory unreadable, shown empty");
                DirectoryNode::unreadable(dir_name, dir_relative, reason)
            }
        };
        children.push(child);
    }

    Ok(DirectoryNode {
        name,
        relative_path: relative,
        expanded: true,
        children,
        files,
        item_count,
        error: None,
    })
}

/// List the immediate regular files and directories of `dir`.
///
/// A symlink is listed as its target's kind when the target resolves inside
/// the document root, and skipped otherwise. Special files are skipped. An
/// error opening `dir` itself is returned; entries whose metadata cannot be
/// read are logged and skipped.
fn list_dir(dir: &Path, config: &TreeConfig) -> std::result::Result<RawListing, walkdir::Error> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .follow_root_links(true)
        .sort_by(sort_cmp);

    let mut listing = RawListing::default();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            // Depth 0 means the directory itself could not be opened.
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                warn!(error = %describe(&e), "skipping unreadable entry");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let metadata = if entry.path_is_symlink() {
            match link_target_metadata(entry.path(), &config.document_root) {
                Some(m) => m,
                None => {
                    warn!(link = %name, "skipping symlink that leaves the document root or dangles");
                    continue;
                }
            }
        } else {
            match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(entry = %name, error = %describe(&e), "skipping entry without metadata");
                    continue;
                }
            }
        };

        if metadata.is_dir() {
            listing.dirs.push((name, entry.into_path()));
        } else if metadata.is_file() {
            if !config.show_hidden && is_hidden(&name, &metadata) {
                continue;
            }
            let size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);
            listing.files.push((name, entry.into_path(), size));
        }
    }
    Ok(listing)
}

/// Metadata of the symlink's target, provided the target resolves under the
/// canonical `document_root`.
fn link_target_metadata(link: &Path, document_root: &Path) -> Option<Metadata> {
    let target = fs::canonicalize(link).ok()?;
    if !target.starts_with(document_root) {
        return None;
    }
    fs::metadata(&target).ok()
}

/// Error text without the absolute path walkdir would otherwise include.
fn describe(e: &walkdir::Error) -> String {
    match e.io_error() {
        Some(io_err) => io_err.kind().to_string(),
        None => "filesystem loop".to_string(),
    }
}

/// Same as `describe`, as an `io::Error` that can serve as an error source.
fn kind_only(e: &walkdir::Error) -> io::Error {
    match e.io_error() {
        Some(io_err) => io::Error::from(io_err.kind()),
        None => io::Error::other("filesystem loop"),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(windows)]
fn is_hidden(name: &str, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    name.starts_with('.') || metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(name: &str, _metadata: &Metadata) -> bool {
    name.starts_with('.')
}

/// Case-insensitive by name, exact name breaking ties.
fn sort_cmp(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_name = a.file_name().to_string_lossy();
    let b_name = b.file_name().to_string_lossy();
    a_name
        .to_lowercase()
        .cmp(&b_name.to_lowercase())
        .then_with(|| a_name.cmp(&b_name))
}
