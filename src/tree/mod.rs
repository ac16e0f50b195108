//! Partially expanded directory tree, built fresh for every render.

mod walk;

use crate::error::Result;
use crate::expansion::ExpansionState;
use std::path::{Path, PathBuf};

pub use walk::build_tree;

/// A regular file listed inside an expanded directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the document root.
    pub relative_path: String,
    pub filename: String,
    pub size_bytes: i64,
}

/// A directory in the rendered tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Display name (last path segment).
    pub name: String,
    /// Path relative to the document root, `/`-separated.
    pub relative_path: String,
    /// Whether the directory is open for this render.
    pub expanded: bool,
    /// Subdirectories; empty unless `expanded`.
    pub children: Vec<DirectoryNode>,
    /// Files; empty unless `expanded`.
    pub files: Vec<FileEntry>,
    /// Immediate non-hidden files plus immediate subdirectories, counted
    /// whether or not the node is expanded.
    pub item_count: usize,
    /// Set when the directory could not be listed. Such nodes are empty and
    /// cannot be expanded.
    pub error: Option<String>,
}

impl DirectoryNode {
    /// A collapsed node carrying only metadata.
    pub fn shallow(name: impl Into<String>, relative_path: impl Into<String>, item_count: usize) -> Self {
        DirectoryNode {
            name: name.into(),
            relative_path: relative_path.into(),
            item_count,
            ..Default::default()
        }
    }

    /// A collapsed node standing in for a directory that could not be read.
    pub fn unreadable(
        name: impl Into<String>,
        relative_path: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        DirectoryNode {
            error: Some(error.into()),
            ..DirectoryNode::shallow(name, relative_path, 0)
        }
    }

    /// Find a descendant (or this node) by root-relative path.
    pub fn find(&self, relative_path: &str) -> Option<&DirectoryNode> {
        if self.relative_path == relative_path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(relative_path))
    }

    /// Total number of directory nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DirectoryNode::node_count).sum::<usize>()
    }
}

/// Configuration for tree building.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Canonical document root every path is made relative to.
    pub document_root: PathBuf,
    /// Whether hidden files are listed and counted.
    pub show_hidden: bool,
}

impl TreeConfig {
    pub fn new(document_root: impl Into<PathBuf>) -> Self {
        TreeConfig {
            document_root: document_root.into(),
            show_hidden: false,
        }
    }
}

/// Abstraction over tree construction so it can be swapped or mocked.
pub trait TreeBuilder {
    fn build_tree(
        &self,
        path: &Path,
        root_relative: &str,
        expanded: &ExpansionState,
        config: &TreeConfig,
    ) -> Result<DirectoryNode>;
}

/// Default `TreeBuilder` that lists directories with walkdir.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkdirTreeBuilder;

impl TreeBuilder for WalkdirTreeBuilder {
    fn build_tree(
        &self,
        path: &Path,
        root_relative: &str,
        expanded: &ExpansionState,
        config: &TreeConfig,
    ) -> Result<DirectoryNode> {
        build_tree(path, root_relative, expanded, config)
    }
}
