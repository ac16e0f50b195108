//! The two operations offered to a request layer: an initial render with
//! only the root open, and an update render driven by caller-held expansion
//! text.
//!
//! Every call is independent. The document root is canonicalized, the root
//! path is confined beneath it, the tree is built and rendered, and nothing
//! survives the call except the values handed back for the caller to resend.

use crate::confine;
use crate::error::{FolderViewError, Result};
use crate::expansion::ExpansionState;
use crate::render::{render_hidden_field, render_node, RenderConfig};
use crate::tree::{DirectoryNode, TreeBuilder, TreeConfig, WalkdirTreeBuilder};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Id of the hidden input carrying the serialized expansion set.
pub const EXPANDED_FIELD: &str = "ExpandedDirectories";
/// Id of the hidden input carrying the root path.
pub const ROOT_PATH_FIELD: &str = "RootPath";

/// Result of one render call.
#[derive(Debug, Clone)]
pub struct RenderedView {
    /// The tree that was rendered.
    pub tree: DirectoryNode,
    /// Nested directory and file blocks.
    pub body: String,
    /// Root path exactly as the caller supplied it.
    pub root_path: String,
    /// Expansion set used for the build, serialized.
    pub expanded: String,
}

impl RenderedView {
    /// Body followed by the two hidden inputs the caller must persist.
    pub fn to_markup(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)?;
        render_hidden_field(f, EXPANDED_FIELD, &self.expanded)?;
        render_hidden_field(f, ROOT_PATH_FIELD, &self.root_path)
    }
}

/// Renders views confined to one document root.
#[derive(Debug, Clone)]
pub struct FolderViewer<B: TreeBuilder = WalkdirTreeBuilder> {
    document_root: PathBuf,
    show_hidden: bool,
    render_config: RenderConfig,
    builder: B,
}

impl FolderViewer<WalkdirTreeBuilder> {
    pub fn new(document_root: impl Into<PathBuf>) -> Self {
        FolderViewer::with_builder(document_root, WalkdirTreeBuilder)
    }
}

impl<B: TreeBuilder> FolderViewer<B> {
    pub fn with_builder(document_root: impl Into<PathBuf>, builder: B) -> Self {
        FolderViewer {
            document_root: document_root.into(),
            show_hidden: false,
            render_config: RenderConfig::default(),
            builder,
        }
    }

    pub fn show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn render_config(mut self, render_config: RenderConfig) -> Self {
        self.render_config = render_config;
        self
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Render with only `root_path` open.
    pub fn initial_render(&self, root_path: &str) -> Result<RenderedView> {
        self.update_render(root_path, "")
    }

    /// Render with the directories listed in `expanded_text` open. Empty
    /// text behaves like `root_path` alone; the root is open regardless.
    pub fn update_render(&self, root_path: &str, expanded_text: &str) -> Result<RenderedView> {
        let expanded = ExpansionState::parse(expanded_text, root_path);
        if let Err(e) = expanded.validate() {
            warn!(error = %e, "rejected expansion text");
            return Err(e);
        }
        self.render(root_path, &expanded)
    }

    /// Build and render against an already parsed expansion set.
    pub fn render(&self, root_path: &str, expanded: &ExpansionState) -> Result<RenderedView> {
        let root_relative = confine::normalize_relative(root_path).inspect_err(|e| {
            warn!(error = %e, "rejected root path");
        })?;
        let document_root = confine::canonical_document_root(&self.document_root)?;
        let start = confine::resolve_within(&document_root, &root_relative).inspect_err(|e| {
            if matches!(e, FolderViewError::InvalidPath { .. }) {
                warn!(error = %e, "root path escapes the document root");
            }
        })?;
        if !start.is_dir() {
            return Err(FolderViewError::RootUnreadable {
                path: root_relative,
                source: io::Error::other("not a directory"),
            });
        }

        let tree_config = TreeConfig {
            document_root,
            show_hidden: self.show_hidden,
        };
        let tree = self
            .builder
            .build_tree(&start, &root_relative, expanded, &tree_config)?;

        let mut body = String::new();
        render_node(&mut body, &tree, true, &self.render_config)?;
        debug!(root = %root_relative, bytes = body.len(), "rendered folder view");

        Ok(RenderedView {
            tree,
            body,
            root_path: root_path.to_string(),
            expanded: expanded.serialize(),
        })
    }
}

/// Render `root_path` under `document_root` with only the root open.
pub fn initial_render(root_path: &str, document_root: &str) -> Result<String> {
    Ok(FolderViewer::new(document_root)
        .initial_render(root_path)?
        .to_markup())
}

/// Render `root_path` under `document_root` with the directories in
/// `expanded_text` open.
pub fn update_render(root_path: &str, document_root: &str, expanded_text: &str) -> Result<String> {
    Ok(FolderViewer::new(document_root)
        .update_render(root_path, expanded_text)?
        .to_markup())
}
