#![forbid(unsafe_code)]
//! Foldview: a lazily expanded, root-confined directory tree rendered to HTML.
//!
//! Callers hold the set of open directories as `|`-separated text and send
//! it back on every request; only paths relative to the document root ever
//! cross the boundary.

pub mod cli;
pub mod confine;
pub mod error;
pub mod event_loop;
pub mod expansion;
pub mod render;
pub mod size;
pub mod tree;
pub mod view;
pub mod watcher;

pub use error::{FolderViewError, Result};
pub use expansion::ExpansionState;
pub use tree::{DirectoryNode, FileEntry};
pub use view::{initial_render, update_render, FolderViewer, RenderedView};
