//! Watch loop: re-renders the view whenever the watched directory changes.

use crate::tree::TreeBuilder;
use crate::view::FolderViewer;
use crate::watcher::WatchEvent;
use crossbeam_channel::{select, Receiver};
use std::io::{self, Write};
use tracing::{error, info, warn};

/// What the loop renders on every change.
pub struct WatchTarget<'a> {
    pub root_path: &'a str,
    pub expanded_text: &'a str,
}

/// Print one render per line to `out`: once up front, then once per change.
/// Returns after shutdown, root deletion, or the watcher channel closing,
/// with the number of renders written.
///
/// A render that fails (for instance while the tree is being rearranged) is
/// logged and skipped; the next change triggers another attempt.
pub fn run<B: TreeBuilder, W: Write>(
    viewer: &FolderViewer<B>,
    target: &WatchTarget<'_>,
    fs_rx: &Receiver<WatchEvent>,
    shutdown_rx: &Receiver<()>,
    out: &mut W,
) -> io::Result<usize> {
    let mut renders = 0;
    if emit(viewer, target, out)? {
        renders += 1;
    }

    loop {
        select! {
            recv(fs_rx) -> msg => {
                match msg {
                    Ok(WatchEvent::Changed(paths)) => {
                        info!(changed = paths.len(), first = ?paths.first(), "directory changed");
                        if emit(viewer, target, out)? {
                            renders += 1;
                        }
                    }
                    Ok(WatchEvent::RootDeleted) => {
                        warn!(root = %target.root_path, "watched directory deleted, stopping");
                        break;
                    }
                    Ok(WatchEvent::Error(e)) => {
                        warn!(error = %e, "watcher error");
                    }
                    // Channel closed, watcher thread died
                    Err(_) => break,
                }
            }
            recv(shutdown_rx) -> _signal => break,
        }
    }

    out.flush()?;
    Ok(renders)
}

fn emit<B: TreeBuilder, W: Write>(
    viewer: &FolderViewer<B>,
    target: &WatchTarget<'_>,
    out: &mut W,
) -> io::Result<bool> {
    match viewer.update_render(target.root_path, target.expanded_text) {
        Ok(view) => {
            writeln!(out, "{view}")?;
            out.flush()?;
            Ok(true)
        }
        Err(e) => {
            error!(error = %e, "render failed");
            Ok(false)
        }
    }
}
