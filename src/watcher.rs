//! Filesystem watcher using `notify-debouncer-full` with crossbeam channels.

use crate::confine;
use crossbeam_channel::{self, Receiver, Sender};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebouncedEvent, Debouncer, RecommendedCache};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Events emitted by the filesystem watcher.
#[derive(Debug, PartialEq, Eq)]
pub enum WatchEvent {
    /// Something under the watched directory changed. Carries the affected
    /// paths relative to the document root, sorted and deduplicated.
    Changed(Vec<String>),
    /// The watched directory was deleted.
    RootDeleted,
    /// A watcher error occurred.
    Error(String),
}

pub type WatchHandle = Debouncer<RecommendedWatcher, RecommendedCache>;

/// Watch `path` (which lies under the canonical `document_root`)
/// recursively. The returned handle must be kept alive for events to flow.
pub fn start_watcher(
    document_root: &Path,
    path: &Path,
    debounce_ms: u64,
) -> Result<(WatchHandle, Receiver<WatchEvent>), notify::Error> {
    if !path.exists() {
        return Err(notify::Error::path_not_found().add_path(path.to_path_buf()));
    }

    let (tx, rx): (Sender<WatchEvent>, Receiver<WatchEvent>) = crossbeam_channel::unbounded();
    let root_path = path.to_path_buf();
    let document_root = document_root.to_path_buf();

    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        None,
        move |result: Result<Vec<DebouncedEvent>, Vec<notify::Error>>| match result {
            Ok(events) => {
                if std::fs::metadata(&root_path).is_err() {
                    let _ = tx.send(WatchEvent::RootDeleted);
                } else {
                    let paths = changed_paths(&document_root, &events);
                    let _ = tx.send(WatchEvent::Changed(paths));
                }
            }
            Err(errors) => {
                for error in errors {
                    let _ = tx.send(WatchEvent::Error(describe(&error)));
                }
            }
        },
    )?;

    debouncer.watch(path, RecursiveMode::Recursive)?;

    Ok((debouncer, rx))
}

/// Relative forms of every path in `events`. Paths outside the document
/// root (possible with some backends' rename events) are dropped.
fn changed_paths(document_root: &Path, events: &[DebouncedEvent]) -> Vec<String> {
    events
        .iter()
        .flat_map(|e| e.paths.iter())
        .filter_map(|p: &PathBuf| confine::to_relative(document_root, p).ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The error kind only; notify's `Display` includes absolute paths.
#[allow(unreachable_patterns)]
fn describe(error: &notify::Error) -> String {
    match &error.kind {
        notify::ErrorKind::Generic(msg) => msg.clone(),
        notify::ErrorKind::Io(err) => err.kind().to_string(),
        notify::ErrorKind::PathNotFound => "path not found".to_string(),
        notify::ErrorKind::WatchNotFound => "watch not found".to_string(),
        notify::ErrorKind::InvalidConfig(_) => "invalid watcher configuration".to_string(),
        notify::ErrorKind::MaxFilesWatch => "too many watched files".to_string(),
        _ => "watcher error".to_string(),
    }
}
