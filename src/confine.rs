//! Translation between root-relative paths and filesystem paths.
//!
//! Only root-relative paths cross the library boundary. They always use `/`
//! as separator, never start with a separator and never contain `.` or `..`
//! segments once normalized.

use crate::error::{FolderViewError, Result};
use std::path::{Component, Path, PathBuf};

/// Separator used in every root-relative path.
pub const SEPARATOR: char = '/';

/// Normalize a caller-supplied root-relative path.
///
/// Empty and `.` segments are dropped. Absolute paths and `..` segments are
/// rejected before anything touches the filesystem.
pub fn normalize_relative(relative: &str) -> Result<String> {
    if relative.starts_with(SEPARATOR) || Path::new(relative).has_root() {
        return Err(FolderViewError::invalid(relative, "absolute paths are not accepted"));
    }

    let mut segments = Vec::new();
    for segment in relative.split(SEPARATOR) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        // Catches `..` and, on Windows, drive prefixes or `\` separated climbs.
        for component in Path::new(segment).components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(FolderViewError::invalid(
                        relative,
                        "parent directory segments are not accepted",
                    ))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(FolderViewError::invalid(
                        relative,
                        "absolute paths are not accepted",
                    ))
                }
            }
        }
        segments.push(segment);
    }
    Ok(segments.join("/"))
}

/// Join the document root with a root-relative path.
pub fn to_absolute(document_root: &Path, relative: &str) -> Result<PathBuf> {
    let normalized = normalize_relative(relative)?;
    let mut path = document_root.to_path_buf();
    for segment in normalized.split(SEPARATOR).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    Ok(path)
}

/// Strip the document root from a filesystem path.
///
/// A path that does not live under `document_root` is an error rather than
/// being passed through.
pub fn to_relative(document_root: &Path, absolute: &Path) -> Result<String> {
    let rest = absolute.strip_prefix(document_root).map_err(|_| {
        FolderViewError::invalid(
            absolute.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            "outside the document root",
        )
    })?;

    let mut segments = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(FolderViewError::invalid(
                    rest.to_string_lossy(),
                    "not a plain root-relative path",
                ))
            }
        }
    }
    Ok(segments.join("/"))
}

/// Resolve `relative` under `document_root` and prove it stays there after
/// symlinks are followed.
///
/// `document_root` must already be canonical. Returns the joined (not the
/// canonicalized) path so that relative paths derived from it keep the
/// caller's spelling.
pub fn resolve_within(document_root: &Path, relative: &str) -> Result<PathBuf> {
    let path = to_absolute(document_root, relative)?;
    let canonical = path
        .canonicalize()
        .map_err(|source| FolderViewError::RootUnreadable {
            path: relative.to_string(),
            source,
        })?;
    if !canonical.starts_with(document_root) {
        return Err(FolderViewError::invalid(
            relative,
            "resolves outside the document root",
        ));
    }
    Ok(path)
}

/// Canonicalize the configured document root.
pub fn canonical_document_root(document_root: &Path) -> Result<PathBuf> {
    document_root
        .canonicalize()
        .map_err(|source| FolderViewError::DocumentRoot {
            path: document_root.to_path_buf(),
            source,
        })
}
