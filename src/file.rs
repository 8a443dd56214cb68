//! Manifest discovery.
//!
//! Each [`SearchPath`] is expanded to one or more concrete directories in
//! priority-ascending order (last = highest). `Ancestors(boundary)` walks from
//! the working directory toward the root and is emitted **shallowest first**,
//! so the working directory itself wins.
//!
//! Only the single highest-priority manifest is used: the directory list is
//! searched from the end and the first `{dir}/{file_name}` that exists is
//! returned. Missing files are skipped; other I/O errors are propagated.

use std::path::{Path, PathBuf};

use crate::error::OrchestratorError;
use crate::types::{Boundary, SearchPath};

/// Expand an [`Ancestors`](SearchPath::Ancestors) walk starting at `start`.
///
/// Directories are collected from `start` upward and returned root-end first.
/// A [`Marker`](Boundary::Marker) boundary stops (inclusive) at the first
/// directory containing the marker and falls back to the root if none does.
pub fn expand_ancestors_from(start: &Path, boundary: &Boundary) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let mut current = start;

    loop {
        dirs.push(current.to_path_buf());

        if let Boundary::Marker(name) = boundary
            && current.join(name).exists()
        {
            break;
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    dirs.reverse();
    dirs
}

/// Expand all search paths into a flat, priority-ascending directory list.
///
/// `cwd` anchors both [`Cwd`](SearchPath::Cwd) and
/// [`Ancestors`](SearchPath::Ancestors); it is `None` when the working
/// directory cannot be determined, in which case those entries expand to nothing.
pub fn expand_search_paths(search_paths: &[SearchPath], cwd: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for sp in search_paths {
        match sp {
            SearchPath::Path(p) => dirs.push(p.clone()),
            SearchPath::Cwd => dirs.extend(cwd.map(Path::to_path_buf)),
            SearchPath::Ancestors(boundary) => {
                if let Some(start) = cwd {
                    dirs.extend(expand_ancestors_from(start, boundary));
                }
            }
        }
    }
    dirs
}

/// Find and read the highest-priority `file_name` across `dirs`.
pub fn load_nearest(
    dirs: &[PathBuf],
    file_name: &str,
) -> Result<Option<(PathBuf, String)>, OrchestratorError> {
    for dir in dirs.iter().rev() {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => return Ok(Some((file_path, content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(OrchestratorError::IoError {
                    path: file_path,
                    source: e,
                });
            }
        }
    }
    Ok(None)
}
