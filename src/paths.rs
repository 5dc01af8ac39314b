//! Keeps input and output paths inside a base directory.

use crate::error::{EngineError, Result};
use std::path::{Component, Path, PathBuf};

/// Resolves `path` against `base` and rejects it if it lands outside `base`.
///
/// Resolution is lexical (`.` and `..` are folded without touching the
/// filesystem), so it also works for output files that do not exist yet.
pub fn confine(base: &Path, path: &Path) -> Result<PathBuf> {
    let base = normalize(base);
    let resolved = normalize(&base.join(path));

    if resolved.starts_with(&base) {
        Ok(resolved)
    } else {
        Err(EngineError::PathOutsideWorkingDir { path: resolved })
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
