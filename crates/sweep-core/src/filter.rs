//! Source path selection.
//!
//! Decides, per compilation entry, whether the file belongs to the project's
//! own source tree or to a bundled third-party dependency. The decision is a
//! pure function of the entry and the source root; identical inputs always
//! produce identical decisions so a run's task set is reproducible.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use crate::db::CompileCommand;

/// Paths under `external/` (relative to the source root) are vendored
/// dependencies and are never analyzed.
static EXCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^external/").unwrap());

/// Compute an entry's source path relative to the source root.
///
/// The entry's `file` is joined onto its `directory` and normalized
/// lexically, so build directories referring to sources via `..` resolve to
/// their in-tree location. Paths that do not live under `source_dir` are
/// returned in normalized absolute form instead.
pub fn source_path(source_dir: &Path, entry: &CompileCommand) -> PathBuf {
    let full = normalize_lexically(&Path::new(&entry.directory).join(&entry.file));
    let root = normalize_lexically(source_dir);

    match full.strip_prefix(&root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => full,
    }
}

/// Whether an entry should be dispatched to the analyzer.
pub fn should_analyze(source_dir: &Path, entry: &CompileCommand) -> bool {
    let relative = source_path(source_dir, entry);
    !EXCLUDE_RE.is_match(&relative.to_string_lossy())
}

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// Symlinks are deliberately not resolved: the filter must make the same
/// decision whether or not the paths in the database currently exist.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}
