//! Path helpers.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Render a path as a string using `/` as the only separator.
///
/// Only the platform separator is rewritten; on Unix a backslash is a legal
/// file name character and is left alone.
pub fn normalize_separators(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if MAIN_SEPARATOR == '\\' {
        rendered.replace('\\', "/")
    } else {
        rendered.into_owned()
    }
}

/// Resolve a path to its canonical form, falling back to the path itself.
pub fn realpath(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
