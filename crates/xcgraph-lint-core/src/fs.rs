//! File-existence checks used by rules.

use std::path::Path;

/// Answers whether a path exists.
///
/// Rules only ever ask about existence; they never read or write files.
pub trait FileSystem: Send + Sync {
    /// Returns true if `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The real file system.
///
/// Any error while reading metadata, including permission errors, is
/// reported as "does not exist".
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }
}
