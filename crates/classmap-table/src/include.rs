//! Include tracking for the runtime loader.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::{DashMap, DashSet};

/// Loads a resolved source file into the running program.
pub trait Include: Send + Sync {
    /// Include the file at `path`. Called at most once per path by
    /// [`ClassLoader`](crate::ClassLoader).
    fn include(&self, path: &Path) -> io::Result<()>;
}

impl<F> Include for F
where
    F: Fn(&Path) -> io::Result<()> + Send + Sync,
{
    fn include(&self, path: &Path) -> io::Result<()> {
        self(path)
    }
}

/// Default includer: reads each file into memory and keeps its contents.
#[derive(Debug, Default)]
pub struct SourceCache {
    sources: DashMap<PathBuf, Arc<str>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a previously included file.
    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.sources.get(path).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Include for SourceCache {
    fn include(&self, path: &Path) -> io::Result<()> {
        let text = fs::read_to_string(path)?;
        self.sources.insert(path.to_path_buf(), Arc::from(text));
        Ok(())
    }
}

/// Tracks files that have already been included.
///
/// Includes of the same path are serialized: a caller arriving while another
/// include of that path is running waits for it and only then sees the
/// result. An includer must not include its own path recursively.
#[derive(Debug, Default)]
pub struct IncludeTracker {
    done: DashSet<PathBuf>,
    slots: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl IncludeTracker {
    pub fn new() -> Self {
        Self {
            done: DashSet::new(),
            slots: DashMap::new(),
        }
    }

    /// Run `include` for `path` unless it already succeeded. Returns `true`
    /// if this call performed the include. A failed include is not recorded,
    /// so the next caller tries again.
    pub fn include_once<E>(
        &self,
        path: &Path,
        include: impl FnOnce() -> Result<(), E>,
    ) -> Result<bool, E> {
        if self.done.contains(path) {
            return Ok(false);
        }

        let slot = Arc::clone(self.slots.entry(path.to_path_buf()).or_default().value());
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if self.done.contains(path) {
            return Ok(false);
        }
        include()?;
        self.done.insert(path.to_path_buf());
        Ok(true)
    }

    /// Check whether `path` was included successfully.
    pub fn is_included(&self, path: &Path) -> bool {
        self.done.contains(path)
    }

    /// Forget `path` so the next lookup includes it again.
    pub fn forget(&self, path: &Path) -> bool {
        self.done.remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn clear(&self) {
        self.done.clear();
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn ok() -> io::Result<()> {
        Ok(())
    }

    #[test]
    fn test_include_once() {
        let tracker = IncludeTracker::new();
        let path = Path::new("/src/A.php");

        assert!(tracker.include_once(path, ok).unwrap());
        assert!(!tracker.include_once(path, ok).unwrap()); // already included
        assert!(tracker.is_included(path));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_failed_include_is_not_recorded() {
        let tracker = IncludeTracker::new();
        let path = Path::new("/src/A.php");

        let failed = tracker.include_once(path, || Err(io::Error::other("boom")));
        assert!(failed.is_err());
        assert!(!tracker.is_included(path));
        assert!(tracker.include_once(path, ok).unwrap());
    }

    #[test]
    fn test_forget_and_clear() {
        let tracker = IncludeTracker::new();
        tracker.include_once(Path::new("/a"), ok).unwrap();
        tracker.include_once(Path::new("/b"), ok).unwrap();

        assert!(tracker.forget(Path::new("/a")));
        assert!(!tracker.forget(Path::new("/a")));
        assert!(!tracker.is_included(Path::new("/a")));

        tracker.clear();
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_concurrent_include_runs_once() {
        let tracker = IncludeTracker::new();
        let calls = AtomicUsize::new(0);
        let path = Path::new("/src/Shared.php");

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    tracker
                        .include_once(path, || -> io::Result<()> {
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                    // Every caller returns only after the include finished.
                    assert_eq!(calls.load(Ordering::SeqCst), 1);
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_includer() {
        let calls = AtomicUsize::new(0);
        let includer = |_: &Path| -> io::Result<()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        includer.include(Path::new("/x")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_source_cache() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("A.php");
        fs::write(&file, "<?php class A {}").unwrap();

        let cache = SourceCache::new();
        cache.include(&file).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&file).as_deref(), Some("<?php class A {}"));

        assert!(cache.include(&temp.path().join("missing.php")).is_err());
        assert_eq!(cache.len(), 1);
    }
}
