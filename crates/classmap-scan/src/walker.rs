//! Directory traversal and per-file scanning.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;

use classmap_core::{
    ConfigError, DebugLog, DeclarationMap, FilterDecision, PathFilter, ScanOptions,
    normalize_separators, realpath,
};

use crate::declarations::DeclarationScanner;

/// Walks directory trees and merges the declarations of every accepted file.
///
/// Files are visited in sorted order. When two files declare the same name,
/// the file visited later wins.
pub struct TreeWalker {
    options: ScanOptions,
    filter: PathFilter,
    scanner: DeclarationScanner,
}

impl TreeWalker {
    /// Create a walker with its own debug log (enabled per `options`).
    pub fn new(options: ScanOptions) -> Result<Self, ConfigError> {
        let log = Arc::new(DebugLog::new(options.enable_debug));
        Self::with_log(options, log)
    }

    /// Create a walker reporting to a caller-owned debug log.
    pub fn with_log(options: ScanOptions, log: Arc<DebugLog>) -> Result<Self, ConfigError> {
        let filter = options.compile_filter()?;
        Ok(Self {
            options,
            filter,
            scanner: DeclarationScanner::new(log),
        })
    }

    /// Options this walker was built with.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// The debug log shared by the walker and its scanner.
    pub fn debug_log(&self) -> &Arc<DebugLog> {
        self.scanner.debug_log()
    }

    fn log(&self, message: String) {
        self.scanner.debug_log().push(message);
    }

    /// Declarations in a single file. Unreadable files are logged and yield
    /// an empty map.
    pub fn scan_file(&self, path: &Path) -> DeclarationMap {
        match self.scanner.extract_declarations(path) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(path = %path.display(), "skipping file: {err}");
                self.log(err.to_string());
                DeclarationMap::new()
            }
        }
    }

    /// Declarations in all accepted files under `root`.
    ///
    /// Returns an empty map if nothing was found or `root` is not a readable
    /// directory.
    pub fn scan_directory(&self, root: &Path) -> DeclarationMap {
        let root_path = match root.canonicalize() {
            Ok(path) if path.is_dir() && fs::read_dir(&path).is_ok() => path,
            _ => {
                self.log(format!(
                    "scan_directory: Invalid/Not readable directory {}",
                    root.display()
                ));
                return DeclarationMap::new();
            }
        };
        self.log(format!(
            "scan_directory: Processing dir {} (realpath: {})",
            root.display(),
            root_path.display()
        ));

        let candidates = self.collect_candidates(&root_path);
        let per_file = self.scan_all(&candidates);

        let mut merged = DeclarationMap::new();
        for found in per_file {
            merged.extend(found);
        }
        merged
    }

    /// Scan several roots in order and merge the results.
    pub fn scan_roots<P: AsRef<Path>>(&self, roots: &[P]) -> DeclarationMap {
        let mut merged = DeclarationMap::new();
        for root in roots {
            merged.extend(self.scan_directory(root.as_ref()));
        }
        merged
    }

    /// Collect files under `root` that pass the filters, in sorted order.
    fn collect_candidates(&self, root: &Path) -> Vec<PathBuf> {
        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(self.options.follow_symlinks)
            .min_depth(1)
            .max_depth(max_depth);

        let mut candidates = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    self.log(format!("scan_directory: Walk error {err}"));
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();
            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
            if !is_file {
                continue;
            }

            if self.is_file_to_process(&path) {
                candidates.push(path);
            }
        }
        candidates
    }

    /// Run the directory, file and extension filters over `path`.
    fn is_file_to_process(&self, path: &Path) -> bool {
        let real = realpath(path);
        let normalized = normalize_separators(&real);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let decision = self.filter.classify(&normalized, &file_name);
        let reason = match decision {
            FilterDecision::Parse => "File to parse",
            FilterDecision::ExcludedDir => "Dir to exclude",
            FilterDecision::ExcludedFile => "File to exclude",
            FilterDecision::NotParsed => return false,
        };
        self.log(format!(
            "is_file_to_process: {reason} {} (realpath: {})",
            path.display(),
            real.display()
        ));
        decision == FilterDecision::Parse
    }

    /// Scan candidates, preserving their order in the result.
    fn scan_all(&self, candidates: &[PathBuf]) -> Vec<DeclarationMap> {
        let scan = || -> Vec<DeclarationMap> {
            candidates
                .par_iter()
                .map(|path| self.scan_file(path))
                .collect()
        };

        match self.options.threads {
            0 => scan(),
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(scan),
                Err(err) => {
                    tracing::warn!("falling back to the global thread pool: {err}");
                    scan()
                }
            },
        }
    }
}
