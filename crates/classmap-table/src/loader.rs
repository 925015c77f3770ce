//! Runtime class loader backed by a generated table.
//!
//! The table is loaded lazily on the first lookup and kept for the lifetime
//! of the loader. A failed load is remembered: every later lookup reports
//! [`LoaderError::Unavailable`] instead of retrying.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use classmap_core::DeclarationMap;

use crate::error::{LoaderError, TableError};
use crate::include::{Include, IncludeTracker, SourceCache};
use crate::parser::parse_table;

/// Environment variable naming the table file.
pub const TABLE_ENV_VAR: &str = "CLASSMAP_FILE";

/// Where the loader finds its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Read the path from the named environment variable.
    Env(String),
    /// Use this path.
    Path(PathBuf),
}

impl TableSource {
    /// The [`TABLE_ENV_VAR`] environment variable.
    pub fn from_env() -> Self {
        Self::Env(TABLE_ENV_VAR.to_string())
    }

    /// Resolve to a table path. Surrounding double quotes in an environment
    /// value are ignored.
    pub fn resolve(&self) -> Result<PathBuf, LoaderError> {
        match self {
            Self::Env(var) => {
                let value = std::env::var_os(var).unwrap_or_default();
                let value = value.to_string_lossy();
                let trimmed = value.trim().trim_matches('"');
                if trimmed.is_empty() {
                    return Err(LoaderError::Unset {
                        origin: format!("environment variable {var} is empty or not set"),
                    });
                }
                Ok(PathBuf::from(trimmed))
            }
            Self::Path(path) if path.as_os_str().is_empty() => Err(LoaderError::Unset {
                origin: "empty path".to_string(),
            }),
            Self::Path(path) => Ok(path.clone()),
        }
    }
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Read and parse the table at `path`. An empty table is an error.
pub fn load_table(path: &Path) -> Result<DeclarationMap, LoaderError> {
    let table_error = |source: TableError| LoaderError::Table {
        path: path.to_path_buf(),
        source,
    };

    let text = fs::read_to_string(path).map_err(|e| table_error(TableError::io(path, e)))?;
    let map = parse_table(&text).map_err(table_error)?;
    if map.is_empty() {
        return Err(LoaderError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), entries = map.len(), "loaded class map table");
    Ok(map)
}

#[derive(Debug)]
enum LoaderState {
    Uninitialized,
    Ready(Arc<DeclarationMap>),
    Failed(String),
}

/// Resolves type names through a class map table and includes the declaring
/// files, each at most once.
#[derive(Debug)]
pub struct ClassLoader<I = SourceCache> {
    source: TableSource,
    state: Mutex<LoaderState>,
    included: IncludeTracker,
    includer: I,
}

impl ClassLoader<SourceCache> {
    /// Loader reading files into a [`SourceCache`].
    pub fn new(source: TableSource) -> Self {
        Self::with_includer(source, SourceCache::new())
    }

    /// Loader whose table path comes from [`TABLE_ENV_VAR`].
    pub fn from_env() -> Self {
        Self::new(TableSource::from_env())
    }
}

impl<I: Include> ClassLoader<I> {
    /// Loader handing resolved files to `includer`.
    pub fn with_includer(source: TableSource, includer: I) -> Self {
        Self {
            source,
            state: Mutex::new(LoaderState::Uninitialized),
            included: IncludeTracker::new(),
            includer,
        }
    }

    /// The loaded table, loading it on first call.
    pub fn table(&self) -> Result<Arc<DeclarationMap>, LoaderError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            LoaderState::Ready(map) => return Ok(Arc::clone(map)),
            LoaderState::Failed(reason) => {
                return Err(LoaderError::Unavailable {
                    reason: reason.clone(),
                });
            }
            LoaderState::Uninitialized => {}
        }

        let loaded = self.source.resolve().and_then(|path| load_table(&path));
        match loaded {
            Ok(map) => {
                let map = Arc::new(map);
                *state = LoaderState::Ready(Arc::clone(&map));
                Ok(map)
            }
            Err(err) => {
                tracing::warn!("class map loader failed: {err}");
                *state = LoaderState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Whether the table has been loaded successfully.
    pub fn is_ready(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, LoaderState::Ready(_))
    }

    /// File declaring `name`, without including it.
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>, LoaderError> {
        Ok(self.table()?.get(name).map(PathBuf::from))
    }

    /// Include the file declaring `name`, unless already included.
    ///
    /// Returns the file's path, or `None` if the table has no entry for
    /// `name`. Concurrent calls for the same file wait for the running
    /// include. A failed include is not tracked, so a later call retries it.
    pub fn load(&self, name: &str) -> Result<Option<PathBuf>, LoaderError> {
        let Some(path) = self.resolve(name)? else {
            return Ok(None);
        };

        let included = self
            .included
            .include_once(&path, || self.includer.include(&path))
            .map_err(|source| LoaderError::Include {
                path: path.clone(),
                source,
            })?;
        if included {
            tracing::debug!(name, path = %path.display(), "included");
        }
        Ok(Some(path))
    }

    /// The includer resolved files are handed to.
    pub fn includer(&self) -> &I {
        &self.includer
    }

    /// Files included so far.
    pub fn included(&self) -> &IncludeTracker {
        &self.included
    }
}
