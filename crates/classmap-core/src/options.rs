//! Scan option types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::PathFilter;

/// Configuration for tree scans.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanOptions {
    /// Directory name substrings to exclude (case-insensitive).
    #[builder(default = "default_exclude_dirs()")]
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// File names to exclude: a literal substring, or a pattern with `*`
    /// wildcards matched against the file name (case-insensitive).
    #[builder(default = "default_exclude_files()")]
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,

    /// File extensions to parse, e.g. `.php` (case-insensitive).
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Collect debug messages.
    #[builder(default = "false")]
    #[serde(default)]
    pub enable_debug: bool,

    /// Descend into subdirectories.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Follow symbolic links to directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Number of threads for file scanning (0 = rayon default pool).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_exclude_dirs() -> Vec<String> {
    vec![".svn".to_string(), ".cvs".to_string()]
}

fn default_exclude_files() -> Vec<String> {
    vec!["~*.php".to_string(), "~*.inc".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec![".php".to_string(), ".inc".to_string()]
}

fn default_true() -> bool {
    true
}

impl ScanOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref extensions) = self.extensions {
            if extensions.iter().any(|ext| ext.is_empty()) {
                return Err("Extensions cannot be empty strings".to_string());
            }
        }
        if let Some(ref patterns) = self.exclude_files {
            for pattern in patterns {
                crate::filter::FileMatcher::compile(pattern).map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }
}

impl ScanOptions {
    /// Create a new options builder.
    pub fn builder() -> ScanOptionsBuilder {
        ScanOptionsBuilder::default()
    }

    /// Compile the exclusion and extension lists into a reusable filter.
    pub fn compile_filter(&self) -> Result<PathFilter, ConfigError> {
        PathFilter::new(&self.exclude_dirs, &self.exclude_files, &self.extensions)
    }

    /// Append entries to the option lists, keeping the existing ones.
    pub fn extend(
        &mut self,
        exclude_dirs: impl IntoIterator<Item = String>,
        exclude_files: impl IntoIterator<Item = String>,
        extensions: impl IntoIterator<Item = String>,
    ) {
        self.exclude_dirs.extend(exclude_dirs);
        self.exclude_files.extend(exclude_files);
        self.extensions.extend(extensions);
    }
}

impl From<ScanOptionsBuilderError> for ConfigError {
    fn from(err: ScanOptionsBuilderError) -> Self {
        ConfigError::InvalidOptions {
            message: err.to_string(),
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_dirs: default_exclude_dirs(),
            exclude_files: default_exclude_files(),
            extensions: default_extensions(),
            enable_debug: false,
            recursive: true,
            follow_symlinks: false,
            threads: 0,
        }
    }
}
