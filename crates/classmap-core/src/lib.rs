//! Core types and diagnostics for classmap.
//!
//! This crate provides the data structures shared by the scanner, the
//! table serializer and the runtime loader: scan options, path filters,
//! error types, the debug message sink and the declaration map itself.

mod debug;
mod error;
mod filter;
mod options;
mod path;

pub use debug::DebugLog;
pub use error::{ConfigError, ScanError};
pub use filter::{FileMatcher, FilterDecision, PathFilter};
pub use options::{ScanOptions, ScanOptionsBuilder};
pub use path::{normalize_separators, realpath};

/// Fully-qualified type name mapped to the normalized path of the file
/// declaring it.
///
/// Insertion order is preserved. When the same name is inserted twice the
/// later value replaces the earlier one; callers sort by key before
/// persisting.
pub type DeclarationMap = indexmap::IndexMap<String, String>;
