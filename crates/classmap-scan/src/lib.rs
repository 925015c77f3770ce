//! Type declaration scanning for classmap.
//!
//! This crate finds PHP type declarations (classes, interfaces, traits and
//! enums) by walking each file's token stream, and walks directory trees to
//! build a name-to-file map.
//!
//! # Overview
//!
//! - **Lexer** turns source text into [`Token`]s, blanking heredoc/nowdoc
//!   bodies first so their contents never look like code
//! - **[`DeclarationScanner`]** records `namespace + name` for every named
//!   declaration in one file, skipping anonymous classes
//! - **[`TreeWalker`]** traverses a directory with the configured
//!   exclusions and merges per-file results (later files win)
//!
//! # Example
//!
//! ```rust,no_run
//! use classmap_scan::{ScanOptions, TreeWalker};
//!
//! let options = ScanOptions::builder()
//!     .exclude_dirs(vec!["tests".to_string()])
//!     .build()
//!     .unwrap();
//! let walker = TreeWalker::new(options).unwrap();
//!
//! let mut found = walker.scan_directory("/path/to/src".as_ref());
//! found.sort_keys();
//! for (name, path) in &found {
//!     println!("{name} => {path}");
//! }
//! ```

mod cursor;
mod declarations;
mod heredoc;
mod lexer;
mod token;
mod walker;

pub use cursor::TokenCursor;
pub use declarations::{
    DeclarationScanner, SourceText, anonymous_class_after, declarations_in, declared_name,
    namespace_at,
};
pub use heredoc::{PLACEHOLDER as HEREDOC_PLACEHOLDER, neutralize as neutralize_heredocs};
pub use lexer::{Lexer, tokenize};
pub use token::{Token, TokenKind};
pub use walker::TreeWalker;

// Re-export core types for convenience
pub use classmap_core::{
    ConfigError, DebugLog, DeclarationMap, FilterDecision, ScanError, ScanOptions,
    ScanOptionsBuilder,
};
