//! Class map tables for classmap.
//!
//! A table is a generated PHP file returning an array of
//! `'Fully\Qualified\Name' => '/path/to/File.php'` pairs. This crate writes
//! tables ([`TableWriter`]), reads them back ([`parse_table`]) and resolves
//! names through them at runtime ([`ClassLoader`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use classmap_table::{ClassLoader, TableSource};
//!
//! let loader = ClassLoader::new(TableSource::Path(PathBuf::from("classmap.php")));
//! if let Some(path) = loader.load("App\\Model\\User")? {
//!     println!("included {}", path.display());
//! }
//! # Ok::<(), classmap_table::LoaderError>(())
//! ```

mod error;
mod include;
mod loader;
mod parser;
mod writer;

pub use error::{LoaderError, TableError};
pub use include::{Include, IncludeTracker, SourceCache};
pub use loader::{ClassLoader, TABLE_ENV_VAR, TableSource, load_table};
pub use parser::{parse_table, unquote_single};
pub use writer::{TableHeader, TableWriter, escape_single_quoted};
