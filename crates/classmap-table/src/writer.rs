//! Class map table serializer.
//!
//! Generated tables are PHP files returning an associative array:
//!
//! ```php
//! <?php
//! /** ...header... */
//!
//! return [
//!     'Vendor\Package\Name' => '/path/to/Name.php',
//! ];
//! ```

use std::fs;
use std::path::Path;

use classmap_core::DeclarationMap;

use crate::error::TableError;

/// Doc-block fields written at the top of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    pub description: String,
    pub package: String,
    pub subpackage: String,
    pub version: String,
    pub author: String,
}

impl Default for TableHeader {
    fn default() -> Self {
        let generator = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));
        Self {
            description: format!(
                "Autoloader classmap file. Contains all available classes/interfaces/traits/enums\n\
                 and related class files.\n\
                 \n\
                 NOTES:\n\
                 - Don't edit this file manually!\n\
                 - It was generated by {generator}\n\
                 - Run the generator again if you want to regenerate this file"
            ),
            package: "classmap".to_string(),
            subpackage: "Classmap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            author: "System".to_string(),
        }
    }
}

/// Renders and writes class map tables.
#[derive(Debug, Clone, Default)]
pub struct TableWriter {
    header: TableHeader,
}

impl TableWriter {
    /// Create a writer with the default header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a custom header.
    pub fn with_header(header: TableHeader) -> Self {
        Self { header }
    }

    /// Render `map` in its iteration order. Sort the map first for
    /// reproducible output.
    pub fn render(&self, map: &DeclarationMap) -> String {
        let mut out = String::from("<?php\n/**\n");
        for line in self.header.description.lines() {
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(&format!(" * {}\n", comment_safe(line)));
            }
        }
        out.push_str(&format!(
            " *\n * @package    {}\n * @subpackage {}\n * @version    {}\n * @author     {}\n */\n\n",
            comment_safe(&self.header.package),
            comment_safe(&self.header.subpackage),
            comment_safe(&self.header.version),
            comment_safe(&self.header.author)
        ));

        out.push_str("return [\n");
        for (name, path) in map {
            out.push_str(&format!(
                "    '{}' => '{}',\n",
                escape_single_quoted(name),
                escape_single_quoted(path)
            ));
        }
        out.push_str("];\n");
        out
    }

    /// Render `map` and write it to `destination`, replacing any existing
    /// content.
    pub fn write(&self, map: &DeclarationMap, destination: &Path) -> Result<(), TableError> {
        fs::write(destination, self.render(map)).map_err(|e| TableError::io(destination, e))?;
        tracing::debug!(
            entries = map.len(),
            path = %destination.display(),
            "wrote class map table"
        );
        Ok(())
    }
}

/// Break up `*/` so header text cannot close the doc block, and keep each
/// field on one line.
fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /").replace(['\r', '\n'], " ")
}

/// Escape `value` for a PHP single-quoted string literal.
pub fn escape_single_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
