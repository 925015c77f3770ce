//! Path filters compiled from scan options.

use globset::{GlobBuilder, GlobMatcher};

use crate::error::ConfigError;

/// One compiled `exclude_files` entry.
#[derive(Debug, Clone)]
pub enum FileMatcher {
    /// Lower-cased substring searched for in the lower-cased path.
    Literal(String),
    /// `*` wildcard pattern matched against the file name.
    Wildcard { pattern: String, matcher: GlobMatcher },
}

impl FileMatcher {
    /// Compile an entry. Entries containing `*` become wildcard matchers
    /// where `*` matches any run of characters; every other character is
    /// literal.
    pub fn compile(entry: &str) -> Result<Self, ConfigError> {
        if !entry.contains('*') {
            return Ok(Self::Literal(entry.to_lowercase()));
        }

        let escaped = entry
            .split('*')
            .map(globset::escape)
            .collect::<Vec<_>>()
            .join("*");
        let glob = GlobBuilder::new(&escaped)
            .case_insensitive(true)
            .literal_separator(false)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: entry.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self::Wildcard {
            pattern: entry.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// Check a file. `lower_path` must already be normalized and lower-cased.
    pub fn is_match(&self, lower_path: &str, file_name: &str) -> bool {
        match self {
            Self::Literal(needle) => lower_path.contains(needle.as_str()),
            Self::Wildcard { matcher, .. } => matcher.is_match(file_name),
        }
    }
}

/// Outcome of running a file through a [`PathFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Path contains an excluded directory substring.
    ExcludedDir,
    /// File matches an exclude-file entry.
    ExcludedFile,
    /// Extension is not in the allow-list.
    NotParsed,
    /// File should be scanned.
    Parse,
}

/// Directory, file and extension filters, compiled once per walker.
#[derive(Debug, Clone)]
pub struct PathFilter {
    exclude_dirs: Vec<String>,
    exclude_files: Vec<FileMatcher>,
    extensions: Vec<String>,
}

impl PathFilter {
    /// Compile a filter from raw option lists.
    pub fn new(
        exclude_dirs: &[String],
        exclude_files: &[String],
        extensions: &[String],
    ) -> Result<Self, ConfigError> {
        let exclude_files = exclude_files
            .iter()
            .map(|entry| FileMatcher::compile(entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude_dirs: exclude_dirs.iter().map(|d| d.to_lowercase()).collect(),
            exclude_files,
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        })
    }

    /// Classify a file. Checks run in order: directory exclusion, file
    /// exclusion, extension allow-list.
    pub fn classify(&self, normalized_path: &str, file_name: &str) -> FilterDecision {
        let lower_path = normalized_path.to_lowercase();

        if self
            .exclude_dirs
            .iter()
            .any(|dir| lower_path.contains(dir.as_str()))
        {
            return FilterDecision::ExcludedDir;
        }
        if self
            .exclude_files
            .iter()
            .any(|matcher| matcher.is_match(&lower_path, file_name))
        {
            return FilterDecision::ExcludedFile;
        }
        if self
            .extensions
            .iter()
            .any(|ext| lower_path.ends_with(ext.as_str()))
        {
            return FilterDecision::Parse;
        }
        FilterDecision::NotParsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_literal_matcher_is_substring() {
        let matcher = FileMatcher::compile("Temp.php").unwrap();
        assert!(matcher.is_match("/src/temp.php", "temp.php"));
        assert!(matcher.is_match("/src/mytemp.php.bak", "mytemp.php.bak"));
        assert!(!matcher.is_match("/src/other.php", "other.php"));
    }

    #[test]
    fn test_wildcard_matcher_on_file_name() {
        let matcher = FileMatcher::compile("~*.php").unwrap();
        assert!(matcher.is_match("/src/~backup.php", "~backup.php"));
        assert!(matcher.is_match("/src/~b.PHP", "~b.PHP"));
        assert!(!matcher.is_match("/src/backup.php", "backup.php"));
        assert!(!matcher.is_match("/src/~backup.php.orig", "~backup.php.orig"));
    }

    #[test]
    fn test_wildcard_other_metacharacters_are_literal() {
        let matcher = FileMatcher::compile("[a]*.php").unwrap();
        assert!(matcher.is_match("/x/[a]foo.php", "[a]foo.php"));
        assert!(!matcher.is_match("/x/afoo.php", "afoo.php"));
    }

    #[test]
    fn test_classify_order() {
        let filter = PathFilter::new(
            &strings(&["Skip"]),
            &strings(&["B.*"]),
            &strings(&[".SRC"]),
        )
        .unwrap();

        assert_eq!(
            filter.classify("/root/skip/B.src", "B.src"),
            FilterDecision::ExcludedDir
        );
        assert_eq!(
            filter.classify("/root/ns/B.src", "B.src"),
            FilterDecision::ExcludedFile
        );
        assert_eq!(filter.classify("/root/ns/A.src", "A.src"), FilterDecision::Parse);
        assert_eq!(
            filter.classify("/root/ns/A.txt", "A.txt"),
            FilterDecision::NotParsed
        );
    }
}
