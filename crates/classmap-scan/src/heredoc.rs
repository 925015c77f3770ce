//! Heredoc and nowdoc handling.
//!
//! Multi-line string bodies are blanked before lexing so keyword-like text
//! inside them (`class Evil {}`) can never be taken for a declaration. The
//! opening and closing markers are kept, the body is replaced by a single
//! placeholder line.

use std::borrow::Cow;
use std::ops::Range;

/// Line that replaces every heredoc/nowdoc body.
pub const PLACEHOLDER: &str = "*replaced heredoc/nowdoc*";

/// Parsed `<<<LABEL` opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    /// Byte range of the label.
    pub label: Range<usize>,
    /// Offset just past the line break ending the opener.
    pub end: usize,
}

/// Location of a closing label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Closing {
    /// Start of the line holding the label (indentation included).
    pub line_start: usize,
    /// Offset just past the label.
    pub end: usize,
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

pub(crate) fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Parse `<<<ID`, `<<<"ID"` or `<<<'ID'` at `start`, followed by a line
/// break.
pub(crate) fn parse_header(bytes: &[u8], start: usize) -> Option<Header> {
    if !bytes.get(start..)?.starts_with(b"<<<") {
        return None;
    }
    let mut pos = start + 3;
    while matches!(bytes.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }

    let quote = match bytes.get(pos) {
        Some(&q @ (b'\'' | b'"')) => {
            pos += 1;
            Some(q)
        }
        _ => None,
    };

    let label_start = pos;
    if !bytes.get(pos).is_some_and(|&b| is_ident_start(b)) {
        return None;
    }
    while bytes.get(pos).is_some_and(|&b| is_ident_continue(b)) {
        pos += 1;
    }
    let label_end = pos;

    if let Some(q) = quote {
        if bytes.get(pos) != Some(&q) {
            return None;
        }
        pos += 1;
    }

    match bytes.get(pos) {
        Some(b'\n') => pos += 1,
        Some(b'\r') if bytes.get(pos + 1) == Some(&b'\n') => pos += 2,
        _ => return None,
    }

    Some(Header {
        label: label_start..label_end,
        end: pos,
    })
}

/// Find the first line at or after `from` that starts (after spaces and
/// tabs) with `label` not followed by an identifier character.
pub(crate) fn find_closing(source: &str, from: usize, label: &str) -> Option<Closing> {
    let bytes = source.as_bytes();
    let mut line_start = from;

    while line_start <= bytes.len() {
        let mut pos = line_start;
        while matches!(bytes.get(pos), Some(b' ' | b'\t')) {
            pos += 1;
        }
        if bytes[pos..].starts_with(label.as_bytes())
            && !bytes
                .get(pos + label.len())
                .is_some_and(|&b| is_ident_continue(b))
        {
            return Some(Closing {
                line_start,
                end: pos + label.len(),
            });
        }

        line_start = line_start + source[line_start..].find('\n')? + 1;
    }
    None
}

/// Replace the body of every heredoc/nowdoc in `source` by [`PLACEHOLDER`].
///
/// Returns the input unchanged (borrowed) when there is nothing to replace.
/// An opener without a closing label is left as is.
pub fn neutralize(source: &str) -> Cow<'_, str> {
    let bytes = source.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut search = 0;

    while let Some(offset) = source[search..].find("<<<") {
        let start = search + offset;
        let Some(header) = parse_header(bytes, start) else {
            search = start + 3;
            continue;
        };
        let label = &source[header.label.clone()];
        let Some(closing) = find_closing(source, header.end, label) else {
            break;
        };

        let buf = out.get_or_insert_with(|| String::with_capacity(source.len()));
        buf.push_str(&source[copied..header.end]);
        buf.push_str(PLACEHOLDER);
        buf.push('\n');
        copied = closing.line_start;
        search = closing.end;
    }

    match out {
        None => Cow::Borrowed(source),
        Some(mut buf) => {
            buf.push_str(&source[copied..]);
            Cow::Owned(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_variants() {
        let plain = parse_header(b"<<<EOT\nbody", 0).unwrap();
        assert_eq!(plain.label, 3..6);
        assert_eq!(plain.end, 7);

        let quoted = parse_header(b"<<<\"EOT\"\r\n", 0).unwrap();
        assert_eq!(quoted.label, 4..7);
        assert_eq!(quoted.end, 10);

        let nowdoc = parse_header(b"x = <<< 'SQL'\n", 4).unwrap();
        assert_eq!(nowdoc.label, 9..12);

        assert!(parse_header(b"<<<'EOT\"\n", 0).is_none());
        assert!(parse_header(b"<<<EOT;", 0).is_none());
        assert!(parse_header(b"<<<1EOT\n", 0).is_none());
    }

    #[test]
    fn test_find_closing_respects_identifier_boundary() {
        let src = "EOTX\n  EOT;\n";
        let closing = find_closing(src, 0, "EOT").unwrap();
        assert_eq!(closing.line_start, 5);
        assert_eq!(closing.end, 10);
        assert!(find_closing("EOTX\n", 0, "EOT").is_none());
    }

    #[test]
    fn test_neutralize_blanks_body() {
        let src = "<?php\n$x = <<<EOT\nclass Evil {}\nEOT;\nclass Good {}\n";
        let out = neutralize(src);
        assert_eq!(
            out,
            "<?php\n$x = <<<EOT\n*replaced heredoc/nowdoc*\nEOT;\nclass Good {}\n"
        );
    }

    #[test]
    fn test_neutralize_indented_closing_and_nowdoc() {
        let src = "f(<<<'SQL'\n    interface Nope\n    SQL, 1);";
        let out = neutralize(src);
        assert_eq!(out, "f(<<<'SQL'\n*replaced heredoc/nowdoc*\n    SQL, 1);");
    }

    #[test]
    fn test_neutralize_multiple_and_empty_body() {
        let src = "<<<A\nA;\n<<<B\ntrait T\nB;\n";
        let out = neutralize(src);
        assert_eq!(
            out,
            "<<<A\n*replaced heredoc/nowdoc*\nA;\n<<<B\n*replaced heredoc/nowdoc*\nB;\n"
        );
    }

    #[test]
    fn test_neutralize_borrows_when_untouched() {
        let src = "<?php $a = $b <<< 2; class A {}";
        assert!(matches!(neutralize(src), Cow::Borrowed(_)));

        let unterminated = "<<<EOT\nclass Evil {}\n";
        assert!(matches!(neutralize(unterminated), Cow::Borrowed(_)));
    }
}
