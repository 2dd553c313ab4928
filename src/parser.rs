//! Line grammar for `.env` files.
//!
//! Every line is one of: blank, a `#` comment, an assignment
//! (`KEY = value`, `KEY='value'`, `KEY="value"`), or a `source`/`.`
//! directive. Anything else is skipped without an error.

use tracing::debug;

use crate::line_splitter::split_lines;
use crate::ParsedFile;

/// One recognized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `KEY=value`. The value is raw: quotes stripped, escapes and `${...}`
    /// references left as written.
    Assignment { key: &'a str, value: &'a str },

    /// `source FILE` or `. FILE`. Recognized but never executed.
    Directive { keyword: &'a str, argument: &'a str },
}

#[inline]
fn skip_ws(src: &str, index: usize) -> usize {
    let Some(slice) = src.get(index..) else {
        return src.len();
    };
    let Some(pos) = slice.find(|ch: char| !ch.is_whitespace()) else {
        return src.len();
    };
    pos + index
}

#[inline]
fn is_key_char(ch: char) -> bool {
    ch != '#' && ch != '=' && !ch.is_whitespace()
}

#[inline]
fn find_key_end(src: &str, index: usize) -> usize {
    let Some(slice) = src.get(index..) else {
        return src.len();
    };
    let Some(pos) = slice.find(|ch: char| !is_key_char(ch)) else {
        return src.len();
    };
    pos + index
}

#[inline]
fn char_at(src: &str, index: usize) -> Option<char> {
    src.get(index..)?.chars().next()
}

/// Index of the first `#` that isn't preceded by a backslash, or the end of
/// `src`.
fn find_comment(src: &str, index: usize) -> usize {
    let mut iter = src[index..].char_indices();
    while let Some((pos, ch)) = iter.next() {
        match ch {
            '\\' => {
                iter.next();
            }
            '#' => return index + pos,
            _ => {}
        }
    }
    src.len()
}

/// Returns the content between `quote` at `index` and its matching closing
/// quote, or `None` if the literal is never closed on this line.
fn quoted_value(src: &str, index: usize, quote: char) -> Option<&str> {
    let start = index + quote.len_utf8();
    let mut iter = src[start..].char_indices().peekable();

    while let Some((pos, ch)) = iter.next() {
        if ch == quote {
            return Some(&src[start..start + pos]);
        }

        if ch == '\\' && iter.peek().map(|&(_, next)| next) == Some(quote) {
            iter.next();
        }
    }

    None
}

fn parse_value(src: &str, index: usize) -> Option<&str> {
    match char_at(src, index) {
        None | Some('#') => Some(""),
        Some(quote @ ('"' | '\'')) => quoted_value(src, index, quote),
        Some(_) => Some(src[index..find_comment(src, index)].trim_end()),
    }
}

fn parse_directive<'a>(src: &'a str, keyword: &'a str, key_end: usize) -> Option<Line<'a>> {
    if keyword != "." && keyword != "source" {
        return None;
    }

    if !char_at(src, key_end)?.is_whitespace() {
        return None;
    }

    let index = skip_ws(src, key_end);
    let end = src[index..].find('#').map_or(src.len(), |pos| index + pos);
    let argument = src[index..end].trim_end();

    Some(Line::Directive { keyword, argument })
}

/// Parses a single line (without its line terminator).
///
/// Returns `None` for blank lines, comments and lines that match no rule.
pub fn parse_line(line: &str) -> Option<Line<'_>> {
    let index = skip_ws(line, 0);

    let ch = char_at(line, index)?;
    if ch == '#' {
        return None;
    }

    let key_end = find_key_end(line, index);
    if key_end == index {
        return None;
    }
    let key = &line[index..key_end];

    let eq_index = skip_ws(line, key_end);
    if char_at(line, eq_index) != Some('=') {
        return parse_directive(line, key, key_end);
    }

    let value = parse_value(line, skip_ws(line, eq_index + 1))?;

    Some(Line::Assignment { key, value })
}

/// Parses `.env` text into an ordered mapping of raw values.
pub fn parse_str(src: &str) -> ParsedFile {
    let mut parsed = ParsedFile::new();

    for (lineno, line) in split_lines(src) {
        match parse_line(line) {
            Some(Line::Assignment { key, value }) => {
                if parsed.insert(key, value).is_some() {
                    debug!(lineno, key, "key assigned again, later value wins");
                }
            }
            Some(Line::Directive { keyword, argument }) => {
                debug!(lineno, keyword, argument, "directive is not executed");
            }
            None => {
                let trimmed = line.trim_start();
                if !trimmed.is_empty() && !trimmed.starts_with('#') {
                    debug!(lineno, line, "skipping unrecognized line");
                }
            }
        }
    }

    parsed
}

/// Like [`parse_str`], decoding invalid UTF-8 lossily.
#[inline]
pub fn parse_bytes(src: &[u8]) -> ParsedFile {
    parse_str(&String::from_utf8_lossy(src))
}

#[cfg(test)]
mod tests {
    use super::{find_comment, quoted_value};

    #[test]
    fn escaped_hash_is_not_a_comment() {
        let src = r"a\#b # c";
        assert_eq!(find_comment(src, 0), 5);
    }

    #[test]
    fn escaped_quote_stays_inside_literal() {
        let src = r#""a\"b" tail"#;
        assert_eq!(quoted_value(src, 0, '"'), Some(r#"a\"b"#));
    }

    #[test]
    fn other_quote_needs_no_escape() {
        assert_eq!(quoted_value(r#"'say "hi"'"#, 0, '\''), Some(r#"say "hi""#));
    }

    #[test]
    fn unterminated_literal() {
        assert_eq!(quoted_value("\"abc", 0, '"'), None);
    }
}
