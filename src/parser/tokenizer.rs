//! Field tokenizer
//!
//! Two scan paths exist:
//!
//! * the **text path** ([`FieldCursor::next_text_field`]) understands quoted
//!   fields: delimiters and line endings inside quotes are data, and a doubled
//!   quote decodes to one literal quote;
//! * the **value path** ([`FieldCursor::next_value_field`]) used for numeric
//!   and unused columns only scans to the next delimiter or line ending and
//!   then strips one pair of enclosing quotes. A quoted numeric field that
//!   contains a delimiter, a line ending or an escaped quote is split or kept
//!   verbatim rather than decoded.
//!
//! After either path the cursor skips exactly one byte (the trailing
//! delimiter, whatever it is) and then any run of `\r`/`\n`. Blank lines are
//! therefore invisible to both passes.

use std::borrow::Cow;

use crate::config::ParseOptions;
use crate::error::{ParseError, Result};

/// Length of an unquoted field starting at `start`: bytes up to (not
/// including) the first CR, LF or `delimiter`, or to the end of input.
pub fn unquoted_len(input: &[u8], start: usize, delimiter: u8) -> usize {
    input[start..]
        .iter()
        .position(|&b| b == b'\r' || b == b'\n' || b == delimiter)
        .unwrap_or(input.len() - start)
}

/// Length of a quoted field whose opening quote is at `start`, including
/// both boundary quotes and every interior byte (escaped quotes count as two).
pub fn quoted_len(input: &[u8], start: usize, quote: u8) -> Result<usize> {
    let mut i = start + 1;
    while i < input.len() {
        if input[i] == quote {
            if input.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return Ok(i + 1 - start);
        }
        i += 1;
    }
    Err(ParseError::TruncatedInput {
        offset: start,
        reason: "quoted field has no closing quote",
    })
}

/// Collapse every doubled quote in the interior of a quoted field.
pub fn unescape_quotes(interior: &str, quote: u8) -> Cow<'_, str> {
    let single = char::from(quote);
    if !interior.contains(single) {
        return Cow::Borrowed(interior);
    }
    let doubled: String = [single, single].iter().collect();
    Cow::Owned(interior.replace(&doubled, single.encode_utf8(&mut [0; 4])))
}

/// Remove at most one leading quote and, only when one was removed, at most
/// one trailing quote.
pub fn strip_enclosing_quotes(text: &str, quote: u8) -> &str {
    let quote = char::from(quote);
    match text.strip_prefix(quote) {
        Some(rest) => rest.strip_suffix(quote).unwrap_or(rest),
        None => text,
    }
}

/// Sequential reader over the fields of a borrowed input.
///
/// Fields are read column by column, row by row; the cursor has no notion of
/// rows itself, callers walk the schema. A row with fewer fields than the
/// schema borrows fields from the next line. At the very end of the input a
/// single field is still readable after the last line ending (it is empty,
/// so `"3\n"` fills a two-column row as `3` and `""`); reading past that is
/// [`ParseError::TruncatedInput`].
///
/// Options must have passed [`ParseOptions::validate`]: every byte the
/// cursor stops on is then ASCII and therefore a char boundary.
#[derive(Debug)]
pub(crate) struct FieldCursor<'a> {
    input: &'a str,
    pos: usize,
    /// The previous field ran into the end of input with no trailing byte
    exhausted: bool,
    delimiter: u8,
    quote: u8,
}

impl<'a> FieldCursor<'a> {
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        Self {
            input,
            pos: 0,
            exhausted: false,
            delimiter: options.delimiter,
            quote: options.quote,
        }
    }

    /// Byte offset of the next field
    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every input byte has been consumed
    pub fn at_end(&self) -> bool {
        self.exhausted || self.pos >= self.input.len()
    }

    /// Read the next field with the quote-aware text path and decode it
    pub fn next_text_field(&mut self) -> Result<Cow<'a, str>> {
        let start = self.begin_field()?;
        let input = self.input;
        let bytes = input.as_bytes();
        let (text, consumed) = if bytes.get(start) == Some(&self.quote) {
            let consumed = quoted_len(bytes, start, self.quote)?;
            let interior = &input[start + 1..start + consumed - 1];
            (unescape_quotes(interior, self.quote), consumed)
        } else {
            let consumed = unquoted_len(bytes, start, self.delimiter);
            (Cow::Borrowed(&input[start..start + consumed]), consumed)
        };
        self.finish_field(start + consumed);
        Ok(text)
    }

    /// Advance over the next field exactly as [`Self::next_text_field`]
    /// would, without decoding it
    pub fn skip_text_field(&mut self) -> Result<()> {
        let start = self.begin_field()?;
        let bytes = self.input.as_bytes();
        let consumed = if bytes.get(start) == Some(&self.quote) {
            quoted_len(bytes, start, self.quote)?
        } else {
            unquoted_len(bytes, start, self.delimiter)
        };
        self.finish_field(start + consumed);
        Ok(())
    }

    /// Read the next field with the delimiter-only value path
    pub fn next_value_field(&mut self) -> Result<&'a str> {
        let start = self.begin_field()?;
        let consumed = unquoted_len(self.input.as_bytes(), start, self.delimiter);
        let input = self.input;
        let raw = &input[start..start + consumed];
        self.finish_field(start + consumed);
        Ok(strip_enclosing_quotes(raw, self.quote))
    }

    /// Advance over the next field exactly as [`Self::next_value_field`] would
    pub fn skip_value_field(&mut self) -> Result<()> {
        let start = self.begin_field()?;
        let consumed = unquoted_len(self.input.as_bytes(), start, self.delimiter);
        self.finish_field(start + consumed);
        Ok(())
    }

    fn begin_field(&self) -> Result<usize> {
        if self.exhausted {
            return Err(ParseError::TruncatedInput {
                offset: self.input.len(),
                reason: "input ended in the middle of a row",
            });
        }
        Ok(self.pos)
    }

    fn finish_field(&mut self, end: usize) {
        let bytes = self.input.as_bytes();
        if end >= bytes.len() {
            self.pos = bytes.len();
            self.exhausted = true;
            return;
        }
        // one trailing delimiter, then any run of line endings. The byte
        // after a closing quote may start a multi-byte character; skip all of it
        // so the cursor stays on a char boundary.
        let skipped = self.input[end..].chars().next().map_or(1, char::len_utf8);
        let mut pos = end + skipped;
        while pos < bytes.len() && (bytes[pos] == b'\r' || bytes[pos] == b'\n') {
            pos += 1;
        }
        self.pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(input: &str) -> FieldCursor<'_> {
        FieldCursor::new(input, &ParseOptions::default())
    }

    #[test]
    fn test_unquoted_fields() {
        let mut c = cursor("ab,cd\nef");
        assert_eq!(c.next_text_field().unwrap(), "ab");
        assert_eq!(c.next_text_field().unwrap(), "cd");
        assert_eq!(c.position(), 6);
        assert_eq!(c.next_text_field().unwrap(), "ef");
        assert!(c.at_end());
    }

    #[test]
    fn test_quoted_field_with_escapes() {
        let mut c = cursor("\"he said \"\"hi\"\"\",x\n");
        assert_eq!(c.next_text_field().unwrap(), "he said \"hi\"");
        assert_eq!(c.next_text_field().unwrap(), "x");
        assert!(c.at_end());
    }

    #[test]
    fn test_multibyte_character_after_closing_quote() {
        // the character after the closing quote stands in for the delimiter
        let mut c = cursor("\"a\"\u{e9},1\n");
        assert_eq!(c.next_text_field().unwrap(), "a");
        assert_eq!(c.position(), 5);
        assert_eq!(c.next_value_field().unwrap(), "");
        assert_eq!(c.next_text_field().unwrap(), "1");
        assert!(c.at_end());
    }

    #[test]
    fn test_quoted_len_counts_boundaries_and_escapes() {
        // "a""b" -> 2 boundary quotes + 4 interior bytes
        assert_eq!(quoted_len(b"\"a\"\"b\",", 0, b'"').unwrap(), 6);
        assert_eq!(quoted_len(b"\"\"", 0, b'"').unwrap(), 2);
    }

    #[test]
    fn test_quoted_field_keeps_delimiters_and_newlines() {
        let mut c = cursor("\"a,b\nc\",d");
        assert_eq!(c.next_text_field().unwrap(), "a,b\nc");
        assert_eq!(c.next_text_field().unwrap(), "d");
    }

    #[test]
    fn test_unterminated_quote() {
        let mut c = cursor("\"abc");
        assert_eq!(
            c.next_text_field(),
            Err(ParseError::TruncatedInput {
                offset: 0,
                reason: "quoted field has no closing quote"
            })
        );
    }

    #[test]
    fn test_value_path_strips_enclosing_quotes() {
        let mut c = cursor("\"1\",\"2.5\",3\n");
        assert_eq!(c.next_value_field().unwrap(), "1");
        assert_eq!(c.next_value_field().unwrap(), "2.5");
        assert_eq!(c.next_value_field().unwrap(), "3");
    }

    #[test]
    fn test_value_path_stops_at_delimiter_inside_quotes() {
        let mut c = cursor("\"1,5\"\n");
        assert_eq!(c.next_value_field().unwrap(), "1");
        assert_eq!(c.next_value_field().unwrap(), "5\"");
    }

    #[test]
    fn test_strip_enclosing_quotes() {
        assert_eq!(strip_enclosing_quotes("\"7\"", b'"'), "7");
        assert_eq!(strip_enclosing_quotes("\"7", b'"'), "7");
        assert_eq!(strip_enclosing_quotes("7\"", b'"'), "7\"");
        assert_eq!(strip_enclosing_quotes("\"", b'"'), "");
        assert_eq!(strip_enclosing_quotes("'9'", b'\''), "9");
    }

    #[test]
    fn test_line_endings_and_blank_lines_are_skipped() {
        let mut c = cursor("a\r\n\r\n\nb\r\n");
        assert_eq!(c.next_text_field().unwrap(), "a");
        assert_eq!(c.next_text_field().unwrap(), "b");
        assert!(c.at_end());
    }

    #[test]
    fn test_reading_past_end_is_truncation() {
        let mut c = cursor("1");
        c.skip_value_field().unwrap();
        assert!(matches!(
            c.skip_value_field(),
            Err(ParseError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        let mut c = cursor("1,");
        assert_eq!(c.next_value_field().unwrap(), "1");
        assert_eq!(c.position(), 2);
        assert_eq!(c.next_value_field().unwrap(), "");
        assert!(c.at_end());
    }

    #[test]
    fn test_custom_delimiter_and_quote() {
        let options = ParseOptions::new().with_delimiter(b';').with_quote(b'\'');
        let mut c = FieldCursor::new("'x;y''z';2", &options);
        assert_eq!(c.next_text_field().unwrap(), "x;y'z");
        assert_eq!(c.next_value_field().unwrap(), "2");
    }

    #[test]
    fn test_skip_matches_read() {
        let input = "\"q,\"\"x\"\"\",7\n8,9\n";
        let mut read = cursor(input);
        let mut skip = cursor(input);
        while !read.at_end() {
            read.next_text_field().unwrap();
            skip.skip_text_field().unwrap();
            assert_eq!(read.position(), skip.position());
        }
        assert!(skip.at_end());
    }
}
