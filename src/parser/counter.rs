//! Row counting pre-scan

use tracing::debug;

use crate::config::ParseOptions;
use crate::error::{ParseError, Result};
use crate::model::Schema;

use super::tokenizer::FieldCursor;

/// Count the data rows in `input` without converting or storing anything.
///
/// Text columns, and every column of the header row, are walked with the
/// quote-aware text path; all other columns with the value path. The fill
/// pass must walk the input the same way or the counts diverge.
pub fn count_rows(input: &str, schema: &Schema, options: &ParseOptions) -> Result<usize> {
    options.validate()?;
    if schema.is_empty() {
        return Ok(0);
    }

    let mut cursor = FieldCursor::new(input, options);
    let mut rows = 0usize;
    while !cursor.at_end() {
        let header_row = options.has_header && rows == 0;
        for column_type in schema.types() {
            if header_row || column_type.is_text() {
                cursor.skip_text_field()?;
            } else {
                cursor.skip_value_field()?;
            }
        }
        rows += 1;
    }

    let data_rows = if options.has_header {
        rows.checked_sub(1).ok_or(ParseError::TruncatedInput {
            offset: 0,
            reason: "header row expected but input is empty",
        })?
    } else {
        rows
    };
    debug!(physical_rows = rows, data_rows, "pre-scan complete");
    Ok(data_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(input: &str, format: &str, has_header: bool) -> Result<usize> {
        let schema = Schema::parse(format).unwrap();
        count_rows(input, &schema, &ParseOptions::new().with_header(has_header))
    }

    #[test]
    fn test_header_is_excluded() {
        assert_eq!(count("a,b\n1,2\n3,4\n", "LL", true).unwrap(), 2);
        assert_eq!(count("a,b\n1,2\n3,4\n", "LL", false).unwrap(), 3);
    }

    #[test]
    fn test_missing_final_newline() {
        assert_eq!(count("a,b\n1,2\n3,4", "LL", true).unwrap(), 2);
    }

    #[test]
    fn test_blank_lines_and_crlf_are_invisible() {
        assert_eq!(count("a\r\n1\r\n\r\n\r\n2\r\n\n", "L", true).unwrap(), 2);
    }

    #[test]
    fn test_quoted_newlines_in_text_columns() {
        let input = "name,n\n\"multi\nline\",1\n\"x\",2\n";
        assert_eq!(count(input, "sL", true).unwrap(), 2);
    }

    #[test]
    fn test_header_uses_text_path() {
        // the quoted header label contains a delimiter
        assert_eq!(count("\"a,b\",c\n1,2\n", "LL", true).unwrap(), 1);
    }

    #[test]
    fn test_header_only_and_empty() {
        assert_eq!(count("a,b\n", "LL", true).unwrap(), 0);
        assert_eq!(count("", "LL", false).unwrap(), 0);
        assert!(matches!(
            count("", "LL", true),
            Err(ParseError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_row_cut_short_by_end_of_input() {
        assert!(matches!(
            count("a,b,c\n1,2,3\n4", "LLL", true),
            Err(ParseError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_unvalidated_options_are_rejected() {
        let schema = Schema::parse("LL").unwrap();
        let options = ParseOptions::new().with_delimiter(0xE9);
        assert!(matches!(
            count_rows("1\u{e9}2\n", &schema, &options),
            Err(ParseError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_empty_schema() {
        assert_eq!(count("a,b\n1,2\n", "", true).unwrap(), 0);
    }
}
