//! Configuration handling for csvcols

use crate::error::{ParseError, Result};

/// Output format for rendering a parsed table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Summary,
}

/// Presentation settings applied by the output formatters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Terminal output prints at most this many rows
    pub max_rows: Option<usize>,
    /// JSON output on a single line
    pub compact: bool,
}

impl OutputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

/// How numeric field text is converted into column values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Parse the longest numeric prefix; text without one becomes zero and
    /// integers wrap to the column width.
    #[default]
    Lenient,
    /// The whole (trimmed) field must be a number that fits the column.
    Strict,
}

/// Options controlling how input text is tokenized and converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat the first physical row as column labels
    pub has_header: bool,
    /// Field delimiter byte
    pub delimiter: u8,
    /// Quote byte
    pub quote: u8,
    /// Numeric conversion policy
    pub coercion: CoercionPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            coercion: CoercionPolicy::default(),
        }
    }
}

impl ParseOptions {
    /// Create options with the defaults (header, comma, double quote, lenient)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the first row is a header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Set the numeric coercion policy
    pub fn with_coercion(mut self, coercion: CoercionPolicy) -> Self {
        self.coercion = coercion;
        self
    }

    /// Shorthand for `with_coercion(CoercionPolicy::Strict)`
    pub fn strict(self) -> Self {
        self.with_coercion(CoercionPolicy::Strict)
    }

    /// Check that the delimiter and quote can be told apart from each other
    /// and from line endings.
    pub fn validate(&self) -> Result<()> {
        for (name, byte) in [("delimiter", self.delimiter), ("quote", self.quote)] {
            if !byte.is_ascii() {
                return Err(ParseError::InvalidOptions(format!(
                    "{} must be an ASCII character, got byte 0x{:02X}",
                    name, byte
                )));
            }
            if byte == b'\r' || byte == b'\n' {
                return Err(ParseError::InvalidOptions(format!(
                    "{} cannot be a line-ending character",
                    name
                )));
            }
        }
        if self.delimiter == self.quote {
            return Err(ParseError::InvalidOptions(format!(
                "delimiter and quote are both '{}'",
                self.delimiter as char
            )));
        }
        Ok(())
    }
}
