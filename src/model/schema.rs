//! Column types and the format-string schema

use serde::Serialize;

use crate::error::{ParseError, Result};

/// Declared type of a column, selected by one format character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    /// `s`: owned text
    Text,
    /// `f`: 32-bit float
    Float32,
    /// `L`: 32-bit signed integer
    Int32,
    /// `d`: 16-bit signed integer
    Int16,
    /// `c`: 8-bit signed integer
    Int8,
    /// `x`: base-16 text stored as a 32-bit signed integer
    HexInt32,
    /// `-`: skipped, no label and no storage
    Unused,
}

impl ColumnType {
    /// Map a format character to its column type
    pub fn from_specifier(specifier: char) -> Option<ColumnType> {
        match specifier {
            's' => Some(ColumnType::Text),
            'f' => Some(ColumnType::Float32),
            'L' => Some(ColumnType::Int32),
            'd' => Some(ColumnType::Int16),
            'c' => Some(ColumnType::Int8),
            'x' => Some(ColumnType::HexInt32),
            '-' => Some(ColumnType::Unused),
            _ => None,
        }
    }

    /// The format character for this type
    pub fn specifier(self) -> char {
        match self {
            ColumnType::Text => 's',
            ColumnType::Float32 => 'f',
            ColumnType::Int32 => 'L',
            ColumnType::Int16 => 'd',
            ColumnType::Int8 => 'c',
            ColumnType::HexInt32 => 'x',
            ColumnType::Unused => '-',
        }
    }

    /// Storage width of one value in bytes
    pub fn width(self) -> usize {
        match self {
            ColumnType::Text => std::mem::size_of::<String>(),
            ColumnType::Float32 => std::mem::size_of::<f32>(),
            ColumnType::Int32 | ColumnType::HexInt32 => std::mem::size_of::<i32>(),
            ColumnType::Int16 => std::mem::size_of::<i16>(),
            ColumnType::Int8 => std::mem::size_of::<i8>(),
            ColumnType::Unused => 0,
        }
    }

    /// Human-readable type name for diagnostics and dumps
    pub fn type_name(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Float32 => "f32",
            ColumnType::Int32 => "i32",
            ColumnType::Int16 => "i16",
            ColumnType::Int8 => "i8",
            ColumnType::HexInt32 => "hex (i32)",
            ColumnType::Unused => "unused",
        }
    }

    pub fn is_unused(self) -> bool {
        self == ColumnType::Unused
    }

    /// Text columns are tokenized with the quote-aware scanner
    pub fn is_text(self) -> bool {
        self == ColumnType::Text
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Ordered column types derived from a format string such as `"sLf-x"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    types: Vec<ColumnType>,
}

impl Schema {
    /// Interpret every character of `format` as a column type.
    ///
    /// Fails on the first character that is not a known specifier.
    pub fn parse(format: &str) -> Result<Schema> {
        let types = format
            .chars()
            .enumerate()
            .map(|(position, specifier)| {
                ColumnType::from_specifier(specifier).ok_or(ParseError::InvalidSchema {
                    specifier,
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema { types })
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn get(&self, index: usize) -> Option<ColumnType> {
        self.types.get(index).copied()
    }

    /// Bytes of storage needed for one row
    pub fn row_width(&self) -> usize {
        self.types.iter().map(|t| t.width()).sum()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for column_type in &self.types {
            write!(f, "{}", column_type.specifier())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_specifiers() {
        let schema = Schema::parse("sfLdcx-").unwrap();
        assert_eq!(
            schema.types(),
            &[
                ColumnType::Text,
                ColumnType::Float32,
                ColumnType::Int32,
                ColumnType::Int16,
                ColumnType::Int8,
                ColumnType::HexInt32,
                ColumnType::Unused,
            ]
        );
        assert_eq!(schema.len(), 7);
        assert_eq!(schema.to_string(), "sfLdcx-");
    }

    #[test]
    fn test_widths() {
        assert_eq!(ColumnType::Float32.width(), 4);
        assert_eq!(ColumnType::Int32.width(), 4);
        assert_eq!(ColumnType::HexInt32.width(), 4);
        assert_eq!(ColumnType::Int16.width(), 2);
        assert_eq!(ColumnType::Int8.width(), 1);
        assert_eq!(ColumnType::Unused.width(), 0);
        assert_eq!(Schema::parse("Ld-").unwrap().row_width(), 6);
    }

    #[test]
    fn test_invalid_specifier() {
        assert_eq!(
            Schema::parse("LLq"),
            Err(ParseError::InvalidSchema {
                specifier: 'q',
                position: 2
            })
        );
        // Specifiers are case-sensitive: 'l' is not 'L'
        assert!(Schema::parse("l").is_err());
    }

    #[test]
    fn test_empty_format() {
        let schema = Schema::parse("").unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ColumnType::HexInt32.to_string(), "hex (i32)");
        assert_eq!(ColumnType::Unused.type_name(), "unused");
    }
}
