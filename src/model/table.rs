//! Columnar table storage and typed read accessors

use std::borrow::Cow;

use serde::Serialize;

use super::schema::{ColumnType, Schema};

/// Storage for one column, tagged by element type.
///
/// `HexInt32` columns are stored as `Int32`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValues {
    Text(Vec<String>),
    Float32(Vec<f32>),
    Int32(Vec<i32>),
    Int16(Vec<i16>),
    Int8(Vec<i8>),
}

impl ColumnValues {
    /// Empty storage for `column_type` with room for exactly `rows` values.
    /// Returns `None` for unused columns.
    pub fn with_capacity(column_type: ColumnType, rows: usize) -> Option<Self> {
        let values = match column_type {
            ColumnType::Text => ColumnValues::Text(Vec::with_capacity(rows)),
            ColumnType::Float32 => ColumnValues::Float32(Vec::with_capacity(rows)),
            ColumnType::Int32 | ColumnType::HexInt32 => {
                ColumnValues::Int32(Vec::with_capacity(rows))
            }
            ColumnType::Int16 => ColumnValues::Int16(Vec::with_capacity(rows)),
            ColumnType::Int8 => ColumnValues::Int8(Vec::with_capacity(rows)),
            ColumnType::Unused => return None,
        };
        Some(values)
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Float32(v) => v.len(),
            ColumnValues::Int32(v) => v.len(),
            ColumnValues::Int16(v) => v.len(),
            ColumnValues::Int8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Element types that can be borrowed out of a column as a typed slice
pub trait ColumnElement: Sized {
    fn slice(values: &ColumnValues) -> Option<&[Self]>;
}

impl ColumnElement for String {
    fn slice(values: &ColumnValues) -> Option<&[Self]> {
        match values {
            ColumnValues::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl ColumnElement for f32 {
    fn slice(values: &ColumnValues) -> Option<&[Self]> {
        match values {
            ColumnValues::Float32(v) => Some(v),
            _ => None,
        }
    }
}

impl ColumnElement for i32 {
    fn slice(values: &ColumnValues) -> Option<&[Self]> {
        match values {
            ColumnValues::Int32(v) => Some(v),
            _ => None,
        }
    }
}

impl ColumnElement for i16 {
    fn slice(values: &ColumnValues) -> Option<&[Self]> {
        match values {
            ColumnValues::Int16(v) => Some(v),
            _ => None,
        }
    }
}

impl ColumnElement for i8 {
    fn slice(values: &ColumnValues) -> Option<&[Self]> {
        match values {
            ColumnValues::Int8(v) => Some(v),
            _ => None,
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header label; `None` without a header or for unused columns
    pub label: Option<String>,
    /// Declared type
    pub column_type: ColumnType,
    /// Values, exactly `row_count` long; `None` for unused columns
    pub values: Option<ColumnValues>,
}

/// A single cell borrowed from a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Float32(f32),
    Int32(i32),
    Int16(i16),
    Int8(i8),
    Hex(i32),
}

impl CellValue<'_> {
    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(*s),
            CellValue::Float32(v) => Cow::Owned(v.to_string()),
            CellValue::Int32(v) => Cow::Owned(v.to_string()),
            CellValue::Int16(v) => Cow::Owned(v.to_string()),
            CellValue::Int8(v) => Cow::Owned(v.to_string()),
            CellValue::Hex(v) => Cow::Owned(format!("{:X}", v)),
        }
    }
}

impl std::fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Typed, read-only handle to a stored column
#[derive(Debug, Clone, Copy)]
pub struct ColumnRef<'a> {
    index: usize,
    label: Option<&'a str>,
    column_type: ColumnType,
    values: &'a ColumnValues,
}

impl<'a> ColumnRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> Option<&'a str> {
        self.label
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn values(&self) -> &'a ColumnValues {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the values as `T`, or `None` if the column stores another type
    pub fn values_as<T: ColumnElement>(&self) -> Option<&'a [T]> {
        T::slice(self.values)
    }

    pub fn as_text(&self) -> Option<&'a [String]> {
        self.values_as()
    }

    pub fn as_f32(&self) -> Option<&'a [f32]> {
        self.values_as()
    }

    /// Also used for hex columns
    pub fn as_i32(&self) -> Option<&'a [i32]> {
        self.values_as()
    }

    pub fn as_i16(&self) -> Option<&'a [i16]> {
        self.values_as()
    }

    pub fn as_i8(&self) -> Option<&'a [i8]> {
        self.values_as()
    }

    /// Value at `row`
    pub fn cell(&self, row: usize) -> Option<CellValue<'a>> {
        let cell = match self.values {
            ColumnValues::Text(v) => CellValue::Text(v.get(row)?.as_str()),
            ColumnValues::Float32(v) => CellValue::Float32(*v.get(row)?),
            ColumnValues::Int32(v) if self.column_type == ColumnType::HexInt32 => {
                CellValue::Hex(*v.get(row)?)
            }
            ColumnValues::Int32(v) => CellValue::Int32(*v.get(row)?),
            ColumnValues::Int16(v) => CellValue::Int16(*v.get(row)?),
            ColumnValues::Int8(v) => CellValue::Int8(*v.get(row)?),
        };
        Some(cell)
    }
}

/// Serializable overview of a table's shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub type_name: &'static str,
}

/// An immutable columnar table.
///
/// Built in one step by [`crate::parser::TableParser`]; afterwards the row
/// count, column count and column types never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
    coerced_cells: usize,
}

impl Table {
    pub(crate) fn from_parts(
        schema: Schema,
        columns: Vec<Column>,
        row_count: usize,
        coerced_cells: usize,
    ) -> Self {
        debug_assert_eq!(schema.len(), columns.len());
        Self {
            schema,
            columns,
            row_count,
            coerced_cells,
        }
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns, equal to the format string length
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Numeric cells whose text was not a clean number and fell back to the
    /// lenient conversion. Always zero in strict mode.
    pub fn coerced_cells(&self) -> usize {
        self.coerced_cells
    }

    /// Look up a column by label.
    ///
    /// Labels are not required to be unique; the first exact, case-sensitive
    /// match wins.
    pub fn column(&self, label: &str) -> Option<ColumnRef<'_>> {
        let index = self
            .columns
            .iter()
            .position(|c| c.label.as_deref() == Some(label))?;
        self.column_at(index)
    }

    /// Look up a column by position. Out-of-range and unused columns yield `None`.
    pub fn column_at(&self, index: usize) -> Option<ColumnRef<'_>> {
        let column = self.columns.get(index)?;
        let values = column.values.as_ref()?;
        Some(ColumnRef {
            index,
            label: column.label.as_deref(),
            column_type: column.column_type,
            values,
        })
    }

    /// Label of the column at `index`, if it has one
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index)?.label.as_deref()
    }

    /// Every column position with its handle (`None` for unused columns)
    pub fn columns(&self) -> impl Iterator<Item = (usize, Option<ColumnRef<'_>>)> + '_ {
        (0..self.columns.len()).map(move |i| (i, self.column_at(i)))
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            row_count: self.row_count,
            column_count: self.column_count(),
            columns: self
                .columns
                .iter()
                .map(|c| ColumnSummary {
                    label: c.label.clone(),
                    type_name: c.column_type.type_name(),
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Table:")?;
        writeln!(f, "  header fields:")?;
        for column in &self.columns {
            writeln!(
                f,
                "    {} ({})",
                column.label.as_deref().unwrap_or("-"),
                column.column_type
            )?;
        }
        write!(f, "  rows number = {}", self.row_count)
    }
}
