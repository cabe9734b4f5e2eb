//! Parser layer: tokenizer, row counter and the two-pass table builder

mod coerce;
mod counter;
mod fill;
mod tokenizer;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::model::{Schema, Table};

pub use self::counter::count_rows;

/// Builds tables for one schema and set of options
#[derive(Debug, Clone)]
pub struct TableParser {
    schema: Schema,
    options: ParseOptions,
}

impl TableParser {
    /// Create a parser from a format string such as `"sLf"`
    pub fn new(format: &str, options: ParseOptions) -> Result<Self> {
        let schema = Schema::parse(format)?;
        Self::with_schema(schema, options)
    }

    /// Create a parser from an already interpreted schema
    pub fn with_schema(schema: Schema, options: ParseOptions) -> Result<Self> {
        options.validate()?;
        debug!(%schema, has_header = options.has_header, "parser configured");
        Ok(Self { schema, options })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `input` into a table.
    ///
    /// Counts rows first, then allocates and fills every column. Either the
    /// whole table is returned or an error; the input is not retained.
    pub fn parse(&self, input: &str) -> Result<Table> {
        let row_count = count_rows(input, &self.schema, &self.options)?;
        let table = fill::fill_table(input, &self.schema, &self.options, row_count)?;
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            coerced = table.coerced_cells(),
            "table built"
        );
        Ok(table)
    }

    /// Read a whole file and parse it
    pub fn parse_path(&self, path: &Path) -> anyhow::Result<Table> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        self.parse(&text)
            .with_context(|| format!("Failed to parse file: {}", path.display()))
    }

    /// Read a stream to its end and parse it
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> anyhow::Result<Table> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .context("Failed to read input")?;
        Ok(self.parse(&text)?)
    }
}

impl Table {
    /// Parse `input` with the schema given by `format`
    pub fn parse(input: &str, format: &str, options: ParseOptions) -> Result<Table> {
        TableParser::new(format, options)?.parse(input)
    }
}
