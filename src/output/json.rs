//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::{ColumnValues, Table};

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    index: usize,
    label: Option<&'a str>,
    #[serde(rename = "type")]
    type_name: &'static str,
    /// Absent (null) for unused columns
    values: Option<&'a ColumnValues>,
}

#[derive(Serialize)]
struct JsonTable<'a> {
    row_count: usize,
    column_count: usize,
    columns: Vec<JsonColumn<'a>>,
}

impl OutputFormatter for JsonOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let columns = table
            .columns()
            .map(|(index, column)| JsonColumn {
                index,
                label: table.label_at(index),
                type_name: table
                    .schema()
                    .get(index)
                    .map(|t| t.type_name())
                    .unwrap_or("unknown"),
                values: column.map(|c| c.values()),
            })
            .collect();

        let output = JsonTable {
            row_count: table.row_count(),
            column_count: table.column_count(),
            columns,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}
