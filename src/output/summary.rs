//! Plain-text schema summary

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::OutputFormatter;

/// Writes the table's `Display` summary: labels, types and row count
#[derive(Default)]
pub struct SummaryOutput;

impl OutputFormatter for SummaryOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", table)?;
        if table.coerced_cells() > 0 {
            writeln!(
                writer,
                "  coerced cells = {} (numeric text that was not a clean number)",
                table.coerced_cells()
            )?;
        }
        Ok(())
    }
}
