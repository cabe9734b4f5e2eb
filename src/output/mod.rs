//! Output formatting for parsed tables
//!
//! Formatters only read through the table's accessors; they never parse.

mod json;
mod summary;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::config::{OutputFormat, OutputOptions};
use crate::model::Table;

pub use json::JsonOutput;
pub use summary::SummaryOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a table to a writer
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat, options: &OutputOptions) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => match options.max_rows {
                Some(max_rows) => Box::new(TerminalOutput::with_max_rows(max_rows)),
                None => Box::new(TerminalOutput::new()),
            },
            OutputFormat::Json if options.compact => Box::new(JsonOutput::compact()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Summary => Box::new(SummaryOutput),
        }
    }
}

/// Render a table to stdout
pub fn render_to_stdout(
    table: &Table,
    format: OutputFormat,
    options: &OutputOptions,
) -> Result<()> {
    let formatter = OutputFactory::create(format, options);
    let mut stdout = std::io::stdout().lock();
    formatter.render(table, &mut stdout)
}
