//! Box-drawn terminal dump

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::OutputFormatter;

/// Terminal output: one header line per column (label and type), then every row
pub struct TerminalOutput {
    max_rows: Option<usize>,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { max_rows: None }
    }

    /// Only print the first `max_rows` rows
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            max_rows: Some(max_rows),
        }
    }

    fn header_cells(&self, table: &Table) -> Vec<String> {
        table
            .columns()
            .map(|(index, column)| {
                let type_name = table
                    .schema()
                    .get(index)
                    .map(|t| t.type_name())
                    .unwrap_or("unknown");
                match (column, table.label_at(index)) {
                    (None, _) => "unused".to_string(),
                    (Some(_), Some(label)) => format!("{} ({})", label, type_name),
                    (Some(_), None) => format!("[{}] ({})", index, type_name),
                }
            })
            .collect()
    }

    fn row_cells(&self, table: &Table, row: usize) -> Vec<String> {
        table
            .columns()
            .map(|(_, column)| {
                column
                    .and_then(|c| c.cell(row))
                    .map(|cell| cell.to_string())
                    .unwrap_or_else(|| "-".to_string())
            })
            .collect()
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        if table.column_count() == 0 {
            writeln!(writer, "(no columns)")?;
            return Ok(());
        }

        let shown = self
            .max_rows
            .map_or(table.row_count(), |max| max.min(table.row_count()));

        let mut data: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
        data.push(self.header_cells(table));
        for row in 0..shown {
            data.push(self.row_cells(table, row));
        }

        write!(writer, "{}", build_table(&data))?;
        if shown < table.row_count() {
            writeln!(writer, "… {} more rows", table.row_count() - shown)?;
        }
        writeln!(
            writer,
            "{} rows × {} columns",
            table.row_count(),
            table.column_count()
        )?;
        Ok(())
    }
}

/// Build a box-drawn table; the first row is the header
fn build_table(data: &[Vec<String>]) -> String {
    if data.is_empty() || data[0].is_empty() {
        return String::new();
    }

    let col_count = data[0].len();

    let mut col_widths: Vec<usize> = vec![0; col_count];
    for row in data {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    push_border(&mut output, &col_widths, '┌', '┬', '┐');
    push_row(&mut output, &data[0], &col_widths);
    push_border(&mut output, &col_widths, '├', '┼', '┤');
    for row in data.iter().skip(1) {
        push_row(&mut output, row, &col_widths);
    }
    push_border(&mut output, &col_widths, '└', '┴', '┘');
    output
}

fn push_border(output: &mut String, widths: &[usize], left: char, mid: char, right: char) {
    output.push(left);
    for (i, width) in widths.iter().enumerate() {
        output.push_str(&"─".repeat(width + 2));
        if i < widths.len() - 1 {
            output.push(mid);
        }
    }
    output.push(right);
    output.push('\n');
}

fn push_row(output: &mut String, row: &[String], widths: &[usize]) {
    output.push('│');
    for (i, cell) in row.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(0);
        // pad by chars, not bytes, so multi-byte text stays aligned
        let pad = width.saturating_sub(cell.chars().count());
        output.push(' ');
        output.push_str(cell);
        output.push_str(&" ".repeat(pad));
        output.push_str(" │");
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;

    fn render(table: &Table, output: TerminalOutput) -> String {
        let mut buf = Vec::new();
        output.render(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_dump() {
        let table = Table::parse("a,b,c\n1,x,ff\n", "L-x", ParseOptions::default()).unwrap();
        let text = render(&table, TerminalOutput::new());
        assert!(text.contains("│ a (i32) │ unused │ c (hex (i32)) │"));
        assert!(text.contains("│ 1       │ -      │ FF            │"));
        assert!(text.ends_with("1 rows × 3 columns\n"));
    }

    #[test]
    fn test_headerless_labels_are_positional() {
        let table = Table::parse("5\n", "L", ParseOptions::new().with_header(false)).unwrap();
        let text = render(&table, TerminalOutput::new());
        assert!(text.contains("[0] (i32)"));
    }

    #[test]
    fn test_max_rows() {
        let table = Table::parse("n\n1\n2\n3\n", "L", ParseOptions::default()).unwrap();
        let text = render(&table, TerminalOutput::with_max_rows(1));
        assert!(text.contains("… 2 more rows"));
    }
}
