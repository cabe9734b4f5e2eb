//! Allocate-and-fill pass

use tracing::debug;

use crate::config::ParseOptions;
use crate::error::{ParseError, Result};
use crate::model::{Column, ColumnValues, Schema, Table};

use super::coerce::Coercer;
use super::tokenizer::FieldCursor;

/// Second walk over `input`: read labels, allocate every column for exactly
/// `row_count` values and convert each field into its column.
///
/// `row_count` must come from [`super::count_rows`] over the same input; any
/// disagreement is reported as [`ParseError::RowCountMismatch`].
pub(crate) fn fill_table(
    input: &str,
    schema: &Schema,
    options: &ParseOptions,
    row_count: usize,
) -> Result<Table> {
    let mut cursor = FieldCursor::new(input, options);

    let labels: Vec<Option<String>> = if options.has_header && !schema.is_empty() {
        schema
            .types()
            .iter()
            .map(|column_type| {
                let label = cursor.next_text_field()?;
                Ok((!column_type.is_unused()).then(|| label.into_owned()))
            })
            .collect::<Result<_>>()?
    } else {
        vec![None; schema.len()]
    };

    let mut storage: Vec<Option<ColumnValues>> = schema
        .types()
        .iter()
        .map(|&column_type| ColumnValues::with_capacity(column_type, row_count))
        .collect();
    debug!(
        rows = row_count,
        columns = schema.len(),
        bytes = row_count * schema.row_width(),
        "allocated column storage"
    );

    let mut coercer = Coercer::new(options.coercion);
    if !schema.is_empty() {
        for row in 0..row_count {
            if cursor.at_end() {
                return Err(ParseError::RowCountMismatch {
                    counted: row_count,
                    filled: row,
                });
            }
            for (column, (&column_type, slot)) in
                schema.types().iter().zip(storage.iter_mut()).enumerate()
            {
                let text = if column_type.is_text() {
                    cursor.next_text_field()?
                } else {
                    cursor.next_value_field()?.into()
                };
                if let Some(values) = slot {
                    coercer.store(values, column_type, text, row, column)?;
                }
            }
        }
        if !cursor.at_end() {
            return Err(ParseError::RowCountMismatch {
                counted: row_count,
                filled: row_count + 1,
            });
        }
    }

    let columns = schema
        .types()
        .iter()
        .zip(labels)
        .zip(storage)
        .map(|((&column_type, label), values)| {
            if let Some(values) = &values {
                if values.len() != row_count {
                    return Err(ParseError::RowCountMismatch {
                        counted: row_count,
                        filled: values.len(),
                    });
                }
            }
            Ok(Column {
                label,
                column_type,
                values,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table::from_parts(
        schema.clone(),
        columns,
        row_count,
        coercer.fallbacks(),
    ))
}
