//! Data model for typed columnar tables

mod schema;
mod table;

pub use schema::{ColumnType, Schema};
pub use table::{
    CellValue, Column, ColumnElement, ColumnRef, ColumnSummary, ColumnValues, Table, TableSummary,
};
