//! csvcols - schema-driven CSV parsing into typed columnar tables
//!
//! A format string such as `"sLf-x"` fixes the type of every column. The
//! input is walked twice: once to count rows, once to fill exactly-sized
//! typed columns. The resulting [`Table`] is immutable.
//!
//! ```
//! use csvcols::{ParseOptions, Table};
//!
//! let table = Table::parse("a,b\n1,2\n3,4\n", "LL", ParseOptions::default()).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column("a").unwrap().as_i32(), Some(&[1, 3][..]));
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use config::{CoercionPolicy, ParseOptions};
pub use error::ParseError;
pub use model::{CellValue, ColumnRef, ColumnType, ColumnValues, Schema, Table};
pub use parser::TableParser;
