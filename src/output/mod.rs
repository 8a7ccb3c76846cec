//! Output module
//!
//! Turns fetched records into Arrow tables and writes them out.
//!
//! # Overview
//!
//! - `records_to_batch` builds a `RecordBatch` whose columns are the union of
//!   the fields seen across records, in first-seen order
//! - `write_parquet`, `write_json_lines` and `format_table` serialise a table

mod table;
mod writer;

pub use table::{infer_schema, records_to_batch};
pub use writer::{
    format_table, write_json_lines, write_parquet, ParquetCompression, ParquetWriterConfig,
};

#[cfg(test)]
mod tests;
