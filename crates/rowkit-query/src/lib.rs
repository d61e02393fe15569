//! INSERT construction and bulk inserts for rowkit.
//!
//! `rowkit-query` is the **statement layer**. It reads `Model` metadata,
//! produces parameterized SQL with `?` placeholders, and hands it to any
//! `Executor`.
//!
//! # Role In The Architecture
//!
//! - **Extraction**: [`extract_columns`] maps one record to the columns a
//!   bulk insert writes, applying exclusion, defaults and timestamps.
//! - **Building**: [`build_batch_insert`] renders same-shape mappings as one
//!   multi-row statement; [`InsertBuilder`] renders a single record for the
//!   create path.
//! - **Execution**: [`BulkInsert`] chunks a slice of records and runs one
//!   statement per chunk.

pub mod builder;
pub mod bulk;
pub mod extract;

pub use builder::{InsertBuilder, build_batch_insert};
pub use bulk::{BulkInsert, BulkInsertOptions, BulkInsertResult, DEFAULT_CHUNK_SIZE, bulk_insert};
pub use extract::{ColumnValues, extract_columns};
