//! Core types and traits for rowkit.
//!
//! `rowkit-core` is the **foundation layer**. It defines the contracts the
//! other crates build on and nothing that touches SQL text beyond quoting.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Model` is implemented by records (usually through
//!   `#[derive(Model)]`), `Connection` / `TransactionOps` / `Executor` by
//!   drivers.
//! - **Data model**: `Value` and `FieldInfo` describe what a record writes.
//! - **Identifiers**: `new_id` hands out monotonic ULID primary keys.
//!
//! # Who Uses This Crate
//!
//! - `rowkit-macros` generates `Model` implementations defined here.
//! - `rowkit-query` turns `Model` metadata and `Value`s into INSERT statements.
//! - `rowkit-session` drives `Connection` and `TransactionOps` for the create
//!   path and the transaction guard.

pub mod connection;
pub mod error;
pub mod field;
pub mod id;
pub mod identifiers;
pub mod model;
pub mod value;

pub use connection::{Connection, Executor, TransactionOps};
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, QueryError, QueryErrorKind, Result,
    is_record_not_found,
};
pub use field::FieldInfo;
pub use id::{IdGenerator, new_id};
pub use identifiers::{Dialect, is_bare_identifier, validate_table_name};
pub use model::{Model, Scope, ScopeField};
pub use value::{FromValue, Value, now_micros};
