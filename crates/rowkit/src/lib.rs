//! rowkit: write records to SQL databases in bulk, with client-side ids and
//! transactions that roll back unless committed.
//!
//! This facade re-exports the workspace crates:
//!
//! - `rowkit-core`: `Model`, `Value`, `Error`, the driver traits and ULID ids
//! - `rowkit-macros`: `#[derive(Model)]`
//! - `rowkit-query`: field extraction, INSERT builders, `BulkInsert`
//! - `rowkit-session`: `Database`, create hooks, `TxGuard`
//!
//! Code generated by `#[derive(Model)]` refers to `rowkit_core`, so crates
//! deriving `Model` depend on `rowkit-core` alongside `rowkit`.
//!
//! # Example
//!
//! ```ignore
//! use rowkit::prelude::*;
//!
//! #[derive(Model, Debug, Clone, Default)]
//! #[rowkit(table = "hero")]
//! struct Hero {
//!     #[rowkit(primary_key)]
//!     id: String,
//!     name: String,
//!     created_at: i64,
//! }
//!
//! let db = Database::new(DatabaseConfig::from_json(&settings)?, conn)?;
//!
//! let mut hero = Hero { name: "Deadpond".into(), ..Hero::default() };
//! db.create(&mut hero)?; // hero.id is now a ULID
//!
//! let mut tx = db.begin()?;
//! tx.bulk_create(&many_heroes)?;
//! tx.try_commit()?;
//! ```

pub mod global;

pub use rowkit_core::{
    Connection, ConnectionError, ConnectionErrorKind, Dialect, Error, Executor, FieldInfo,
    FromValue, IdGenerator, Model, QueryError, QueryErrorKind, Result, Scope, ScopeField,
    TransactionOps, Value, is_record_not_found, new_id,
};
pub use rowkit_macros::Model;
pub use rowkit_query::{
    BulkInsert, BulkInsertOptions, BulkInsertResult, ColumnValues, InsertBuilder,
    build_batch_insert, bulk_insert, extract_columns,
};
pub use rowkit_session::{
    CreateHooks, Database, DatabaseConfig, HookConventions, TxGuard, TxState, identifier_hook,
    timestamp_hook,
};

/// Everything an application usually needs.
pub mod prelude {
    pub use rowkit_core::{
        Connection, Error, Executor, Model, Result, Scope, TransactionOps, Value,
        is_record_not_found, new_id,
    };
    pub use rowkit_macros::Model;
    pub use rowkit_query::{BulkInsert, BulkInsertResult, bulk_insert};
    pub use rowkit_session::{Database, DatabaseConfig, TxGuard};
}
