//! Database handle and transactions for rowkit.
//!
//! `rowkit-session` ties a driver connection to the statement layer.
//!
//! # Design Philosophy
//!
//! - **Explicit handle**: a [`Database`] owns its connection and settings;
//!   nothing is global unless the application installs it.
//! - **Hooks as closures**: create hooks are plain functions over a record's
//!   scope, registered by name.
//! - **Rollback by default**: a [`TxGuard`] that goes out of scope without a
//!   commit rolls back.
//!
//! # Example
//!
//! ```ignore
//! let db = Database::new(DatabaseConfig::new("postgres://app@localhost/app"), conn)?;
//!
//! // Hooks assign the id and timestamps, then the record is inserted
//! db.create(&mut hero)?;
//!
//! // Chunked multi-row inserts inside a transaction
//! let mut tx = db.begin()?;
//! tx.bulk_create(&heroes)?;
//! tx.try_commit()?;
//! ```

pub mod config;
pub mod database;
pub mod hooks;
pub mod transaction;

pub use config::{DatabaseConfig, HookConventions};
pub use database::Database;
pub use hooks::{CreateHook, CreateHooks, identifier_hook, timestamp_hook};
pub use transaction::{TxGuard, TxState};
