//! Rollback-by-default transaction guard.
//!
//! A [`TxGuard`] rolls its transaction back when it is released or dropped,
//! unless it was committed first:
//!
//! ```ignore
//! let mut tx = db.begin()?;
//! tx.bulk_create(&heroes)?;
//! tx.create(&mut team)?;
//! tx.try_commit()?;
//! // any early return above drops `tx`, which rolls back
//! ```

use std::fmt;

use rowkit_core::{Connection, Error, Executor, Model, Result, TransactionOps, Value};
use rowkit_query::{BulkInsert, BulkInsertResult};

use crate::database::Database;

/// Lifecycle of a [`TxGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Statements may run; commit or rollback still pending.
    Open,
    /// Commit succeeded.
    Committed,
    /// Rolled back, explicitly, on release, or after a failed commit.
    RolledBack,
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxState::Open => "open",
            TxState::Committed => "committed",
            TxState::RolledBack => "rolled back",
        };
        f.write_str(s)
    }
}

/// A transaction that rolls back unless committed.
///
/// The guard borrows its [`Database`] and is itself an [`Executor`], so the
/// database's create and bulk paths run inside the transaction through it.
pub struct TxGuard<'db, C: Connection + 'db> {
    db: &'db Database<C>,
    tx: C::Tx<'db>,
    state: TxState,
}

impl<C: Connection> fmt::Debug for TxGuard<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxGuard")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'db, C: Connection + 'db> TxGuard<'db, C> {
    pub(crate) fn new(db: &'db Database<C>, tx: C::Tx<'db>) -> Self {
        Self {
            db,
            tx,
            state: TxState::Open,
        }
    }

    /// Current state.
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Whether statements may still run.
    pub fn is_open(&self) -> bool {
        self.state == TxState::Open
    }

    fn ensure_open(&self, action: &str) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::Transaction(format!(
                "cannot {action}: transaction is {}",
                self.state
            )))
        }
    }

    /// Commit the transaction.
    ///
    /// A failure of the commit itself, or an error the session recorded
    /// earlier and reports now, rolls the transaction back. The error is
    /// then returned when `suppress_panic` is set and raised as a panic
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics on a failed commit unless `suppress_panic` is true.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn commit(&mut self, suppress_panic: bool) -> Result<()> {
        self.ensure_open("commit")?;
        tracing::info!("Committing transaction");

        let outcome = self
            .tx
            .commit()
            .and_then(|()| self.tx.take_error().map_or(Ok(()), Err));

        match outcome {
            Ok(()) => {
                self.state = TxState::Committed;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Commit failed, rolling back");
                if let Err(rollback_err) = self.tx.rollback() {
                    tracing::warn!(error = %rollback_err, "Rollback after failed commit failed");
                }
                self.state = TxState::RolledBack;
                if suppress_panic {
                    Err(err)
                } else {
                    panic!("transaction commit failed: {err}");
                }
            }
        }
    }

    /// Commit, returning any failure instead of panicking.
    pub fn try_commit(&mut self) -> Result<()> {
        self.commit(true)
    }

    /// Roll back now.
    ///
    /// The guard ends up rolled back even when the driver reports an error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn rollback(&mut self) -> Result<()> {
        self.ensure_open("roll back")?;
        tracing::info!("Rolling back transaction");
        self.state = TxState::RolledBack;
        self.tx.rollback()
    }

    /// Roll back unless already committed or rolled back.
    ///
    /// Safe to call any number of times; rollback errors are logged.
    pub fn release(&mut self) {
        if !self.is_open() {
            return;
        }
        tracing::info!("Releasing uncommitted transaction, rolling back");
        self.state = TxState::RolledBack;
        if let Err(err) = self.tx.rollback() {
            tracing::warn!(error = %err, "Rollback on release failed");
        }
    }

    /// Run create hooks on `record` and insert it inside this transaction.
    pub fn create<M: Model>(&self, record: &mut M) -> Result<u64> {
        self.ensure_open("create")?;
        self.db.create_with(self, record)
    }

    /// Bulk insert with the database's default options inside this transaction.
    pub fn bulk_create<M: Model>(&self, records: &[M]) -> Result<BulkInsertResult> {
        self.bulk_create_with(records, self.db.bulk_insert())
    }

    /// Bulk insert with explicit options inside this transaction.
    pub fn bulk_create_with<M: Model>(
        &self,
        records: &[M],
        bulk: BulkInsert,
    ) -> Result<BulkInsertResult> {
        self.ensure_open("bulk insert")?;
        bulk.dialect(self.db.dialect()).execute(self, records)
    }
}

impl<'db, C: Connection + 'db> Executor for TxGuard<'db, C> {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.ensure_open("execute")?;
        self.db.log_statement(sql, params);
        self.tx.execute(sql, params).map_err(|e| e.with_sql(sql))
    }
}

impl<'db, C: Connection + 'db> Drop for TxGuard<'db, C> {
    fn drop(&mut self) {
        self.release();
    }
}
