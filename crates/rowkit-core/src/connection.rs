//! Connection and transaction traits implemented by database drivers.
//!
//! rowkit never opens connections itself. A driver (or a test double)
//! implements [`Connection`] and [`TransactionOps`], and everything above
//! this layer only ever calls [`Executor::execute`].

use crate::error::{Error, Result};
use crate::value::Value;

/// Anything that can run a parameterized statement.
///
/// Placeholders in `sql` are `?`, one per entry of `params`, in order.
pub trait Executor {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        (**self).execute(sql, params)
    }
}

/// A database connection that can start transactions.
pub trait Connection: Executor {
    /// Transaction type, borrowing the connection for its lifetime.
    type Tx<'conn>: TransactionOps
    where
        Self: 'conn;

    /// Begin a transaction.
    fn begin(&self) -> Result<Self::Tx<'_>>;
}

/// Operations on an open transaction.
pub trait TransactionOps: Executor {
    /// Commit the transaction.
    fn commit(&mut self) -> Result<()>;

    /// Roll the transaction back.
    fn rollback(&mut self) -> Result<()>;

    /// Take the terminal error recorded by the session, if any.
    ///
    /// Some drivers report failures of earlier statements only when the
    /// transaction ends; they surface them here after `commit` returned
    /// `Ok`.
    fn take_error(&mut self) -> Option<Error> {
        None
    }
}
