//! Shared mock connection for the facade tests.

#![allow(dead_code)]

use std::sync::Mutex;

use rowkit::{Connection, Error, Executor, Result, TransactionOps, Value};

/// One executed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub in_tx: bool,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Thread-safe connection that records statements and transaction events.
#[derive(Debug, Default)]
pub struct MockConnection {
    statements: Mutex<Vec<Executed>>,
    events: Mutex<Vec<&'static str>>,
    fail_matching: Mutex<Option<(String, Error)>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next statement whose SQL contains `pattern`.
    pub fn fail_next(&self, pattern: &str, err: Error) {
        *self.fail_matching.lock().unwrap() = Some((pattern.to_string(), err));
    }

    pub fn statements(&self) -> Vec<Executed> {
        self.statements.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, in_tx: bool, sql: &str, params: &[Value]) -> Result<u64> {
        let mut fail = self.fail_matching.lock().unwrap();
        if fail.as_ref().is_some_and(|(pattern, _)| sql.contains(pattern.as_str())) {
            if let Some((_, err)) = fail.take() {
                return Err(err);
            }
        }
        let rows = sql.matches("), (").count() as u64 + 1;
        self.statements.lock().unwrap().push(Executed {
            in_tx,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(rows)
    }
}

impl Executor for MockConnection {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(false, sql, params)
    }
}

pub struct MockTx<'a> {
    conn: &'a MockConnection,
}

impl Executor for MockTx<'_> {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.conn.record(true, sql, params)
    }
}

impl TransactionOps for MockTx<'_> {
    fn commit(&mut self) -> Result<()> {
        self.conn.events.lock().unwrap().push("commit");
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.events.lock().unwrap().push("rollback");
        Ok(())
    }
}

impl Connection for MockConnection {
    type Tx<'conn>
        = MockTx<'conn>
    where
        Self: 'conn;

    fn begin(&self) -> Result<Self::Tx<'_>> {
        self.events.lock().unwrap().push("begin");
        Ok(MockTx { conn: self })
    }
}
