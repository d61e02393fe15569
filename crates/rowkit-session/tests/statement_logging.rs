//! `DatabaseConfig::log_statements` logs each statement exactly once.

use std::io;
use std::sync::{Arc, Mutex};

use rowkit_core::{Connection, Executor, Result, TransactionOps, Value};
use rowkit_macros::Model;
use rowkit_query::BulkInsert;
use rowkit_session::{Database, DatabaseConfig};

#[derive(Model, Debug, Clone, Default)]
#[rowkit(table = "hero")]
struct Hero {
    #[rowkit(primary_key)]
    id: String,
    name: String,
}

fn heroes(n: usize) -> Vec<Hero> {
    (0..n)
        .map(|i| Hero {
            name: format!("hero-{i}"),
            ..Hero::default()
        })
        .collect()
}

#[derive(Debug, Default)]
struct NullConnection;

impl Executor for NullConnection {
    fn execute(&self, _sql: &str, _params: &[Value]) -> Result<u64> {
        Ok(1)
    }
}

struct NullTransaction;

impl Executor for NullTransaction {
    fn execute(&self, _sql: &str, _params: &[Value]) -> Result<u64> {
        Ok(1)
    }
}

impl TransactionOps for NullTransaction {
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Connection for NullConnection {
    type Tx<'conn>
        = NullTransaction
    where
        Self: 'conn;

    fn begin(&self) -> Result<Self::Tx<'_>> {
        Ok(NullTransaction)
    }
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn count(&self, needle: &str) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).matches(needle).count()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with debug-level events captured.
fn capture(f: impl FnOnce()) -> Captured {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured
}

fn database(log_statements: bool) -> Database<NullConnection> {
    let config = DatabaseConfig::new("sqlite3://test.db").log_statements(log_statements);
    Database::new(config, NullConnection).unwrap()
}

#[test]
fn enabled_logs_every_statement_once() {
    let db = database(true);
    let mut single = Hero::default();
    let logs = capture(|| {
        db.create(&mut single).unwrap();
        db.bulk_create_with(&heroes(3), BulkInsert::new().chunk_size(2))
            .unwrap();
    });
    assert_eq!(logs.count("Executing statement"), 3);
    assert_eq!(logs.count("INSERT INTO"), 3);
}

#[test]
fn enabled_logs_inside_transactions() {
    let db = database(true);
    let logs = capture(|| {
        let mut tx = db.begin().unwrap();
        tx.bulk_create(&heroes(2)).unwrap();
        tx.try_commit().unwrap();
    });
    assert_eq!(logs.count("Executing statement"), 1);
}

#[test]
fn disabled_logs_no_statements() {
    let db = database(false);
    let logs = capture(|| {
        db.bulk_create(&heroes(3)).unwrap();
        db.execute_raw("DELETE FROM \"hero\"", &[]).unwrap();
    });
    assert_eq!(logs.count("Executing statement"), 0);
    assert_eq!(logs.count("Bulk insert completed"), 1);
}
