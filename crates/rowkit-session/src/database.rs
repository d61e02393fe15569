//! The database handle.

use rowkit_core::{Connection, Dialect, Executor, Model, Result, Scope, Value};
use rowkit_query::{BulkInsert, BulkInsertResult, InsertBuilder};

use crate::config::DatabaseConfig;
use crate::hooks::CreateHooks;
use crate::transaction::TxGuard;

/// A connection plus everything needed to write records through it.
///
/// Owns the connection, the configuration, the resolved dialect and the
/// create hooks. Construct one per connection and pass it around, or
/// install one process-wide with `rowkit::global::install`.
pub struct Database<C: Connection> {
    connection: C,
    config: DatabaseConfig,
    dialect: Dialect,
    hooks: CreateHooks,
}

impl<C: Connection + std::fmt::Debug> std::fmt::Debug for Database<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connection", &self.connection)
            .field("dsn", &self.config.redacted_dsn())
            .field("dialect", &self.dialect)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl<C: Connection> Database<C> {
    /// Wrap a connection.
    ///
    /// Validates the configuration and registers the built-in create hooks
    /// (identifier assignment, then timestamps).
    pub fn new(config: DatabaseConfig, connection: C) -> Result<Self> {
        config.validate()?;
        let dialect = config.resolved_dialect()?;
        let hooks = CreateHooks::with_defaults(&config.conventions);

        tracing::info!(
            dsn = %config.redacted_dsn(),
            dialect = ?dialect,
            chunk_size = config.bulk.chunk_size,
            "Database handle ready"
        );

        Ok(Self {
            connection,
            config,
            dialect,
            hooks,
        })
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn hooks(&self) -> &CreateHooks {
        &self.hooks
    }

    /// Register or remove create hooks.
    pub fn hooks_mut(&mut self) -> &mut CreateHooks {
        &mut self.hooks
    }

    /// A bulk insert runner preset with the configured options.
    pub fn bulk_insert(&self) -> BulkInsert {
        BulkInsert::from_options(self.config.bulk.clone()).dialect(self.dialect)
    }

    /// Execute a raw statement on the connection.
    pub fn execute_raw(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.execute(sql, params)
    }

    /// Run the create hooks on `record`, then insert it.
    #[tracing::instrument(level = "debug", skip(self, record))]
    pub fn create<M: Model>(&self, record: &mut M) -> Result<u64> {
        self.create_with(self, record)
    }

    /// Bulk insert with the configured default options.
    pub fn bulk_create<M: Model>(&self, records: &[M]) -> Result<BulkInsertResult> {
        self.bulk_insert().execute(self, records)
    }

    /// Bulk insert with explicit options.
    pub fn bulk_create_with<M: Model>(
        &self,
        records: &[M],
        bulk: BulkInsert,
    ) -> Result<BulkInsertResult> {
        bulk.dialect(self.dialect).execute(self, records)
    }

    /// Begin a transaction that rolls back unless committed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn begin(&self) -> Result<TxGuard<'_, C>> {
        tracing::info!("Beginning transaction");
        let tx = self.connection.begin()?;
        Ok(TxGuard::new(self, tx))
    }

    pub(crate) fn create_with<E, M>(&self, executor: &E, record: &mut M) -> Result<u64>
    where
        E: Executor + ?Sized,
        M: Model,
    {
        self.hooks.run(&mut Scope::new(&mut *record));

        let (sql, params) = InsertBuilder::new(&*record).dialect(self.dialect).build()?;
        let affected = executor.execute(&sql, &params)?;

        tracing::debug!(table = M::TABLE_NAME, affected, "Record created");
        Ok(affected)
    }

    pub(crate) fn log_statement(&self, sql: &str, params: &[Value]) {
        if self.config.log_statements {
            tracing::debug!(sql, params = params.len(), "Executing statement");
        }
    }
}

impl<C: Connection> Executor for Database<C> {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.log_statement(sql, params);
        self.connection
            .execute(sql, params)
            .map_err(|e| e.with_sql(sql))
    }
}
