//! Chunked bulk inserts.
//!
//! Records are split into contiguous chunks of at most `chunk_size`. Each
//! chunk becomes one multi-row statement; chunks run in order and the first
//! failure stops the run. Chunks that already ran are not undone here, so
//! callers who need all-or-nothing wrap the call in a transaction.

use serde::{Deserialize, Serialize};

use rowkit_core::{Dialect, Error, Executor, Model, Result};

use crate::builder::build_batch_insert;
use crate::extract::{ColumnValues, extract_columns};

/// Default number of records per statement.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Bulk insert settings, loadable from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkInsertOptions {
    /// Records per statement. Zero is rejected when the insert runs.
    pub chunk_size: usize,
    /// Emit `REPLACE INTO` instead of `INSERT INTO`.
    pub replace: bool,
    /// Field or column names never written.
    pub exclude_columns: Vec<String>,
}

impl Default for BulkInsertOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            replace: false,
            exclude_columns: Vec::new(),
        }
    }
}

/// Outcome of a bulk insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkInsertResult {
    /// Statements executed.
    pub chunks: usize,
    /// Records written.
    pub rows: usize,
    /// Affected-row total reported by the driver.
    pub affected: u64,
}

/// Bulk INSERT runner.
///
/// # Example
///
/// ```ignore
/// let result = BulkInsert::new()
///     .chunk_size(500)
///     .exclude_columns(&["nickname"])
///     .execute(&conn, &heroes)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BulkInsert {
    options: BulkInsertOptions,
    dialect: Dialect,
}

impl BulkInsert {
    /// Create a runner with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner from loaded options.
    pub fn from_options(options: BulkInsertOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Set the number of records per statement.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.options.chunk_size = chunk_size;
        self
    }

    /// Emit `REPLACE INTO` instead of `INSERT INTO`.
    pub fn replace(mut self, replace: bool) -> Self {
        self.options.replace = replace;
        self
    }

    /// Never write these fields (by field or column name).
    pub fn exclude_columns(mut self, columns: &[&str]) -> Self {
        self.options.exclude_columns = columns.iter().map(ToString::to_string).collect();
        self
    }

    /// Quote identifiers for this dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Current options.
    pub fn options(&self) -> &BulkInsertOptions {
        &self.options
    }

    /// Insert `records` through `executor`.
    ///
    /// Empty input executes nothing. A chunk whose records extract to
    /// different column counts fails with [`Error::Consistency`] before it
    /// is executed.
    #[tracing::instrument(level = "debug", skip(self, executor, records))]
    pub fn execute<E, M>(&self, executor: &E, records: &[M]) -> Result<BulkInsertResult>
    where
        E: Executor + ?Sized,
        M: Model,
    {
        let chunk_size = self.options.chunk_size;
        if chunk_size == 0 {
            return Err(Error::Config("bulk insert chunk size must be positive".into()));
        }

        let mut result = BulkInsertResult::default();
        if records.is_empty() {
            tracing::debug!(table = M::TABLE_NAME, "Bulk insert with no records");
            return Ok(result);
        }

        let exclude: Vec<&str> = self
            .options
            .exclude_columns
            .iter()
            .map(String::as_str)
            .collect();

        tracing::info!(
            table = M::TABLE_NAME,
            records = records.len(),
            chunk_size,
            replace = self.options.replace,
            "Starting bulk insert"
        );

        for (index, chunk) in records.chunks(chunk_size).enumerate() {
            let rows = chunk
                .iter()
                .map(|record| extract_columns(record, &exclude))
                .collect::<Result<Vec<_>>>()?;
            check_sizes(&rows)?;

            let (sql, params) =
                build_batch_insert(&rows, M::TABLE_NAME, self.options.replace, self.dialect)?;

            let affected = executor
                .execute(&sql, &params)
                .map_err(|e| e.with_sql(sql.as_str()))?;

            tracing::debug!(chunk = index, rows = chunk.len(), affected, "Chunk inserted");
            result.chunks += 1;
            result.rows += chunk.len();
            result.affected += affected;
        }

        tracing::info!(
            table = M::TABLE_NAME,
            chunks = result.chunks,
            rows = result.rows,
            affected = result.affected,
            "Bulk insert completed"
        );

        Ok(result)
    }
}

/// Every mapping in a chunk must have as many columns as the first.
fn check_sizes(rows: &[ColumnValues]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    match rows.iter().find(|row| row.len() != first.len()) {
        Some(row) => Err(Error::Consistency {
            expected: first.len(),
            found: row.len(),
        }),
        None => Ok(()),
    }
}

/// Insert `records` in chunks of `chunk_size`.
///
/// Shorthand for `BulkInsert::new().chunk_size(..).replace(..).exclude_columns(..)`.
pub fn bulk_insert<E, M>(
    executor: &E,
    records: &[M],
    chunk_size: usize,
    replace: bool,
    exclude_columns: &[&str],
) -> Result<BulkInsertResult>
where
    E: Executor + ?Sized,
    M: Model,
{
    BulkInsert::new()
        .chunk_size(chunk_size)
        .replace(replace)
        .exclude_columns(exclude_columns)
        .execute(executor, records)
}
