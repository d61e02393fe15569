//! Database handle configuration.
//!
//! Loaded from JSON (or built in code) and handed to
//! [`Database::new`](crate::Database::new).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use rowkit_core::{Dialect, Error, Result};
use rowkit_query::BulkInsertOptions;

fn dsn_regex() -> &'static Regex {
    static DSN: OnceLock<Regex> = OnceLock::new();
    DSN.get_or_init(|| {
        Regex::new(r"^(?P<driver>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<rest>.*)$")
            .expect("DSN pattern is valid")
    })
}

fn credentials_regex() -> &'static Regex {
    static CREDENTIALS: OnceLock<Regex> = OnceLock::new();
    CREDENTIALS.get_or_init(|| {
        Regex::new(r"://(?P<user>[^:/@]*):[^@]*@").expect("credentials pattern is valid")
    })
}

/// Naming conventions used by the identifier hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConventions {
    /// Tables whose name ends with this suffix hold soft-delete markers.
    pub soft_delete_suffix: String,
    /// Field stamped with the deletion time on marker tables.
    pub deleted_at_field: String,
    /// Name of the primary-key field that receives generated ids.
    pub id_field: String,
}

impl Default for HookConventions {
    fn default() -> Self {
        Self {
            soft_delete_suffix: "deleted".to_string(),
            deleted_at_field: "at".to_string(),
            id_field: "id".to_string(),
        }
    }
}

impl HookConventions {
    /// Whether `table` is a soft-delete marker table.
    pub fn is_marker_table(&self, table: &str) -> bool {
        !self.soft_delete_suffix.is_empty() && table.ends_with(&self.soft_delete_suffix)
    }
}

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `driver://rest`; the driver selects identifier quoting.
    ///
    /// May be empty when the connection is set up elsewhere.
    pub dsn: String,
    /// Explicit dialect, overriding the one derived from the DSN.
    pub dialect: Option<Dialect>,
    /// Log every executed statement at debug level.
    pub log_statements: bool,
    /// Defaults for `Database::bulk_create`.
    pub bulk: BulkInsertOptions,
    /// Conventions for the identifier hook.
    pub conventions: HookConventions,
}

impl DatabaseConfig {
    /// Create a configuration for a DSN with default settings.
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid database config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the dialect explicitly.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Enable or disable statement logging.
    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    /// Set the default bulk insert options.
    pub fn bulk(mut self, options: BulkInsertOptions) -> Self {
        self.bulk = options;
        self
    }

    /// Set the default bulk insert chunk size.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.bulk.chunk_size = chunk_size;
        self
    }

    /// Set the identifier hook conventions.
    pub fn conventions(mut self, conventions: HookConventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Driver name from the DSN, `None` when the DSN is empty.
    pub fn driver(&self) -> Result<Option<&str>> {
        if self.dsn.is_empty() {
            return Ok(None);
        }
        dsn_regex()
            .captures(&self.dsn)
            .and_then(|caps| caps.name("driver"))
            .map(|m| Some(m.as_str()))
            .ok_or_else(|| {
                Error::Config(format!(
                    "invalid DSN `{}`: expected driver://...",
                    self.redacted_dsn()
                ))
            })
    }

    /// Dialect to quote identifiers with.
    pub fn resolved_dialect(&self) -> Result<Dialect> {
        if let Some(dialect) = self.dialect {
            return Ok(dialect);
        }
        Ok(self.driver()?.map(Dialect::from_driver).unwrap_or_default())
    }

    /// The DSN with any password masked, for logs.
    pub fn redacted_dsn(&self) -> String {
        credentials_regex()
            .replace(&self.dsn, "://$user:***@")
            .into_owned()
    }

    /// Check the DSN and the bulk options.
    pub fn validate(&self) -> Result<()> {
        self.driver()?;
        if self.bulk.chunk_size == 0 {
            return Err(Error::Config(
                "bulk.chunk_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
