//! SQL dialects and identifier quoting.
//!
//! Only identifiers follow the dialect. Statements always use `?`
//! placeholders.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, QueryErrorKind, Result};

static BARE_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier pattern is valid")
});

/// The SQL dialect, selected from the DSN driver name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL: `"ident"`
    #[default]
    Postgres,
    /// SQLite: `"ident"`
    Sqlite,
    /// MySQL / MariaDB: `` `ident` ``
    Mysql,
    /// SQL Server: `[ident]`
    Mssql,
}

impl Dialect {
    /// Map a DSN driver name to a dialect.
    ///
    /// Unknown drivers quote like PostgreSQL.
    #[must_use]
    pub fn from_driver(driver: &str) -> Self {
        match driver.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Dialect::Mysql,
            "mssql" | "sqlserver" => Dialect::Mssql,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            _ => Dialect::Postgres,
        }
    }

    /// Quote an identifier, doubling any embedded closing quote.
    ///
    /// A dotted `schema.table` name is quoted part by part.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_part(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_part(self, part: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", part.replace('"', "\"\"")),
            Dialect::Mysql => format!("`{}`", part.replace('`', "``")),
            Dialect::Mssql => format!("[{}]", part.replace(']', "]]")),
        }
    }
}

/// Whether `name` is a plain identifier (optionally `schema.`-qualified).
#[must_use]
pub fn is_bare_identifier(name: &str) -> bool {
    BARE_IDENT.is_match(name)
}

/// Reject table names that cannot be quoted: empty, or with an empty
/// `schema.table` part.
///
/// Any other name is accepted; [`Dialect::quote_identifier`] escapes it.
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.split('.').any(str::is_empty) {
        return Err(Error::query(
            QueryErrorKind::Build,
            format!("invalid table name `{name}`"),
        ));
    }
    if !is_bare_identifier(name) {
        tracing::debug!(table = name, "Table name is not a bare identifier, quoting");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_per_dialect() {
        assert_eq!(Dialect::Postgres.quote_identifier("hero"), "\"hero\"");
        assert_eq!(Dialect::Sqlite.quote_identifier("hero"), "\"hero\"");
        assert_eq!(Dialect::Mysql.quote_identifier("hero"), "`hero`");
        assert_eq!(Dialect::Mssql.quote_identifier("hero"), "[hero]");
    }

    #[test]
    fn test_quote_escapes_and_splits_schema() {
        assert_eq!(Dialect::Postgres.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(Dialect::Mysql.quote_identifier("app.hero"), "`app`.`hero`");
    }

    #[test]
    fn test_from_driver() {
        assert_eq!(Dialect::from_driver("mysql"), Dialect::Mysql);
        assert_eq!(Dialect::from_driver("MSSQL"), Dialect::Mssql);
        assert_eq!(Dialect::from_driver("sqlite3"), Dialect::Sqlite);
        assert_eq!(Dialect::from_driver("postgres"), Dialect::Postgres);
        assert_eq!(Dialect::from_driver("cockroach"), Dialect::Postgres);
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("hero").is_ok());
        assert!(validate_table_name("app.hero_deleted").is_ok());
        assert!(validate_table_name("hero-log").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("app.").is_err());
        assert!(validate_table_name("app..hero").is_err());
    }

    #[test]
    fn test_bare_identifier() {
        assert!(is_bare_identifier("hero_deleted"));
        assert!(is_bare_identifier("app.hero"));
        assert!(!is_bare_identifier("hero-log"));
        assert!(!is_bare_identifier("hero; DROP"));
    }

    #[test]
    fn test_non_bare_names_are_escaped() {
        assert_eq!(
            Dialect::Postgres.quote_identifier("hero\"; DROP"),
            "\"hero\"\"; DROP\""
        );
        assert_eq!(Dialect::Mssql.quote_identifier("hero]log"), "[hero]]log]");
    }
}
