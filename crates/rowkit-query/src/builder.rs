//! INSERT statement builders.
//!
//! Both builders emit `?` placeholders and quote identifiers for the
//! configured [`Dialect`].

use rowkit_core::{Dialect, Error, Model, QueryErrorKind, Result, Value, validate_table_name};

use crate::extract::ColumnValues;

/// Single-row INSERT builder used by the create path.
///
/// Writes every column field, including the primary key, in declaration
/// order. Blank fields that declare a default are left out so the database
/// applies its own.
///
/// # Example
///
/// ```ignore
/// let (sql, params) = InsertBuilder::new(&hero).dialect(Dialect::Mysql).build()?;
/// conn.execute(&sql, &params)?;
/// ```
#[derive(Debug)]
pub struct InsertBuilder<'a, M: Model> {
    model: &'a M,
    dialect: Dialect,
    replace: bool,
}

impl<'a, M: Model> InsertBuilder<'a, M> {
    /// Create a new INSERT builder for the given model instance.
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            dialect: Dialect::default(),
            replace: false,
        }
    }

    /// Quote identifiers for this dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Emit `REPLACE INTO` instead of `INSERT INTO`.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Build the INSERT SQL and parameters.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        validate_table_name(M::TABLE_NAME)?;
        let row = self.model.to_row();

        let mut seen: Vec<&'static str> = Vec::new();
        let mut columns = Vec::new();
        let mut params = Vec::new();
        for field in M::fields().iter().filter(|f| f.is_writable()) {
            let Some((_, value)) = row.iter().find(|(name, _)| *name == field.name) else {
                continue;
            };
            if field.has_default && value.is_blank() {
                continue;
            }
            if seen.contains(&field.column_name) {
                return Err(Error::Shape(format!(
                    "{} writes column `{}` more than once",
                    M::TABLE_NAME,
                    field.column_name
                )));
            }
            seen.push(field.column_name);
            columns.push(self.dialect.quote_identifier(field.column_name));
            params.push(value.clone());
        }

        if columns.is_empty() {
            return Err(Error::query(
                QueryErrorKind::Build,
                format!("{} has no columns to insert", M::TABLE_NAME),
            ));
        }

        let placeholders = vec!["?"; params.len()].join(", ");
        let sql = format!(
            "{} INTO {} ({}) VALUES ({})",
            verb(self.replace),
            self.dialect.quote_identifier(M::TABLE_NAME),
            columns.join(", "),
            placeholders
        );

        Ok((sql, params))
    }
}

fn verb(replace: bool) -> &'static str {
    if replace { "REPLACE" } else { "INSERT" }
}

/// Build one multi-row INSERT (or REPLACE) from same-shape mappings.
///
/// The column order is the sorted key order of the first mapping. Each
/// mapping contributes one `(?, ...)` group and its values in that order,
/// so the parameter list has `rows * columns` entries.
///
/// Fails with a build error on empty input and with a consistency error
/// when a later mapping does not have exactly the first mapping's columns.
pub fn build_batch_insert(
    rows: &[ColumnValues],
    table: &str,
    replace: bool,
    dialect: Dialect,
) -> Result<(String, Vec<Value>)> {
    let Some(first) = rows.first() else {
        return Err(Error::query(
            QueryErrorKind::Build,
            format!("no rows to insert into {table}"),
        ));
    };
    validate_table_name(table)?;

    let columns: Vec<&'static str> = first.columns().collect();
    let group = format!("({})", vec!["?"; columns.len()].join(", "));

    let mut params = Vec::with_capacity(rows.len() * columns.len());
    let mut groups = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() != columns.len() {
            return Err(Error::Consistency {
                expected: columns.len(),
                found: row.len(),
            });
        }
        for column in &columns {
            let value = row.get(column).ok_or(Error::Consistency {
                expected: columns.len(),
                found: row.len(),
            })?;
            params.push(value.clone());
        }
        groups.push(group.as_str());
    }

    let quoted: Vec<String> = columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect();
    let sql = format!(
        "{} INTO {} ({}) VALUES {}",
        verb(replace),
        dialect.quote_identifier(table),
        quoted.join(", "),
        groups.join(", ")
    );

    Ok((sql, params))
}
