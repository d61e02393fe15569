//! Record field extraction.
//!
//! Turns one record into the column → value mapping a bulk INSERT binds.

use std::collections::BTreeMap;

use rowkit_core::{Error, FieldInfo, Model, Result, Value};

/// Column name → bound value for one record.
///
/// Iteration is in lexicographic column order, which is the column order
/// of every statement built from these mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues(BTreeMap<&'static str, Value>);

impl ColumnValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value.
    pub fn insert(&mut self, column: &'static str, value: impl Into<Value>) {
        self.0.insert(column, value.into());
    }

    /// Builder form of [`ColumnValues::insert`].
    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(&'static str, Value)> for ColumnValues {
    fn from_iter<I: IntoIterator<Item = (&'static str, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether a field is left out of bulk-inserted columns.
fn is_excluded(field: &FieldInfo, exclude: &[&str]) -> bool {
    !field.is_writable() || field.primary_key || exclude.iter().any(|name| field.matches(name))
}

/// Extract the columns a bulk insert writes for one record.
///
/// A field is dropped when it is named in `exclude` (by field or column
/// name), is a relationship, is ignored, or is a primary key. Kept fields
/// are bound as:
///
/// 1. the current time, for auto timestamps (`created_at`, `updated_at` or
///    flagged fields);
/// 2. the declared default literal as text, when the field has a default
///    and is blank; a default without a literal keeps the blank value;
/// 3. the current value otherwise.
///
/// Values `to_row` reports under a name no field declares, and two fields
/// writing the same column, are shape errors.
pub fn extract_columns<M: Model>(record: &M, exclude: &[&str]) -> Result<ColumnValues> {
    let fields = M::fields();
    let now = Value::now();
    let mut columns = ColumnValues::new();

    for (name, value) in record.to_row() {
        let field = fields.iter().find(|f| f.name == name).ok_or_else(|| {
            Error::Shape(format!(
                "{} reported a value for undeclared field `{}`",
                M::TABLE_NAME,
                name
            ))
        })?;

        if is_excluded(field, exclude) {
            continue;
        }

        let value = if field.is_auto_timestamp() {
            now.clone()
        } else if field.has_default && value.is_blank() {
            field
                .default
                .map_or(value, |literal| Value::Text(literal.to_string()))
        } else {
            value
        };

        if columns.contains(field.column_name) {
            return Err(Error::Shape(format!(
                "{} writes column `{}` more than once",
                M::TABLE_NAME,
                field.column_name
            )));
        }
        columns.insert(field.column_name, value);
    }

    Ok(columns)
}
