//! The `Model` capability and the per-record `Scope` handed to create hooks.

use crate::error::{Error, Result};
use crate::field::FieldInfo;
use crate::value::Value;

/// A record type that can be written to a table.
///
/// Usually generated by `#[derive(Model)]`; implementing it by hand is fine
/// for types whose shape the macro cannot express.
pub trait Model: Sized {
    /// Table the records are written to.
    const TABLE_NAME: &'static str;

    /// Field metadata in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Current values keyed by Rust field name.
    ///
    /// Relationship and ignored fields may be omitted. A field omitted for
    /// one record but present for another makes the two records different
    /// shapes, which bulk inserts reject.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Assign a value to the field with the given Rust name.
    fn set_value(&mut self, field: &str, value: Value) -> Result<()>;

    /// The primary-key field, if the model declares one.
    fn primary_key_field() -> Option<&'static FieldInfo> {
        Self::fields().iter().find(|f| f.primary_key)
    }

    /// Look a field up by Rust name or column name.
    fn field(name: &str) -> Option<&'static FieldInfo> {
        Self::fields().iter().find(|f| f.matches(name))
    }

    /// Current value of one field, by Rust name or column name.
    fn value_of(&self, name: &str) -> Option<Value> {
        let field = Self::field(name)?;
        self.to_row()
            .into_iter()
            .find(|(n, _)| *n == field.name)
            .map(|(_, v)| v)
    }
}

/// Object-safe access to a record, used by [`Scope`].
trait Target {
    fn read_field(&self, field: &str) -> Option<Value>;
    fn write_field(&mut self, field: &str, value: Value) -> Result<()>;
}

impl<M: Model> Target for M {
    fn read_field(&self, field: &str) -> Option<Value> {
        self.value_of(field)
    }

    fn write_field(&mut self, field: &str, value: Value) -> Result<()> {
        self.set_value(field, value)
    }
}

/// A resolved, mutable view of one record about to be created.
///
/// Hooks read the table name and field metadata through the scope and
/// assign values with [`Scope::set_column`].
pub struct Scope<'a> {
    table_name: &'static str,
    fields: &'static [FieldInfo],
    record: &'a mut dyn Target,
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("table_name", &self.table_name)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

/// A field of a scoped record together with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeField {
    /// Field metadata.
    pub info: &'static FieldInfo,
    /// Current value, NULL when the record does not report one.
    pub value: Value,
}

impl ScopeField {
    /// Whether the field currently holds its zero value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.is_blank()
    }
}

impl<'a> Scope<'a> {
    /// Resolve a scope over a record.
    pub fn new<M: Model>(record: &'a mut M) -> Self {
        Self {
            table_name: M::TABLE_NAME,
            fields: M::fields(),
            record,
        }
    }

    /// Table the record is written to.
    #[must_use]
    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    /// Field metadata of the record.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldInfo] {
        self.fields
    }

    /// The primary-key field with its current value.
    #[must_use]
    pub fn primary_field(&self) -> Option<ScopeField> {
        let info = self.fields.iter().find(|f| f.primary_key)?;
        Some(self.scope_field(info))
    }

    /// Look a field up by Rust name or column name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<ScopeField> {
        let info = self.find(name)?;
        Some(self.scope_field(info))
    }

    /// Whether the record has a writable column with this name.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.find(name).is_some_and(FieldInfo::is_writable)
    }

    /// Assign a value to a field, by Rust name or column name.
    pub fn set_column(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let info = self
            .find(name)
            .ok_or_else(|| Error::Shape(format!("{} has no field `{}`", self.table_name, name)))?;
        self.record.write_field(info.name, value.into())
    }

    fn find(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.matches(name))
    }

    fn scope_field(&self, info: &'static FieldInfo) -> ScopeField {
        ScopeField {
            info,
            value: self.record.read_field(info.name).unwrap_or(Value::Null),
        }
    }
}
