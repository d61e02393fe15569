//! Field and column metadata.

/// Field names that are always treated as auto-maintained timestamps.
pub const AUTO_TIMESTAMP_FIELDS: &[&str] = &["created_at", "updated_at"];

/// Metadata about a model field/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Database column name (may differ from field name)
    pub column_name: &'static str,
    /// Whether this is a primary key
    pub primary_key: bool,
    /// Whether this field holds related records rather than a column.
    ///
    /// Relationship fields never appear in INSERT statements.
    pub relationship: bool,
    /// Whether this field is skipped by every database write.
    pub ignored: bool,
    /// Whether the column has a default applied when the field is blank.
    pub has_default: bool,
    /// Default value literal, bound as text when the field is blank.
    pub default: Option<&'static str>,
    /// Whether the field is stamped with the current time on every insert.
    pub auto_timestamp: bool,
}

impl FieldInfo {
    /// Create a new field info with minimal required data.
    pub const fn new(name: &'static str, column_name: &'static str) -> Self {
        Self {
            name,
            column_name,
            primary_key: false,
            relationship: false,
            ignored: false,
            has_default: false,
            default: None,
            auto_timestamp: false,
        }
    }

    /// Set the database column name.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = name;
        self
    }

    /// Set primary key flag.
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Mark this field as a relationship to another table.
    pub const fn relationship(mut self, value: bool) -> Self {
        self.relationship = value;
        self
    }

    /// Mark this field as ignored for database writes.
    pub const fn ignored(mut self, value: bool) -> Self {
        self.ignored = value;
        self
    }

    /// Set default value literal.
    ///
    /// Also marks the field as having a default.
    pub const fn default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self.has_default = true;
        self
    }

    /// Set default value literal from optional.
    pub const fn default_opt(mut self, literal: Option<&'static str>) -> Self {
        self.default = literal;
        if literal.is_some() {
            self.has_default = true;
        }
        self
    }

    /// Mark whether the column has a default, with or without a literal.
    ///
    /// A field with a default but no literal keeps its own (blank) value.
    pub const fn has_default(mut self, value: bool) -> Self {
        self.has_default = value;
        self
    }

    /// Mark this field as an auto-maintained timestamp.
    pub const fn auto_timestamp(mut self, value: bool) -> Self {
        self.auto_timestamp = value;
        self
    }

    /// Whether inserts should stamp this field with the current time.
    ///
    /// True for flagged fields and for the conventional `created_at` /
    /// `updated_at` names.
    #[must_use]
    pub fn is_auto_timestamp(&self) -> bool {
        self.auto_timestamp || AUTO_TIMESTAMP_FIELDS.contains(&self.name)
    }

    /// Whether this field maps to a real column that can be written.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !self.relationship && !self.ignored
    }

    /// Whether `name` refers to this field by Rust name or column name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.column_name == name
    }
}
