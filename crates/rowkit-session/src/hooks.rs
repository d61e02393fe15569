//! Hooks run on every record before `Database::create` inserts it.
//!
//! A hook is a plain closure over the record's [`Scope`]. Hooks cannot fail
//! the create: a hook that cannot set a field logs a warning and moves on.

use std::fmt;

use rowkit_core::{Scope, Value, new_id};

use crate::config::HookConventions;

/// Name of the built-in identifier hook.
pub const ASSIGN_IDENTIFIER: &str = "rowkit:assign_identifier";
/// Name of the built-in timestamp hook.
pub const STAMP_TIMESTAMPS: &str = "rowkit:stamp_timestamps";

/// A boxed create hook.
pub type CreateHook = Box<dyn Fn(&mut Scope<'_>) + Send + Sync>;

/// Named create hooks, run in registration order.
#[derive(Default)]
pub struct CreateHooks {
    hooks: Vec<(String, CreateHook)>,
}

impl fmt::Debug for CreateHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateHooks")
            .field("hooks", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl CreateHooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in hooks: identifier assignment, then timestamps.
    pub fn with_defaults(conventions: &HookConventions) -> Self {
        let mut hooks = Self::new();
        hooks
            .register(ASSIGN_IDENTIFIER, identifier_hook(conventions.clone()))
            .register(STAMP_TIMESTAMPS, timestamp_hook());
        hooks
    }

    /// Append a hook, replacing any hook already registered under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: Fn(&mut Scope<'_>) + Send + Sync + 'static,
    {
        let name = name.into();
        self.hooks.retain(|(existing, _)| *existing != name);
        self.hooks.push((name, Box::new(hook)));
        self
    }

    /// Remove a hook by name. Returns whether one was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(existing, _)| existing != name);
        self.hooks.len() != before
    }

    /// Registered hook names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook against one record.
    pub fn run(&self, scope: &mut Scope<'_>) {
        for (name, hook) in &self.hooks {
            tracing::trace!(hook = %name, table = scope.table_name(), "Running create hook");
            hook(&mut *scope);
        }
    }
}

/// Assign client-side identifiers before create.
///
/// On ordinary tables, a blank primary key named like
/// `conventions.id_field` gets a fresh ULID; a key that is already set is
/// left alone. On soft-delete marker tables (name ends with
/// `conventions.soft_delete_suffix`) no id is generated; the
/// `conventions.deleted_at_field` field, if present, is stamped with the
/// current time instead.
pub fn identifier_hook(
    conventions: HookConventions,
) -> impl Fn(&mut Scope<'_>) + Send + Sync + 'static {
    move |scope: &mut Scope<'_>| {
        if conventions.is_marker_table(scope.table_name()) {
            let field = conventions.deleted_at_field.as_str();
            if scope.has_column(field) {
                set_or_warn(scope, field, Value::now());
            }
            return;
        }

        let Some(pk) = scope.primary_field() else {
            return;
        };
        if pk.info.matches(&conventions.id_field) && pk.is_blank() {
            set_or_warn(scope, pk.info.name, Value::Text(new_id()));
        }
    }
}

/// Stamp blank auto-timestamp fields with the current time.
pub fn timestamp_hook() -> impl Fn(&mut Scope<'_>) + Send + Sync + 'static {
    |scope: &mut Scope<'_>| {
        let now = Value::now();
        for field in scope.fields() {
            if !field.is_writable() || !field.is_auto_timestamp() {
                continue;
            }
            if scope.field(field.name).is_some_and(|f| f.is_blank()) {
                set_or_warn(scope, field.name, now.clone());
            }
        }
    }
}

fn set_or_warn(scope: &mut Scope<'_>, field: &str, value: Value) {
    if let Err(err) = scope.set_column(field, value) {
        tracing::warn!(
            table = scope.table_name(),
            field,
            error = %err,
            "Create hook could not set field"
        );
    }
}
