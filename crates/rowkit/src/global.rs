//! One process-wide database, for applications that want a global handle.
//!
//! Installation happens at most once. Unlike a lazily created singleton, a
//! second install is reported as an error instead of replacing or aborting.

use std::any::Any;
use std::sync::OnceLock;

use rowkit_core::{Connection, Error, Result};
use rowkit_session::Database;

static GLOBAL_DATABASE: OnceLock<Box<dyn Any + Send + Sync>> = OnceLock::new();

/// Install `db` as the process-wide database and return it.
///
/// Fails with [`Error::Config`] if a database was already installed.
pub fn install<C>(db: Database<C>) -> Result<&'static Database<C>>
where
    C: Connection + Send + Sync + 'static,
{
    GLOBAL_DATABASE
        .set(Box::new(db))
        .map_err(|_| Error::Config("a global database is already installed".to_string()))?;
    tracing::info!(
        connection = std::any::type_name::<C>(),
        "Installed global database"
    );
    get::<C>().ok_or_else(|| Error::Config("global database has an unexpected type".to_string()))
}

/// The installed database, if one was installed with connection type `C`.
pub fn get<C>() -> Option<&'static Database<C>>
where
    C: Connection + 'static,
{
    let db: &'static (dyn Any + Send + Sync) = GLOBAL_DATABASE.get()?.as_ref();
    db.downcast_ref::<Database<C>>()
}

/// Whether a global database was installed.
pub fn is_installed() -> bool {
    GLOBAL_DATABASE.get().is_some()
}
