mod common;

use common::MockConnection;
use rowkit::prelude::*;
use rowkit::global;

#[test]
fn global_database_is_installed_only_once_per_process() {
    let first = Database::new(DatabaseConfig::new("sqlite3://first.db"), MockConnection::new())
        .unwrap();
    let installed = global::install(first).unwrap();
    assert!(global::is_installed());

    let got = global::get::<MockConnection>().expect("expected global database to be set");
    assert!(std::ptr::eq(installed, got));

    // Subsequent installs are rejected and leave the first in place.
    let second = Database::new(DatabaseConfig::new("mysql://second"), MockConnection::new())
        .unwrap();
    assert!(matches!(global::install(second), Err(Error::Config(_))));

    let got = global::get::<MockConnection>().expect("expected global database to remain set");
    assert_eq!(got.config().dsn, "sqlite3://first.db");
}
