//! Expanded `#[derive(Model)]` code compiled against rowkit-core.

use rowkit_core::{Error, Model, Scope, Value};
use rowkit_macros::Model;

#[derive(Model, Debug, Default)]
#[rowkit(table = "stats")]
struct Stat {
    #[rowkit(primary_key)]
    id: String,
    ratio: f32,
    level: i16,
    tier: i8,
    wins: u8,
    losses: u16,
    score: u32,
    #[rowkit(column = "hero_name", default = "anonymous")]
    name: String,
    #[rowkit(ignore)]
    cache: Vec<String>,
}

#[test]
fn narrow_and_unsigned_fields_round_trip_through_set_value() {
    let mut stat = Stat::default();
    stat.set_value("ratio", Value::from(0.5_f32)).unwrap();
    stat.set_value("level", Value::BigInt(-300)).unwrap();
    stat.set_value("tier", Value::Int(7)).unwrap();
    stat.set_value("wins", Value::from(250_u8)).unwrap();
    stat.set_value("losses", Value::from(60_000_u16)).unwrap();
    stat.set_value("score", Value::from(u32::MAX)).unwrap();

    assert_eq!(stat.ratio, 0.5);
    assert_eq!(stat.level, -300);
    assert_eq!(stat.tier, 7);
    assert_eq!(stat.wins, 250);
    assert_eq!(stat.losses, 60_000);
    assert_eq!(stat.score, u32::MAX);

    let row = stat.to_row();
    assert!(row.contains(&("score", Value::BigInt(i64::from(u32::MAX)))));
    assert!(row.contains(&("wins", Value::SmallInt(250))));
}

#[test]
fn out_of_range_values_are_shape_errors() {
    let mut stat = Stat::default();
    let err = stat.set_value("tier", Value::Int(1000)).unwrap_err();
    assert!(matches!(err, Error::Shape(_)));
    assert!(stat.set_value("wins", Value::Int(-1)).is_err());
    assert!(stat.set_value("cache", Value::Null).is_err());
}

#[test]
fn generated_metadata_matches_attributes() {
    assert_eq!(Stat::TABLE_NAME, "stats");
    assert_eq!(Stat::fields().len(), 9);
    assert_eq!(Stat::primary_key_field().map(|f| f.name), Some("id"));

    let name = Stat::field("hero_name").unwrap();
    assert_eq!(name.name, "name");
    assert_eq!(name.default, Some("anonymous"));
    assert!(name.has_default);

    assert!(!Stat::field("cache").unwrap().is_writable());
    assert!(Stat::default().to_row().iter().all(|(n, _)| *n != "cache"));
}

#[test]
fn scope_assigns_through_generated_set_value() {
    let mut stat = Stat::default();
    let mut scope = Scope::new(&mut stat);
    assert!(scope.primary_field().unwrap().is_blank());
    scope.set_column("hero_name", "Deadpond").unwrap();
    scope.set_column("id", "01J00000000000000000000000").unwrap();
    drop(scope);

    assert_eq!(stat.name, "Deadpond");
    assert_eq!(stat.id.len(), 26);
}
