//! Bulk insert behaviour against a recording executor.

use std::cell::RefCell;

use proptest::prelude::*;
use rowkit_core::{Error, Executor, FieldInfo, QueryErrorKind, Result, Value};
use rowkit_macros::Model;
use rowkit_query::{BulkInsert, bulk_insert};

#[derive(Model, Debug, Clone, Default)]
#[rowkit(table = "hero")]
struct Hero {
    #[rowkit(primary_key)]
    id: String,
    name: String,
    #[rowkit(default = "active")]
    status: String,
    age: i64,
    created_at: i64,
    #[rowkit(relationship)]
    powers: Vec<String>,
    #[rowkit(ignore)]
    scratch: String,
}

fn hero(name: &str, age: i64) -> Hero {
    Hero {
        name: name.to_string(),
        age,
        ..Hero::default()
    }
}

/// Records statements; optionally fails the n-th call.
#[derive(Default)]
struct RecordingExecutor {
    statements: RefCell<Vec<(String, Vec<Value>)>>,
    fail_on: Option<usize>,
}

impl RecordingExecutor {
    fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.statements.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut statements = self.statements.borrow_mut();
        if self.fail_on == Some(statements.len()) {
            return Err(Error::query(QueryErrorKind::Constraint, "duplicate key"));
        }
        statements.push((sql.to_string(), params.to_vec()));
        Ok(params.len() as u64 / 4)
    }
}

fn names_in(params: &[Value]) -> Vec<String> {
    // columns sort as age, created_at, name, status
    params
        .chunks(4)
        .map(|group| group[2].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn five_records_in_chunks_of_two() {
    let records: Vec<Hero> = ["a", "b", "c", "d", "e"]
        .iter()
        .enumerate()
        .map(|(i, name)| hero(name, i as i64))
        .collect();
    let exec = RecordingExecutor::default();

    let result = BulkInsert::new().chunk_size(2).execute(&exec, &records).unwrap();

    assert_eq!(result.chunks, 3);
    assert_eq!(result.rows, 5);
    assert_eq!(result.affected, 5);

    let statements = exec.statements();
    let sizes: Vec<usize> = statements.iter().map(|(_, p)| p.len() / 4).collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    let order: Vec<String> = statements.iter().flat_map(|(_, p)| names_in(p)).collect();
    assert_eq!(order, vec!["a", "b", "c", "d", "e"]);

    assert_eq!(
        statements[0].0,
        "INSERT INTO \"hero\" (\"age\", \"created_at\", \"name\", \"status\") \
         VALUES (?, ?, ?, ?), (?, ?, ?, ?)"
    );
}

#[test]
fn defaults_and_timestamps_are_bound() {
    let exec = RecordingExecutor::default();
    bulk_insert(&exec, &[hero("a", 1)], 10, false, &[]).unwrap();

    let (_, params) = &exec.statements()[0];
    assert!(matches!(params[1], Value::Timestamp(ts) if ts > 0));
    assert_eq!(params[3], Value::Text("active".into()));
}

#[test]
fn replace_and_exclusions() {
    let exec = RecordingExecutor::default();
    bulk_insert(&exec, &[hero("a", 1)], 10, true, &["age", "created_at"]).unwrap();

    let (sql, params) = &exec.statements()[0];
    assert_eq!(
        sql,
        "REPLACE INTO \"hero\" (\"name\", \"status\") VALUES (?, ?)"
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn empty_input_executes_nothing() {
    let exec = RecordingExecutor::default();
    let result = bulk_insert::<_, Hero>(&exec, &[], 10, false, &[]).unwrap();
    assert_eq!(result.chunks, 0);
    assert!(exec.statements().is_empty());
}

#[test]
fn zero_chunk_size_is_config_error() {
    let exec = RecordingExecutor::default();
    let err = bulk_insert(&exec, &[hero("a", 1)], 0, false, &[]).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(exec.statements().is_empty());
}

#[test]
fn first_failing_chunk_stops_the_run() {
    let records: Vec<Hero> = (0..5).map(|i| hero("x", i)).collect();
    let exec = RecordingExecutor::failing_on(1);

    let err = bulk_insert(&exec, &records, 2, false, &[]).unwrap_err();

    let Error::Query(q) = err else {
        panic!("expected the driver error");
    };
    assert_eq!(q.kind, QueryErrorKind::Constraint);
    assert!(q.sql.as_deref().is_some_and(|sql| sql.starts_with("INSERT INTO")));
    assert_eq!(exec.statements().len(), 1);
}

/// A record whose optional column is only reported when set.
#[derive(Debug, Clone)]
struct Sparse {
    name: String,
    nickname: Option<String>,
}

impl rowkit_core::Model for Sparse {
    const TABLE_NAME: &'static str = "sparse";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: [FieldInfo; 2] = [
            FieldInfo::new("name", "name"),
            FieldInfo::new("nickname", "nickname"),
        ];
        &FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        let mut row = vec![("name", Value::from(self.name.clone()))];
        if let Some(nick) = &self.nickname {
            row.push(("nickname", Value::from(nick.clone())));
        }
        row
    }

    fn set_value(&mut self, _field: &str, _value: Value) -> Result<()> {
        Ok(())
    }
}

#[test]
fn inconsistent_chunk_is_rejected_before_execution() {
    let records = vec![
        Sparse {
            name: "a".into(),
            nickname: Some("aa".into()),
        },
        Sparse {
            name: "b".into(),
            nickname: Some("bb".into()),
        },
        Sparse {
            name: "c".into(),
            nickname: Some("cc".into()),
        },
        Sparse {
            name: "d".into(),
            nickname: None,
        },
    ];
    let exec = RecordingExecutor::default();

    let err = bulk_insert(&exec, &records, 2, false, &[]).unwrap_err();

    assert!(matches!(
        err,
        Error::Consistency {
            expected: 2,
            found: 1
        }
    ));
    // the first chunk was consistent and already ran
    assert_eq!(exec.statements().len(), 1);
    assert!(err.to_string().contains("attribute sizes are inconsistent"));
}

proptest! {
    #[test]
    fn chunks_partition_the_input(count in 0usize..60, chunk_size in 1usize..17) {
        let records: Vec<Hero> = (0..count).map(|i| hero(&format!("h{i}"), i as i64)).collect();
        let exec = RecordingExecutor::default();

        let result = bulk_insert(&exec, &records, chunk_size, false, &[]).unwrap();
        let statements = exec.statements();

        prop_assert_eq!(result.rows, count);
        prop_assert_eq!(statements.len(), count.div_ceil(chunk_size));
        prop_assert!(statements.iter().all(|(_, p)| p.len() / 4 <= chunk_size));

        let order: Vec<String> = statements.iter().flat_map(|(_, p)| names_in(p)).collect();
        let expected: Vec<String> = (0..count).map(|i| format!("h{i}")).collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn placeholders_match_params(count in 1usize..40) {
        let records: Vec<Hero> = (0..count).map(|i| hero("p", i as i64)).collect();
        let exec = RecordingExecutor::default();

        bulk_insert(&exec, &records, 1000, false, &[]).unwrap();
        let (sql, params) = &exec.statements()[0];

        prop_assert_eq!(sql.matches('?').count(), params.len());
        prop_assert_eq!(params.len(), count * 4);
        prop_assert_eq!(sql.matches("(?, ?, ?, ?)").count(), count);
    }
}
