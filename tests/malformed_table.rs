//! Tables from outside implementations that break the `Table` contract.
use rstest::rstest;
use scitypes_core::analysis::{build_schema, Classifier};
use scitypes_core::autotype::{AutoTyper, Rule};
use scitypes_core::coercion::{Coercer, TagMap};
use scitypes_core::convention::ConventionRegistry;
use scitypes_core::store::{Column, Table, Value};
use scitypes_core::{Result, ScitypeError, Tag};
use std::collections::HashMap;

/// A map-backed table that trusts whatever it is given.
struct LooseTable {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    nrows: usize,
}

impl LooseTable {
    fn new(names: &[&str], columns: Vec<(&str, Vec<Value>)>, nrows: usize) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            columns: columns
                .into_iter()
                .map(|(n, values)| (n.to_string(), Column::new(values)))
                .collect(),
            nrows,
        }
    }
}

impl Table for LooseTable {
    fn column_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    fn nrows(&self) -> usize {
        self.nrows
    }

    fn rebuild(&self, columns: Vec<(String, Column)>) -> Result<Self> {
        Ok(Self {
            names: columns.iter().map(|(n, _)| n.clone()).collect(),
            columns: columns.into_iter().collect(),
            nrows: self.nrows,
        })
    }
}

fn listed_but_absent() -> LooseTable {
    LooseTable::new(&["a", "ghost"], vec![("a", vec![Value::Int(1), Value::Int(2)])], 2)
}

fn ragged() -> LooseTable {
    LooseTable::new(
        &["a", "b"],
        vec![
            ("a", vec![Value::Int(1), Value::Int(2)]),
            ("b", vec![Value::Float(0.5)]),
        ],
        2,
    )
}

fn well_formed() -> LooseTable {
    LooseTable::new(
        &["a", "b"],
        vec![
            ("a", vec![Value::Int(1), Value::Int(2)]),
            ("b", vec![Value::Float(0.5), Value::Missing]),
        ],
        2,
    )
}

fn to_continuous(name: &str) -> TagMap {
    [(name.to_string(), Tag::Continuous)].into_iter().collect()
}

#[rstest]
#[case::listed_but_absent(listed_but_absent())]
#[case::ragged(ragged())]
fn malformed_table_classifies_as_unknown(#[case] table: LooseTable) {
    let classifier = Classifier::new(&ConventionRegistry::new());
    assert_eq!(classifier.classify_table(&table), Tag::Unknown);
}

#[rstest]
#[case::listed_but_absent(listed_but_absent())]
#[case::ragged(ragged())]
fn malformed_table_is_rejected_by_table_operations(#[case] table: LooseTable) {
    let registry = ConventionRegistry::new();

    assert!(matches!(build_schema(&table, &registry), Err(ScitypeError::NotATable(_))));
    assert!(matches!(
        Coercer::new(&registry).coerce_table(&table, &to_continuous("a")),
        Err(ScitypeError::NotATable(_))
    ));
    assert!(matches!(
        AutoTyper::new(&registry).run(&table, &[Rule::FewToFinite], false),
        Err(ScitypeError::NotATable(_))
    ));
}

#[test]
fn well_formed_outside_table_goes_through_the_default_paths() {
    let registry = ConventionRegistry::new();
    let table = well_formed();

    let schema = build_schema(&table, &registry).unwrap();
    assert_eq!(schema.names(), vec!["a", "b"]);
    assert_eq!(
        Classifier::new(&registry).classify_table(&table),
        Tag::table_of([Tag::Count, Tag::union([Tag::Missing, Tag::Continuous])])
    );

    let out = Coercer::new(&registry).coerce_table(&table, &to_continuous("a")).unwrap();
    assert_eq!(out.column("a").unwrap().values(), &[Value::Float(1.0), Value::Float(2.0)]);
    assert_eq!(out.column_names(), vec!["a", "b"]);
}
