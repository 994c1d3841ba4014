//! Property-based tests for the round-trip guarantees of the formatter
//!
//! Documents built from generated keys and values must survive formatting and
//! reparsing with their content, comments and order intact.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use toml_layout::{parse, to_string, Document, Value};

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn datetime() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        (-1.0e12f64..1.0e12).prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "\\PC{0,24}".prop_map(Value::from),
        "[\"\\\\\t\n\r a-z]{0,12}".prop_map(Value::from),
        datetime().prop_map(Value::from),
    ]
}

fn reparse(doc: &Document) -> Document {
    let text = to_string(doc);
    match parse(text.as_bytes()) {
        Ok(again) => again,
        Err(e) => panic!("formatted output failed to parse: {e}\n{text}"),
    }
}

fn entries() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map(key(), scalar(), 0..5)
}

/// A document with bare values, then a few tables with their own values.
fn document() -> impl Strategy<Value = Document> {
    let tables = prop::collection::btree_map(key(), entries(), 0..4);
    let note = proptest::option::of("[a-z]([a-z ]{0,10}[a-z])?");
    (entries(), tables, note).prop_map(|(bare, tables, note)| {
        let mut doc = Document::new();
        for (k, v) in bare {
            doc.set(&k, v).unwrap();
        }
        for (name, entries) in tables {
            let table = format!("T{name}");
            doc.declare_table(&table).unwrap();
            if let Some(note) = &note {
                doc.get_mut(&table).unwrap().comments.trailing = Some(format!("# {note}"));
            }
            for (k, v) in entries {
                doc.set(&format!("{table}.{k}"), v).unwrap();
            }
        }
        doc
    })
}

proptest! {
    #[test]
    fn prop_scalar_round_trip(k in key(), v in scalar()) {
        let mut doc = Document::new();
        doc.set(&k, v.clone()).unwrap();
        let again = reparse(&doc);
        let got = again.get(&k).unwrap();
        prop_assert_eq!(got.kind(), v.kind());
        prop_assert_eq!(got.to_literal(), v.to_literal());
    }

    #[test]
    fn prop_integer_arrays(k in key(), items in prop::collection::vec(any::<i64>(), 0..12)) {
        let mut doc = Document::new();
        for i in &items {
            doc.add(&k, *i).unwrap();
        }
        let again = reparse(&doc);
        let got = again.get(&k).and_then(|v| v.as_integers());
        if items.is_empty() {
            prop_assert!(got.is_none() || got == Some(Vec::new()));
        } else {
            prop_assert_eq!(got, Some(items));
        }
    }

    #[test]
    fn prop_format_is_idempotent(doc in document()) {
        let once = to_string(&doc);
        let twice = to_string(&reparse(&doc));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_reparse_keeps_content(doc in document()) {
        let again = reparse(&doc);
        prop_assert_eq!(again.len(), doc.len());
        for (path, item) in doc.iter() {
            let other = again.get(path).unwrap();
            prop_assert_eq!(other.kind(), item.kind());
            prop_assert_eq!(other.to_literal(), item.to_literal());
            prop_assert_eq!(&other.comments, &item.comments);
        }
    }

    #[test]
    fn prop_order_follows_the_text(doc in document()) {
        let again = reparse(&doc);
        let orders: Vec<u64> = again
            .ordered()
            .into_iter()
            .filter_map(|(_, item)| item.order())
            .collect();
        prop_assert!(orders.windows(2).all(|w| w[0] < w[1]));
    }
}
