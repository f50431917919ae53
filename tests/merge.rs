use serde_json::{Map, Value, json};

use arxiv_ingest::domain::{Record, parse_arxiv_url};
use arxiv_ingest::merge::{MergeOutcome, MergeTally, merge_record};
use arxiv_ingest::store::PaperStore;

fn record(url: &str, fields: Value) -> Record {
    let mut map: Map<String, Value> = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert("id".to_string(), json!(url));
    Record::new(parse_arxiv_url(url).unwrap(), map)
}

#[test]
fn merge_inserts_unseen_paper() {
    let mut store = PaperStore::new();
    let outcome = merge_record(
        &mut store,
        record("http://arxiv.org/abs/1512.03385v1", json!({ "title": "ResNet" })),
    );
    assert_eq!(outcome, MergeOutcome::Inserted);
    assert_eq!(store.len(), 1);
    assert!(store.contains("1512.03385"));
}

#[test]
fn merge_same_version_is_idempotent() {
    let mut store = PaperStore::new();
    let first = record("http://arxiv.org/abs/1512.03385v2", json!({ "title": "ResNet" }));
    merge_record(&mut store, first.clone());
    let before = store.clone();

    let outcome = merge_record(&mut store, first);
    assert_eq!(outcome, MergeOutcome::AlreadyPresent);
    assert_eq!(store, before);

    let outcome = merge_record(
        &mut store,
        record("http://arxiv.org/abs/1512.03385v1", json!({ "title": "Old" })),
    );
    assert_eq!(outcome, MergeOutcome::AlreadyPresent);
    assert_eq!(store.get("1512.03385").unwrap().version, 2);
    assert_eq!(store.get("1512.03385").unwrap().title(), Some("ResNet"));
}

#[test]
fn merge_newer_version_replaces_whole_record() {
    let mut store = PaperStore::new();
    merge_record(
        &mut store,
        record(
            "http://arxiv.org/abs/1512.08756v1",
            json!({ "title": "Draft", "arxiv_comment": "workshop" }),
        ),
    );
    let outcome = merge_record(
        &mut store,
        record(
            "http://arxiv.org/abs/1512.08756v2",
            json!({ "title": "Final", "arxiv_journal_ref": "ICLR" }),
        ),
    );

    assert_eq!(outcome, MergeOutcome::Replaced { previous_version: 1 });
    assert_eq!(store.len(), 1);
    let stored = store.get("1512.08756").unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.title(), Some("Final"));
    assert_eq!(stored.field("arxiv_journal_ref"), Some(&json!("ICLR")));
    assert!(stored.field("arxiv_comment").is_none());
}

#[test]
fn tally_counts_added_and_skipped() {
    let mut tally = MergeTally::default();
    tally.record(MergeOutcome::Inserted);
    tally.record(MergeOutcome::Replaced { previous_version: 3 });
    tally.record(MergeOutcome::AlreadyPresent);
    assert_eq!(tally.added, 2);
    assert_eq!(tally.skipped, 1);
}
