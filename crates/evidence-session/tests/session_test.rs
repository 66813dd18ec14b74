use std::sync::Arc;
use std::thread;

use evidence_core::types::{AnalysisRequest, Evidence, MethodKind, ObservationSet};
use evidence_session::SessionStore;
use proptest::prelude::*;

fn evidence(tag: &str) -> Evidence {
    Evidence::builder(MethodKind::Descriptive, "Descriptive statistics")
        .variables([tag])
        .build(format!("summary of {tag}"))
}

fn request(tag: &str) -> AnalysisRequest {
    AnalysisRequest::with_data(ObservationSet::new().with(tag, [1.0, 2.0]))
}

// ── T1-SESS-01: Lazy creation and ordered history ─────────────────────────

#[test]
fn append_creates_session_lazily() {
    let store = SessionStore::new();
    assert_eq!(store.session_count(), 0);
    assert!(store.get_all("s1").is_empty());
    // Reading an unknown session does not create it.
    assert_eq!(store.session_count(), 0);

    assert_eq!(store.append("s1", request("a"), evidence("a")), 1);
    assert_eq!(store.append("s1", request("b"), evidence("b")), 2);
    assert_eq!(store.session_count(), 1);

    let records = store.get_all("s1");
    assert_eq!(records[0].evidence.variables, vec!["a"]);
    assert_eq!(records[1].evidence.variables, vec!["b"]);
    assert!(records[0].recorded_at <= records[1].recorded_at);
}

// ── T1-SESS-02: Session ids are independent namespaces ───────────────────

#[test]
fn sessions_are_isolated() {
    let store = SessionStore::new();
    store.append("alpha", request("a"), evidence("a"));
    store.append("beta", request("b"), evidence("b"));
    store.append("beta", request("c"), evidence("c"));

    assert_eq!(store.len("alpha"), 1);
    assert_eq!(store.len("beta"), 2);

    let mut ids = store.session_ids();
    ids.sort();
    assert_eq!(ids, vec!["alpha", "beta"]);
}

// ── T1-SESS-03: Reset clears one session only ─────────────────────────────

#[test]
fn reset_clears_history() {
    let store = SessionStore::new();
    store.append("s", request("a"), evidence("a"));
    store.append("s", request("b"), evidence("b"));
    store.append("other", request("c"), evidence("c"));

    assert_eq!(store.reset("s"), 2);
    assert!(store.is_empty("s"));
    assert_eq!(store.len("other"), 1);
    assert_eq!(store.reset("never-seen"), 0);

    // A reset session starts fresh on the next append.
    store.append("s", request("d"), evidence("d"));
    assert_eq!(store.evidence("s")[0].variables, vec!["d"]);
}

#[test]
fn session_timestamps_track_activity() {
    let store = SessionStore::new();
    store.append("s", request("a"), evidence("a"));
    let first = store.get_session("s").unwrap();
    store.append("s", request("b"), evidence("b"));
    let second = store.get_session("s").unwrap();

    assert_eq!(first.created_at, second.created_at);
    assert!(second.last_activity >= first.last_activity);
}

// ── T1-SESS-04: Concurrent appends never lose or interleave records ──────

#[test]
fn concurrent_appends_are_atomic() {
    let store = Arc::new(SessionStore::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    let tag = format!("t{t}-{i}");
                    store.append("shared", request(&tag), evidence(&tag));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let records = store.get_all("shared");
    assert_eq!(records.len(), 200);
    // Each thread's records keep their relative order.
    for t in 0..8 {
        let prefix = format!("t{t}-");
        let seq: Vec<usize> = records
            .iter()
            .filter_map(|r| r.evidence.variables[0].strip_prefix(&prefix))
            .map(|i| i.parse().unwrap())
            .collect();
        assert_eq!(seq, (0..25).collect::<Vec<_>>());
    }
}

// ── T1-SESS-05: A batch append is seen whole or not at all ──────────────

#[test]
fn append_many_is_never_seen_partially() {
    const BATCH: usize = 10;
    let store = Arc::new(SessionStore::new());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for b in 0..20 {
                    let records = (0..BATCH)
                        .map(|i| {
                            let tag = format!("t{t}-b{b}-{i}");
                            (request(&tag), evidence(&tag))
                        })
                        .collect();
                    store.append_many("batched", records);
                }
            })
        })
        .collect();
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..500 {
                let records = store.get_all("batched");
                assert_eq!(records.len() % BATCH, 0, "partial batch visible");
                for block in records.chunks(BATCH) {
                    let first = &block[0].evidence.variables[0];
                    let prefix = &first[..first.rfind('-').unwrap()];
                    assert!(block
                        .iter()
                        .all(|r| r.evidence.variables[0].starts_with(prefix)));
                }
            }
        })
    };
    for h in writers {
        h.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(store.len("batched"), 4 * 20 * BATCH);
}

#[test]
fn append_many_returns_new_length() {
    let store = SessionStore::new();
    store.append("s", request("a"), evidence("a"));
    let len = store.append_many("s", vec![(request("b"), evidence("b")), (request("c"), evidence("c"))]);
    assert_eq!(len, 3);
    let tags: Vec<String> = store
        .evidence("s")
        .into_iter()
        .map(|e| e.variables[0].clone())
        .collect();
    assert_eq!(tags, vec!["a", "b", "c"]);
}

#[test]
fn cloned_store_shares_state() {
    let store = SessionStore::new();
    let handle = store.clone();
    handle.append("s", request("a"), evidence("a"));
    assert_eq!(store.len("s"), 1);
}

#[test]
fn record_serializes() {
    let store = SessionStore::new();
    store.append("s", request("x"), evidence("x"));
    let json = serde_json::to_value(store.get_all("s")).unwrap();
    assert_eq!(json[0]["evidence"]["method"], "descriptive_analysis");
    assert_eq!(json[0]["request"]["data"]["x"][1], 2.0);
}

proptest! {
    /// Appending N results then reading returns N entries in call order.
    #[test]
    fn prop_append_round_trip(n in 0usize..40) {
        let store = SessionStore::new();
        for i in 0..n {
            let tag = format!("v{i}");
            store.append("p", request(&tag), evidence(&tag));
        }
        let records = store.get_all("p");
        prop_assert_eq!(records.len(), n);
        for (i, record) in records.iter().enumerate() {
            let expected = format!("v{i}");
            prop_assert_eq!(&record.evidence.variables[0], &expected);
        }
    }
}
