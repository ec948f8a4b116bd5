//! Tracer tests
//!
//! History ordering, trace window extraction and the history text encoding.

use rbiam::models::EntryKind;
use rbiam::{HistoryEntry, Tracer};

fn keys(entries: &[HistoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.key.as_str()).collect()
}

#[test]
fn test_window_is_newest_first_and_ignores_earlier_history() {
    let mut tracer = Tracer::new();
    tracer.record_selection(EntryKind::Role, "arn:aws:iam::1:role/old");
    tracer.record_selection(EntryKind::Pod, "ns0:old-pod");

    tracer.start_trace();
    tracer.record_selection(EntryKind::Pod, "A");
    tracer.record_selection(EntryKind::ServiceAccount, "B");
    tracer.record_selection(EntryKind::Secret, "C");

    let window = tracer.stop_trace_and_extract();
    assert_eq!(keys(&window), vec!["C", "B", "A"]);
    assert_eq!(window[0].kind, EntryKind::Secret);
    assert!(!tracer.is_tracing());
    assert_eq!(tracer.history().len(), 5);
}

#[test]
fn test_repeated_extraction_returns_the_same_window() {
    let mut tracer = Tracer::new();
    tracer.start_trace();
    tracer.record_selection(EntryKind::Pod, "ns1:a");
    tracer.record_selection(EntryKind::Pod, "ns1:b");

    let first = tracer.stop_trace_and_extract();
    let second = tracer.stop_trace_and_extract();
    assert_eq!(first, second);
    assert_eq!(tracer.window_count(), 2);
}

#[test]
fn test_selections_after_stop_do_not_extend_the_window() {
    let mut tracer = Tracer::new();
    tracer.start_trace();
    tracer.record_selection(EntryKind::Pod, "ns1:a");
    tracer.stop_trace_and_extract();

    tracer.record_selection(EntryKind::Pod, "ns1:b");
    assert_eq!(tracer.window_count(), 1);
    assert_eq!(tracer.history()[0].key, "ns1:b");
}

#[test]
fn test_new_trace_starts_an_empty_window() {
    let mut tracer = Tracer::new();
    tracer.start_trace();
    tracer.record_selection(EntryKind::Pod, "ns1:a");
    tracer.start_trace();

    assert!(tracer.stop_trace_and_extract().is_empty());
    assert_eq!(tracer.history().len(), 1);
}

#[test]
fn test_extracting_without_a_trace_is_empty() {
    let mut tracer = Tracer::new();
    tracer.record_selection(EntryKind::Policy, "arn:aws:iam::aws:policy/ReadOnly");
    assert!(tracer.stop_trace_and_extract().is_empty());
}

#[test]
fn test_history_encoding() {
    let entry = HistoryEntry::new(EntryKind::ServiceAccount, "default:s3-echoer");
    assert_eq!(
        entry.to_string(),
        "[Kubernetes service account] default:s3-echoer"
    );

    let parsed: HistoryEntry = "[Kubernetes pod] kube-system:coredns-5d8f".parse().unwrap();
    assert_eq!(parsed, HistoryEntry::new(EntryKind::Pod, "kube-system:coredns-5d8f"));
}
