use pretty_assertions::assert_eq;
use wager_core::{HarvestState, Record, RecordId};

fn record(event: &str, result: &str) -> Record {
    let mut record = Record::new("DraftKings");
    record.event = event.to_string();
    record.result = result.to_string();
    record.raw_notes = format!("{event} | {result}");
    record
}

#[test]
fn repeated_id_overwrites_but_keeps_first_seen_position() {
    let mut state = HarvestState::new();
    assert!(state.merge(RecordId::new("b"), record("B", "")));
    assert!(state.merge(RecordId::new("a"), record("A", "")));
    assert!(!state.merge(RecordId::new("b"), record("B", "Won")));

    assert_eq!(state.len(), 2);
    let records = state.records();
    assert_eq!(records[0].event, "B");
    assert_eq!(records[0].result, "Won");
    assert_eq!(records[1].event, "A");
}

#[test]
fn many_passes_over_same_ids_keep_last_values() {
    let mut state = HarvestState::new();
    for pass in 0..5 {
        for id in ["1", "2", "3"] {
            state.merge(RecordId::from(id), record(id, &format!("pass {pass}")));
        }
    }
    let records = state.into_records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.result == "pass 4"));
}

#[test]
fn take_and_clear_leave_state_empty() {
    let mut state = HarvestState::new();
    state.merge(RecordId::new("x"), record("X", "Lost"));
    assert!(state.contains(&RecordId::new("x")));

    let drained = state.take_records();
    assert_eq!(drained.len(), 1);
    assert!(state.is_empty());

    state.merge(RecordId::new("y"), record("Y", "Lost"));
    state.clear();
    assert!(state.is_empty());
    assert!(state.records().is_empty());
}
