use dashboard_core::{ActivityDraft, ActivityEntry, ActivityLog, ACTIVITY_LOG_CAP};
use pretty_assertions::assert_eq;

fn entry(n: usize) -> ActivityEntry {
    ActivityDraft::new("•", &format!("event {n}"), format!("message {n}")).stamp("09:30")
}

#[test]
fn length_tracks_calls_until_cap() {
    let mut log = ActivityLog::new();
    for n in 1..=25 {
        log.record(entry(n));
        assert_eq!(log.len(), n.min(ACTIVITY_LOG_CAP));
    }
}

#[test]
fn newest_entry_comes_first_and_oldest_is_evicted() {
    let mut log = ActivityLog::new();
    for n in 1..=12 {
        log.record(entry(n));
    }

    let titles: Vec<_> = log.entries().iter().map(|e| e.title.clone()).collect();
    let expected: Vec<_> = (3..=12).rev().map(|n| format!("event {n}")).collect();
    assert_eq!(titles, expected);
}

#[test]
fn restoring_oversized_list_keeps_newest() {
    let stored: Vec<_> = (1..=14).map(entry).collect();
    let log = ActivityLog::from_entries(stored.clone());

    assert_eq!(log.len(), ACTIVITY_LOG_CAP);
    assert_eq!(log.entries(), &stored[..ACTIVITY_LOG_CAP]);
}

#[test]
fn stamp_keeps_draft_fields() {
    let entry = ActivityDraft::new("✅", "Analysis complete", "57 items").stamp("14:05");
    assert_eq!(
        entry,
        ActivityEntry {
            icon: "✅".to_string(),
            title: "Analysis complete".to_string(),
            message: "57 items".to_string(),
            time: "14:05".to_string(),
        }
    );
}
