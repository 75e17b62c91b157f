use sd_journal_show::id128::Id128;
use sd_journal_show::matches::{add_match_this_boot, add_matches_for_unit};
use sd_journal_show::output::{OutputFlags, OutputMode};
use sd_journal_show::pager::{show_journal, CancellationToken, PagerOptions};
use sd_journal_show::reader::{Entry, MemoryJournalReader};

use pretty_assertions::assert_eq;

fn three_entry_journal() -> MemoryJournalReader {
    let boot = Id128::from([9; 16]);
    MemoryJournalReader::new(vec![
        Entry::new("c-1", 1_000_000, boot)
            .with_field("MESSAGE", "first")
            .with_field("_SYSTEMD_UNIT", "demo.service")
            .with_monotonic(10),
        Entry::new("c-2", 2_000_000, boot)
            .with_field("MESSAGE", "second")
            .with_field("_SYSTEMD_UNIT", "demo.service")
            .with_monotonic(20),
        Entry::new("c-3", 3_000_000, boot)
            .with_field("MESSAGE", "third")
            .with_field("_SYSTEMD_UNIT", "other.service")
            .with_monotonic(30),
    ])
}

#[test]
fn cat_mode_renders_messages_in_order() {
    let mut reader = three_entry_journal();
    let cancel = CancellationToken::new();
    let mut out = Vec::new();

    let lines = show_journal(
        &mut out,
        &mut reader,
        PagerOptions {
            mode: OutputMode::Cat,
            n_columns: 80,
            not_before: 0,
            how_many: u64::MAX,
            flags: OutputFlags::empty(),
        },
        &cancel,
    )
    .unwrap();

    assert_eq!(lines, 3);
    assert_eq!(out, b"first\nsecond\nthird\n");
}

#[test]
fn how_many_limits_to_tail_entries() {
    let mut reader = three_entry_journal();
    let cancel = CancellationToken::new();
    let mut out = Vec::new();

    let lines = show_journal(
        &mut out,
        &mut reader,
        PagerOptions {
            mode: OutputMode::Cat,
            n_columns: 80,
            not_before: 0,
            how_many: 2,
            flags: OutputFlags::empty(),
        },
        &cancel,
    )
    .unwrap();

    assert_eq!(lines, 2);
    assert_eq!(out, b"second\nthird\n");
}

#[test]
fn json_mode_emits_one_well_formed_object_per_entry() {
    let mut reader = three_entry_journal();
    let cancel = CancellationToken::new();
    let mut out = Vec::new();

    show_journal(
        &mut out,
        &mut reader,
        PagerOptions {
            mode: OutputMode::Json,
            n_columns: 80,
            not_before: 0,
            how_many: u64::MAX,
            flags: OutputFlags::empty(),
        },
        &cancel,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);

    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).expect("valid JSON per line");
        assert!(value.get("__CURSOR").is_some());
        assert!(value.get("MESSAGE").is_some());
    }
}

#[test]
fn export_mode_frames_each_entry_with_a_trailing_blank_line() {
    let mut reader = three_entry_journal();
    let cancel = CancellationToken::new();
    let mut out = Vec::new();

    show_journal(
        &mut out,
        &mut reader,
        PagerOptions {
            mode: OutputMode::Export,
            n_columns: 80,
            not_before: 0,
            how_many: u64::MAX,
            flags: OutputFlags::empty(),
        },
        &cancel,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let entries: Vec<&str> = text.split("\n\n").filter(|s| !s.is_empty()).collect();
    assert_eq!(entries.len(), 3);
    for entry in entries {
        assert!(entry.starts_with("__CURSOR="));
    }
}

#[test]
fn unit_match_then_boot_filter_is_recorded_in_strict_order() {
    let mut reader = MemoryJournalReader::default();
    add_matches_for_unit(&mut reader, "demo.service").unwrap();
    add_match_this_boot(&mut reader).unwrap();

    // 11 match ops for the unit predicate plus boot-id match + conjunction.
    assert_eq!(reader.recorded_matches().len(), 13);
}

#[test]
fn cancellation_token_stops_a_running_pager() {
    let mut reader = three_entry_journal();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut out = Vec::new();

    let lines = show_journal(
        &mut out,
        &mut reader,
        PagerOptions {
            mode: OutputMode::Cat,
            n_columns: 80,
            not_before: 0,
            how_many: u64::MAX,
            flags: OutputFlags::empty(),
        },
        &cancel,
    )
    .unwrap();

    assert_eq!(lines, 0);
}
