//! Exercises the pager and dispatcher against an in-memory journal, in
//! lieu of a full `journalctl`-style CLI (out of scope for this crate;
//! see `SPEC_FULL.md`'s Purpose & Scope).
//!
//! Run with `cargo run --example show -- <mode>`, where `<mode>` is one
//! of `short`, `verbose`, `export`, `json`, `json-pretty`, `json-sse`,
//! `cat`.

use sd_journal_show::id128::Id128;
use sd_journal_show::output::{OutputFlags, OutputMode};
use sd_journal_show::pager::{show_journal, CancellationToken, PagerOptions};
use sd_journal_show::reader::{Entry, MemoryJournalReader};

fn sample_reader() -> MemoryJournalReader {
    let boot = Id128::from_boot().unwrap_or_default();

    MemoryJournalReader::new(vec![
        Entry::new("s=1;i=1", 1_700_000_000_000_000, boot)
            .with_field("MESSAGE", "system starting up")
            .with_field("PRIORITY", "6")
            .with_field("_SYSTEMD_UNIT", "demo.service")
            .with_monotonic(1_000_000),
        Entry::new("s=1;i=2", 1_700_000_001_000_000, boot)
            .with_field("MESSAGE", "listening on :8080")
            .with_field("PRIORITY", "6")
            .with_field("_SYSTEMD_UNIT", "demo.service")
            .with_monotonic(2_000_000)
            .with_catalog("demo.service started handling requests"),
        Entry::new("s=1;i=3", 1_700_000_002_000_000, boot)
            .with_field("MESSAGE", "connection refused")
            .with_field("PRIORITY", "3")
            .with_field("_SYSTEMD_UNIT", "demo.service")
            .with_monotonic(3_000_000),
    ])
}

fn main() {
    let mode = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "short".to_string());
    let mode: OutputMode = mode.parse().unwrap_or(OutputMode::Short);

    let mut reader = sample_reader();
    let cancel = CancellationToken::new();
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();

    show_journal(
        &mut lock,
        &mut reader,
        PagerOptions {
            mode,
            n_columns: 0,
            not_before: 0,
            how_many: u64::MAX,
            flags: OutputFlags::CATALOG,
        },
        &cancel,
    )
    .expect("rendering the sample journal failed");
}
