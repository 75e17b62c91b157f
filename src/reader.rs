//! The journal reader interface (component H).
//!
//! The real journal store — random access, cursors, match compilation,
//! blocking wait for new entries — is out of scope for this crate (spec
//! §1); it is modeled here purely as a trait so the renderer, pager and
//! match builder have something concrete to compile against. A reference
//! in-memory implementation, [`MemoryJournalReader`], backs this crate's
//! own tests and the `demos/show` binary.

use crate::errors::{SdError, TimestampError};
use crate::id128::Id128;
use std::time::Duration;

/// A single journal entry, in the store's native representation: an
/// ordered list of raw `NAME=value` byte buffers, plus the metadata the
/// store tracks out-of-band from the payload fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub fields: Vec<Vec<u8>>,
    pub cursor: String,
    pub realtime_usec: u64,
    pub realtime_available: bool,
    pub monotonic_usec: u64,
    pub boot_id: Id128,
    pub catalog: Option<String>,
    pub file_path: String,
}

impl Entry {
    /// Convenience constructor; fields are appended with [`Self::with_field`].
    pub fn new(cursor: impl Into<String>, realtime_usec: u64, boot_id: Id128) -> Self {
        Entry {
            fields: Vec::new(),
            cursor: cursor.into(),
            realtime_usec,
            realtime_available: true,
            monotonic_usec: realtime_usec,
            boot_id,
            catalog: None,
            file_path: "/var/log/journal/mem.journal".to_string(),
        }
    }

    /// Marks this entry as having no realtime timestamp, the way a real
    /// reader would report `-EADDRNOTAVAIL` for an entry written before
    /// the journal file's header was fully initialized. Exercises the
    /// `debug`-vs-`error` log split in `verbose`'s encoder.
    pub fn without_realtime(mut self) -> Self {
        self.realtime_available = false;
        self
    }

    /// Appends a `name=value` field, encoding both as bytes.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.push(encode_field(name, value.as_bytes()));
        self
    }

    /// Appends a `name=<binary value>` field without requiring the value
    /// to be valid UTF-8.
    pub fn with_binary_field(mut self, name: &str, value: &[u8]) -> Self {
        self.fields.push(encode_field(name, value));
        self
    }

    pub fn with_monotonic(mut self, monotonic_usec: u64) -> Self {
        self.monotonic_usec = monotonic_usec;
        self
    }

    pub fn with_catalog(mut self, text: impl Into<String>) -> Self {
        self.catalog = Some(text.into());
        self
    }
}

fn encode_field(name: &str, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(name.len() + 1 + value.len());
    buf.extend_from_slice(name.as_bytes());
    buf.push(b'=');
    buf.extend_from_slice(value);
    buf
}

/// A single match expression or control operation, recorded by
/// [`MemoryJournalReader`] so tests can assert on the shape of a
/// compiled filter without a real journal backend to query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOp {
    Match(Vec<u8>),
    Disjunction,
    Conjunction,
}

/// External collaborator: a positioned cursor over a sequence of journal
/// entries, plus the match-compilation and wait operations a pager needs.
///
/// See spec §6 for the full external-interface contract this trait
/// realizes in Rust.
pub trait JournalReader {
    /// Seeks to one-past-the-last entry.
    fn seek_tail(&mut self) -> Result<(), SdError>;

    /// Steps backward up to `count` entries from the current position.
    /// Returns the number of entries actually stepped back (fewer than
    /// `count` at the head of the log).
    fn previous_skip(&mut self, count: u64) -> Result<u64, SdError>;

    /// Advances to the next entry. Returns `false` at end-of-stream
    /// (the "reader not positioned" condition, which is not an error).
    fn next_entry(&mut self) -> Result<bool, SdError>;

    /// The cursor string of the entry at the current position.
    fn current_cursor(&self) -> Result<String, SdError>;

    /// The realtime (wall-clock) timestamp of the current entry, in
    /// microseconds since the Unix epoch. `Err(TimestampError::Unavailable)`
    /// is the source's `-EADDRNOTAVAIL` (genuinely no realtime timestamp
    /// recorded for this entry); any other reader failure comes back as
    /// `Err(TimestampError::Reader(_))`. `verbose`'s encoder logs the
    /// former at `debug` and the latter at `error` (logs-show.c:226).
    fn current_realtime_usec(&self) -> Result<u64, TimestampError>;

    /// The monotonic timestamp of the current entry, paired with the boot
    /// it was recorded in. This always succeeds for a positioned entry —
    /// it mirrors the non-null-boot-id-out-param call shape
    /// (`sd_journal_get_monotonic_usec(j, &x, &boot_id)`) that
    /// `output_export`/`output_json` use (logs-show.c:309, :458), which
    /// returns the entry's own boot id regardless of whether it's the
    /// current boot. It is never "stale" for this call shape.
    fn current_boot_and_monotonic_usec(&self) -> Result<(u64, Id128), SdError>;

    /// The monotonic timestamp of the current entry *relative to the
    /// reader's current boot*, or `Ok(None)` if the entry predates the
    /// current boot (the source's `-ESTALE`). This mirrors the
    /// null-boot-id-out-param call shape
    /// (`sd_journal_get_monotonic_usec(j, &x, NULL)`) used only by the
    /// pager's `not_before` floor check (logs-show.c:764), which should
    /// silently skip a stale entry rather than treat it as an error.
    fn current_monotonic_usec_this_boot(&self) -> Result<Option<u64>, SdError>;

    /// The earliest monotonic timestamp still retained for `boot_id`, if
    /// any entries from that boot remain (`None` once everything from
    /// that boot has rotated out of the log).
    fn cutoff_monotonic_usec(&self, boot_id: Id128) -> Result<Option<u64>, SdError>;

    /// All fields of the entry at the current position, as raw
    /// `NAME=value` byte buffers in the store's enumeration order,
    /// truncated to [`Self::set_data_threshold`] if one is set.
    ///
    /// Pre-materialized rather than streamed (see spec §9's "Cyclic /
    /// self-referential enumeration" design note): every encoder gets the
    /// same restart-free view, instead of a streaming enumerate/restart
    /// cursor that only some encoders would need to rewind.
    fn current_fields(&self) -> Result<Vec<Vec<u8>>, SdError>;

    /// The path of the journal file backing the entry at the current
    /// position.
    fn current_file_path(&self) -> Result<String, SdError>;

    /// The catalog explanation text for the current entry's message
    /// identifier, if one is registered.
    fn current_catalog(&self) -> Result<Option<String>, SdError>;

    /// Sets the maximum field-value size the reader will hand back
    /// before truncating (`0` disables truncation). Encoders that need
    /// full fidelity (`export`, `cat`, `verbose`) disable it; JSON modes
    /// set it to [`crate::fields::JSON_THRESHOLD`] unless `show_all`.
    fn set_data_threshold(&mut self, bytes: usize);

    /// Adds a match term, ANDed with any other terms since the last
    /// [`Self::add_disjunction`].
    fn add_match(&mut self, expr: &[u8]) -> Result<(), SdError>;

    /// Starts a new OR-term in the compiled match expression.
    fn add_disjunction(&mut self) -> Result<(), SdError>;

    /// ANDs everything matched so far with whatever comes next.
    fn add_conjunction(&mut self) -> Result<(), SdError>;

    /// Blocks until new entries are available, or `timeout` elapses
    /// (`None` waits indefinitely).
    fn wait(&mut self, timeout: Option<Duration>) -> Result<(), SdError>;
}

/// A reference, in-memory [`JournalReader`] backed by a `Vec<Entry>`.
///
/// Not a systemd-journal client: it exists so this crate's pager,
/// dispatcher and match builder can be exercised and tested without a
/// live journal. `wait` on an in-memory reader that will never grow
/// returns immediately; callers driving `follow` mode against it should
/// pair it with their own termination condition.
#[derive(Debug, Default)]
pub struct MemoryJournalReader {
    entries: Vec<Entry>,
    /// Index of the next entry `next_entry` would read.
    cursor: usize,
    /// Index of the entry the `current_*` accessors describe, once
    /// `next_entry` has succeeded at least once since the last seek.
    current: Option<usize>,
    data_threshold: usize,
    matches: Vec<MatchOp>,
    /// The boot `current_monotonic_usec_this_boot` treats as "current",
    /// defaulted to the first entry's boot so a reader built from a
    /// single-boot fixture never reports staleness by surprise.
    current_boot: Option<Id128>,
}

impl MemoryJournalReader {
    pub fn new(entries: Vec<Entry>) -> Self {
        let current_boot = entries.first().map(|e| e.boot_id);
        MemoryJournalReader {
            entries,
            cursor: 0,
            current: None,
            data_threshold: 0,
            matches: Vec::new(),
            current_boot,
        }
    }

    /// Overrides which boot this reader treats as "current", for tests
    /// exercising `current_monotonic_usec_this_boot`'s staleness branch
    /// against entries from a boot other than the first one inserted.
    pub fn with_current_boot(mut self, boot: Id128) -> Self {
        self.current_boot = Some(boot);
        self
    }

    /// The match operations recorded so far, for assertions in tests.
    pub fn recorded_matches(&self) -> &[MatchOp] {
        &self.matches
    }

    fn current(&self) -> Result<&Entry, SdError> {
        let idx = self
            .current
            .ok_or_else(|| SdError::from("reader not positioned"))?;
        self.entries
            .get(idx)
            .ok_or_else(|| SdError::from("reader not positioned"))
    }

    fn truncate_field(&self, field: &[u8]) -> Vec<u8> {
        if self.data_threshold == 0 || field.len() <= self.data_threshold {
            field.to_vec()
        } else {
            field[..self.data_threshold].to_vec()
        }
    }
}

impl JournalReader for MemoryJournalReader {
    fn seek_tail(&mut self) -> Result<(), SdError> {
        self.cursor = self.entries.len();
        self.current = None;
        Ok(())
    }

    fn previous_skip(&mut self, count: u64) -> Result<u64, SdError> {
        let stepped = count.min(self.cursor as u64);
        self.cursor -= stepped as usize;
        Ok(stepped)
    }

    fn next_entry(&mut self) -> Result<bool, SdError> {
        if self.cursor >= self.entries.len() {
            self.current = None;
            return Ok(false);
        }
        self.current = Some(self.cursor);
        self.cursor += 1;
        Ok(true)
    }

    fn current_cursor(&self) -> Result<String, SdError> {
        Ok(self.current()?.cursor.clone())
    }

    fn current_realtime_usec(&self) -> Result<u64, TimestampError> {
        let entry = self.current().map_err(TimestampError::Reader)?;
        if !entry.realtime_available {
            return Err(TimestampError::Unavailable);
        }
        Ok(entry.realtime_usec)
    }

    fn current_boot_and_monotonic_usec(&self) -> Result<(u64, Id128), SdError> {
        let entry = self.current()?;
        Ok((entry.monotonic_usec, entry.boot_id))
    }

    fn current_monotonic_usec_this_boot(&self) -> Result<Option<u64>, SdError> {
        let entry = self.current()?;
        if Some(entry.boot_id) != self.current_boot {
            return Ok(None);
        }
        Ok(Some(entry.monotonic_usec))
    }

    fn cutoff_monotonic_usec(&self, boot_id: Id128) -> Result<Option<u64>, SdError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.boot_id == boot_id)
            .map(|e| e.monotonic_usec)
            .min())
    }

    fn current_fields(&self) -> Result<Vec<Vec<u8>>, SdError> {
        let entry = self.current()?;
        Ok(entry
            .fields
            .iter()
            .map(|f| self.truncate_field(f))
            .collect())
    }

    fn current_file_path(&self) -> Result<String, SdError> {
        Ok(self.current()?.file_path.clone())
    }

    fn current_catalog(&self) -> Result<Option<String>, SdError> {
        Ok(self.current()?.catalog.clone())
    }

    fn set_data_threshold(&mut self, bytes: usize) {
        self.data_threshold = bytes;
    }

    fn add_match(&mut self, expr: &[u8]) -> Result<(), SdError> {
        self.matches.push(MatchOp::Match(expr.to_vec()));
        Ok(())
    }

    fn add_disjunction(&mut self) -> Result<(), SdError> {
        self.matches.push(MatchOp::Disjunction);
        Ok(())
    }

    fn add_conjunction(&mut self) -> Result<(), SdError> {
        self.matches.push(MatchOp::Conjunction);
        Ok(())
    }

    fn wait(&mut self, _timeout: Option<Duration>) -> Result<(), SdError> {
        Ok(())
    }
}
