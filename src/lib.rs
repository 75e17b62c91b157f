//! A pure-Rust library for rendering systemd journal entries.
//!
//! It takes entries from a journal store (modeled here as a
//! [`reader::JournalReader`], since this crate does not link against a
//! C `sd_journal`) and renders them in any of `journalctl`'s textual
//! output formats: `short`, `short-monotonic`, `verbose`, `export`,
//! `json`, `json-pretty`, `json-sse`, and `cat`.
//!
//! ```rust
//! use sd_journal_show::dispatch::output_journal;
//! use sd_journal_show::id128::Id128;
//! use sd_journal_show::output::{OutputFlags, OutputMode};
//! use sd_journal_show::reader::{Entry, JournalReader, MemoryJournalReader};
//!
//! let boot = Id128::from([1; 16]);
//! let mut reader = MemoryJournalReader::new(vec![
//!     Entry::new("cursor-1", 1_700_000_000_000_000, boot).with_field("MESSAGE", "hello"),
//! ]);
//! reader.next_entry().unwrap();
//!
//! let mut out = Vec::new();
//! output_journal(&mut out, &mut reader, OutputMode::Cat, 0, OutputFlags::empty()).unwrap();
//! assert_eq!(out, b"hello\n");
//! ```

/// Mode → encoder wiring, column defaulting, flush discipline.
pub mod dispatch;

/// Error handling.
pub mod errors;

/// JSON value escaper.
pub mod escape;

/// Field utilities: printability, threshold decisions, multiline wrapping.
pub mod fields;

/// Boot/machine identity (128-bit IDs).
pub mod id128;

/// Match builder and boot filter.
pub mod matches;

/// The six mode encoders and their shared configuration types.
pub mod output;

/// Pager / follow loop.
pub mod pager;

/// The journal reader interface and an in-memory reference implementation.
pub mod reader;

/// Terminal width detection.
pub mod termwidth;
