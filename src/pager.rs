//! Pager / follow loop (component F).
//!
//! Drains a [`JournalReader`] from a tail-relative starting point,
//! optionally floored at a monotonic timestamp, optionally blocking for
//! new entries once it runs dry.

use crate::dispatch::output_journal;
use crate::errors::SdError;
use crate::id128::Id128;
use crate::output::{OutputFlags, OutputMode};
use crate::reader::JournalReader;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheap, clonable flag checked at the top of each inner-loop
/// iteration and right after waking from [`JournalReader::wait`], so a
/// caller running the pager on a background thread can ask it to stop
/// between entries without tearing down the reader.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parameters controlling a single pager run, mirroring the source's
/// `show_journal` argument list.
pub struct PagerOptions {
    pub mode: OutputMode,
    pub n_columns: u16,
    /// Floor on monotonic timestamp; entries from a prior boot, or from
    /// this boot but earlier than this value, are skipped. `0` disables
    /// the floor entirely.
    pub not_before: u64,
    /// How many entries back from the tail to start.
    pub how_many: u64,
    pub flags: OutputFlags,
}

/// Drains `reader` from `how_many` entries before the tail, rendering
/// each via [`output_journal`], optionally flooring on `not_before` and
/// blocking for new entries when [`OutputFlags::FOLLOW`] is set.
///
/// Mirrors the source's `show_journal`: an outer loop around an inner
/// drain-to-EOF loop, with the `not_before`-vs-cutoff warning logic
/// sandwiched between them, firing exactly once regardless of how many
/// times the outer loop repeats (`WARN_CUTOFF` is cleared after firing).
pub fn show_journal<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    opts: PagerOptions,
    cancel: &CancellationToken,
) -> Result<u64, SdError> {
    let PagerOptions {
        mode,
        n_columns,
        not_before,
        how_many,
        mut flags,
    } = opts;

    reader.seek_tail()?;
    reader.previous_skip(how_many)?;

    let mut line = 0u64;

    loop {
        loop {
            if cancel.is_cancelled() {
                return Ok(line);
            }

            if !reader.next_entry()? {
                break;
            }

            if not_before > 0 {
                match reader.current_monotonic_usec_this_boot()? {
                    // -ESTALE: timestamp not from this boot, skip silently.
                    None => {
                        log::debug!("Skipping entry from a different boot");
                        continue;
                    }
                    Some(usec) if usec < not_before => continue,
                    Some(_) => {}
                }
            }

            line += 1;
            output_journal(sink, reader, mode, n_columns, flags)?;
        }

        if flags.contains(OutputFlags::WARN_CUTOFF) && line < how_many && not_before > 0 {
            let boot_id = Id128::from_boot()?;
            if let Some(cutoff) = reader.cutoff_monotonic_usec(boot_id)? {
                if not_before < cutoff {
                    writeln!(
                        sink,
                        "Warning: Journal has been rotated since unit was started. Log output is incomplete or unavailable."
                    )
                    .map_err(SdError::from)?;
                }
            }
            flags.remove(OutputFlags::WARN_CUTOFF);
        }

        if !flags.contains(OutputFlags::FOLLOW) {
            break;
        }
        if cancel.is_cancelled() {
            break;
        }

        reader.wait(None)?;
    }

    Ok(line)
}
