//! `verbose` encoder (§4.C.2).

use super::OutputFlags;
use crate::errors::{SdError, TimestampError};
use crate::fields::{format_bytes_human, is_utf8_printable, print_multiline, split_field, ColorMode, PRINT_THRESHOLD};
use crate::reader::JournalReader;
use std::io::Write;

const BOLD_ON: &str = "\x1b[1m";
const OFF: &str = "\x1b[0m";

/// Renders a human-readable, multi-line dump of every field in the
/// entry: a timestamp/cursor header line, then one `    name=value` (or
/// blob placeholder) line per field, and optionally the catalog
/// explanation text.
///
/// `n_columns` is accepted for signature uniformity with the other mode
/// encoders but otherwise unused: every field value is rendered through
/// `print_multiline` with truncation forced off (see the loop below),
/// matching the source's own hardcoded `print_multiline(f, ..., 0,
/// OUTPUT_FULL_WIDTH, 0, ...)` call in `output_verbose`.
pub fn encode_verbose<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    _n_columns: u16,
    flags: OutputFlags,
) -> Result<(), SdError> {
    // verbose wants full field values, never truncated by the reader.
    reader.set_data_threshold(0);

    let realtime = match reader.current_realtime_usec() {
        Ok(usec) => usec,
        Err(e @ TimestampError::Unavailable) => {
            log::debug!("Failed to get realtime timestamp: {}", e);
            return Err(e.into());
        }
        Err(e @ TimestampError::Reader(_)) => {
            log::error!("Failed to get realtime timestamp: {}", e);
            return Err(e.into());
        }
    };
    let cursor = reader.current_cursor()?;

    write!(sink, "{} [{}]\n", format_rfc_timestamp(realtime), cursor).map_err(SdError::from)?;

    let show_all = flags.contains(OutputFlags::SHOW_ALL);
    let full_width = flags.contains(OutputFlags::FULL_WIDTH);
    let color = flags.contains(OutputFlags::COLOR);

    for field in reader.current_fields()? {
        let (name, value) = split_field(&field).ok_or_else(|| SdError::from("invalid field"))?;
        let name = std::str::from_utf8(name).map_err(|_| SdError::from("invalid field name"))?;

        let is_message = name == "MESSAGE";
        let printable =
            show_all || ((value.len() < PRINT_THRESHOLD || full_width) && is_utf8_printable(value));

        if printable {
            let highlight = color && is_message;
            let (on, off) = if highlight { (BOLD_ON, OFF) } else { ("", "") };
            write!(sink, "    {}{}=", on, name).map_err(SdError::from)?;
            let prefix = 4 + name.len() + 1;
            // verbose never truncates a field value regardless of terminal
            // width or the caller's full-width flag.
            print_multiline(sink, prefix, 0, true, ColorMode::None, value)?;
            write!(sink, "{}", off).map_err(SdError::from)?;
        } else {
            write!(
                sink,
                "    {}=[{} blob data]\n",
                name,
                format_bytes_human(value.len())
            )
            .map_err(SdError::from)?;
        }
    }

    if flags.contains(OutputFlags::CATALOG) {
        if let Some(text) = reader.current_catalog()? {
            let trimmed = text.trim();
            write!(sink, "-- {}\n", trimmed.replace('\n', "\n-- ")).map_err(SdError::from)?;
        }
    }

    Ok(())
}

/// A compact, RFC-style local timestamp (`YYYY-MM-DD HH:MM:SS`), enough
/// to order entries visually without pulling in a full date/time crate
/// for a display-only verbose header.
fn format_rfc_timestamp(realtime_usec: u64) -> String {
    let secs = realtime_usec / 1_000_000;
    let micros = realtime_usec % 1_000_000;
    let days = secs / 86_400;
    let secs_of_day = secs % 86_400;

    let z = days as i64 + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { y + 1 } else { y };

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
        year,
        month,
        day,
        secs_of_day / 3600,
        (secs_of_day % 3600) / 60,
        secs_of_day % 60,
        micros
    )
}
