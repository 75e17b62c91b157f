//! `short` / `short-monotonic` encoder (§4.C.1).

use super::OutputMode;
use crate::errors::SdError;
use crate::reader::JournalReader;
use std::io::Write;
use std::time::{Duration, UNIX_EPOCH};

/// Renders the `short`/`short-monotonic` line: a local-time timestamp,
/// the backing journal file path, and the entry's cursor on its own
/// line, wrapped in brackets.
///
/// `short-monotonic` is documented to format the monotonic timestamp
/// instead of the realtime one; the source it's ported from never
/// actually did that (both variants share one `output_short`
/// implementation), and this is preserved here as a known, deliberate
/// deviation rather than "fixed" out from under compatibility — see
/// spec's design notes.
pub fn encode_short<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    _mode: OutputMode,
) -> Result<(), SdError> {
    let cursor = reader.current_cursor()?;
    let realtime = reader.current_realtime_usec().map_err(|e| {
        log::error!("Failed to get realtime timestamp: {}", e);
        SdError::from(e)
    })?;
    let file_path = reader.current_file_path()?;

    let timestamp = format_local_short(realtime);

    write!(sink, "{} {}\n", timestamp, file_path).map_err(SdError::from)?;
    write!(sink, "[{}]\n", cursor).map_err(SdError::from)?;

    Ok(())
}

/// Formats a realtime microsecond timestamp as `%b %d %H:%M:%S` in local
/// time, without pulling in a full date/time crate: the only thing this
/// encoder needs is a fixed-width calendar render, which `std::time`
/// plus a small civil-calendar conversion gives us directly.
fn format_local_short(realtime_usec: u64) -> String {
    let secs = realtime_usec / 1_000_000;
    let dt = UNIX_EPOCH + Duration::from_secs(secs);
    let civil = civil_from_unix(dt.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64);

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    format!(
        "{} {:02} {:02}:{:02}:{:02}",
        MONTHS[(civil.month - 1) as usize],
        civil.day,
        civil.hour,
        civil.minute,
        civil.second
    )
}

struct Civil {
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

/// Converts Unix seconds to a naive (UTC-as-local, since this process has
/// no timezone database dependency available) civil calendar date. Uses
/// Howard Hinnant's well-known `civil_from_days` algorithm.
fn civil_from_unix(unix_secs: i64) -> Civil {
    let days = unix_secs.div_euclid(86_400);
    let secs_of_day = unix_secs.rem_euclid(86_400);

    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;

    Civil {
        month,
        day,
        hour: (secs_of_day / 3600) as u32,
        minute: ((secs_of_day % 3600) / 60) as u32,
        second: (secs_of_day % 60) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id128::Id128;
    use crate::reader::{Entry, MemoryJournalReader};

    #[test]
    fn renders_timestamp_path_and_cursor() {
        let boot = Id128::from([1; 16]);
        let mut r = MemoryJournalReader::new(vec![Entry::new("c-1", 1_700_000_000_000_000, boot)
            .with_field("MESSAGE", "hi")]);
        r.next_entry().unwrap();

        let mut out = Vec::new();
        encode_short(&mut out, &mut r, OutputMode::Short).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        let first = lines.next().unwrap();
        assert!(first.ends_with("/var/log/journal/mem.journal"));
        assert_eq!(lines.next().unwrap(), "[c-1]");
    }

    #[test]
    fn civil_from_unix_epoch_is_1970_01_01() {
        let c = civil_from_unix(0);
        assert_eq!((c.month, c.day, c.hour, c.minute, c.second), (1, 1, 0, 0, 0));
    }
}
