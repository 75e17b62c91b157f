//! Field utilities: printability, threshold decisions, multiline wrapping.
//!
//! A field, as produced by a [`crate::reader::JournalReader`], is a raw
//! byte buffer of the form `NAME=value`; the name is ASCII, the value is
//! arbitrary bytes. These helpers operate directly on that representation
//! without ever copying the value out unless they must transform it.

use crate::errors::SdError;

/// Size above which text-oriented encoders abbreviate a value to a blob
/// placeholder, unless `show_all`/`full_width` is set.
pub const PRINT_THRESHOLD: usize = 128;

/// Size above which JSON encoders emit `null` for a value, unless
/// `show_all` is set.
pub const JSON_THRESHOLD: usize = 4096;

/// Returns `true` iff `field` begins with `name` followed by `=`.
pub fn is_field(field: &[u8], name: &str) -> bool {
    let name = name.as_bytes();
    field.len() >= name.len() + 1 && &field[..name.len()] == name && field[name.len()] == b'='
}

/// Splits a raw `name=value` field into its name and value parts.
///
/// Returns `None` if the field contains no `=` separator at all (the
/// "invalid field" condition of the renderer's error taxonomy).
pub fn split_field(field: &[u8]) -> Option<(&[u8], &[u8])> {
    let eq = field.iter().position(|&b| b == b'=')?;
    Some((&field[..eq], &field[eq + 1..]))
}

/// Returns the suffix of `field` starting right after `name`, if `field`
/// begins with `name` as a byte-prefix.
///
/// This mirrors the source `parse_field` exactly, including its
/// historical quirk: the returned slice still starts with the `=`
/// separator rather than the value itself. Callers that want the value
/// alone should strip the leading byte, or use [`is_field`] plus
/// [`split_field`] instead. Kept for source fidelity; see spec's open
/// questions for context.
pub fn parse_field<'a>(field: &'a [u8], name: &str) -> Option<&'a [u8]> {
    let name = name.as_bytes();
    if field.len() < name.len() || &field[..name.len()] != name {
        return None;
    }
    Some(&field[name.len()..])
}

/// The concrete resolution of the externally-deferred "UTF-8
/// printability test": valid UTF-8, and free of embedded NUL bytes.
///
/// This is narrower than "no control characters" (which would divert a
/// lone `0x1F` byte away from the JSON string-escape path, contradicting
/// the renderer's own boundary cases) and wider than "printable ASCII
/// only" (which would reject legitimate non-ASCII log text). See
/// DESIGN.md for the full justification.
pub fn is_utf8_printable(bytes: &[u8]) -> bool {
    !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok()
}

/// Whether a field value should be printed verbatim rather than
/// abbreviated to a blob placeholder.
pub fn shall_print(value: &[u8], show_all: bool) -> bool {
    if show_all {
        return true;
    }
    value.len() < PRINT_THRESHOLD && is_utf8_printable(value)
}

/// Formats a byte count the way `verbose` mode's blob placeholder does,
/// e.g. `128B`, `4.0K`, `1.5M`.
pub fn format_bytes_human(n: usize) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}{}", n, UNITS[0])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

/// Ellipsizes `text` to fit within `width` columns, keeping roughly
/// `left_weight_pct` percent of the budget before the ellipsis and the
/// rest after it (systemd's `ellipsize_mem` convention: `90` biases
/// strongly towards the start of the string, which tends to carry the
/// more identifying part of a log line).
///
/// Operates on `char`s, not bytes, so it never splits a UTF-8 sequence.
pub fn ellipsize_mem(text: &str, width: usize, left_weight_pct: u8) -> String {
    const ELLIPSIS: char = '…';

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }

    let budget = width - 1;
    let left = (budget * left_weight_pct as usize) / 100;
    let left = left.min(budget);
    let right = budget - left;

    let mut out = String::with_capacity(width * 4);
    out.extend(&chars[..left]);
    out.push(ELLIPSIS);
    if right > 0 {
        out.extend(&chars[chars.len() - right..]);
    }
    out
}

const RED_ON: &str = "\x1b[1;31m";
const BOLD_ON: &str = "\x1b[1m";
const OFF: &str = "\x1b[0m";

/// How a call to [`print_multiline`] should colorize its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// No ANSI wrapping.
    None,
    /// Derive bold/bold-red from a syslog priority: `<= 3` (LOG_ERR) is
    /// bold red, `<= 5` (LOG_NOTICE) is bold, anything else plain.
    Priority(u8),
    /// Wrap unconditionally in bold, bypassing the priority table. Used
    /// by `verbose`'s `MESSAGE` highlighting, which is keyed on the field
    /// name rather than the entry's priority.
    Bold,
}

fn color_for_priority(priority: u8) -> (&'static str, &'static str) {
    if priority <= 3 {
        (RED_ON, OFF)
    } else if priority <= 5 {
        (BOLD_ON, OFF)
    } else {
        ("", "")
    }
}

/// Splits `text` on `\n` and writes each line, indenting continuation
/// lines by `prefix` spaces and ellipsizing lines that don't fit within
/// `n_columns` unless `full_width` is set (`n_columns == 0` also disables
/// truncation, matching the "verbose disables column truncation" case).
#[allow(clippy::too_many_arguments)]
pub fn print_multiline<W: std::io::Write>(
    sink: &mut W,
    prefix: usize,
    n_columns: usize,
    full_width: bool,
    color: ColorMode,
    text: &[u8],
) -> Result<(), SdError> {
    let (on, off) = match color {
        ColorMode::None => ("", ""),
        ColorMode::Priority(priority) => color_for_priority(priority),
        ColorMode::Bold => (BOLD_ON, OFF),
    };

    // The value may be binary-adjacent text (already passed `shall_print`),
    // but multiline splitting and ellipsizing both want `char` semantics;
    // lossily recover text for layout purposes only, bytes are never
    // corrupted because this path is only reached for values already
    // known to be valid UTF-8.
    let text = String::from_utf8_lossy(text);

    for (idx, line) in text.split('\n').enumerate() {
        let continuation = idx > 0;
        if continuation {
            write_spaces(sink, prefix)?;
        }

        if full_width || n_columns == 0 || prefix + line.chars().count() + 1 < n_columns {
            write_colored(sink, on, line, off)?;
        } else if prefix < n_columns && n_columns - prefix >= 3 {
            let ellipsized = ellipsize_mem(line, n_columns - prefix, 90);
            write_colored(sink, on, &ellipsized, off)?;
        } else {
            sink.write_all(b"...\n").map_err(SdError::from)?;
            continue;
        }
    }

    Ok(())
}

fn write_spaces<W: std::io::Write>(sink: &mut W, n: usize) -> Result<(), SdError> {
    for _ in 0..n {
        sink.write_all(b" ").map_err(SdError::from)?;
    }
    Ok(())
}

fn write_colored<W: std::io::Write>(
    sink: &mut W,
    on: &str,
    line: &str,
    off: &str,
) -> Result<(), SdError> {
    sink.write_all(on.as_bytes()).map_err(SdError::from)?;
    sink.write_all(line.as_bytes()).map_err(SdError::from)?;
    sink.write_all(off.as_bytes()).map_err(SdError::from)?;
    sink.write_all(b"\n").map_err(SdError::from)?;
    Ok(())
}
