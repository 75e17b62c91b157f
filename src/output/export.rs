//! `export` encoder (§4.C.3).

use crate::errors::SdError;
use crate::fields::{is_utf8_printable, split_field};
use crate::reader::JournalReader;
use std::io::Write;

/// Field-name prefixes the original renderer silently dropped from its
/// export stream, on the theory that payload fields are "noisy" relative
/// to structured metadata. Preserved bit-for-bit as a known anomaly; see
/// [`ExportFlags::FULL_FIDELITY`] for the opt-out.
const SUPPRESSED_EXACT: &[&str] = &["_COMM", "MESSAGE", "_CMDLINE", "_EXE", "SYSLOG_IDENTIFIER"];
const SUPPRESSED_PREFIX: &[&str] = &["COREDUMP", "CODE_"];

/// Export-mode behavior flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportFlags(u8);

impl ExportFlags {
    /// Disables the `output_export` payload-field suppression list,
    /// emitting every field the entry carries.
    pub const FULL_FIDELITY: Self = Self(1 << 0);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ExportFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

fn is_suppressed(name: &[u8]) -> bool {
    SUPPRESSED_EXACT.iter().any(|n| name == n.as_bytes())
        || SUPPRESSED_PREFIX
            .iter()
            .any(|p| name.len() >= p.len() && &name[..p.len()] == p.as_bytes())
}

/// Renders the entry in the machine-parseable `export` stream format:
/// four metadata headers, then one line per field — framed as either the
/// raw `NAME=value` bytes (if UTF-8-printable) or `NAME\n` followed by an
/// 8-byte little-endian length and the raw value bytes (if not) — and a
/// trailing blank line terminating the entry.
pub fn encode_export<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    flags: ExportFlags,
) -> Result<(), SdError> {
    reader.set_data_threshold(0);

    let realtime = reader.current_realtime_usec().map_err(|e| {
        log::error!("Failed to get realtime timestamp: {}", e);
        SdError::from(e)
    })?;
    let monotonic = reader.current_boot_and_monotonic_usec().map_err(|e| {
        log::error!("Failed to get monotonic timestamp: {}", e);
        e
    })?;
    let cursor = reader.current_cursor()?;

    write!(
        sink,
        "__CURSOR={}\n__REALTIME_TIMESTAMP={}\n__MONOTONIC_TIMESTAMP={}\n_BOOT_ID={}\n",
        cursor,
        realtime,
        monotonic.0,
        monotonic.1.lower_hex()
    )
    .map_err(SdError::from)?;

    for field in reader.current_fields()? {
        let (name, value) = split_field(&field).ok_or_else(|| SdError::from("invalid field"))?;

        // The boot id was already emitted from the header above.
        if name == b"_BOOT_ID" {
            continue;
        }

        if !flags.contains(ExportFlags::FULL_FIDELITY) && is_suppressed(name) {
            continue;
        }

        if is_utf8_printable(&field) {
            sink.write_all(&field).map_err(SdError::from)?;
        } else {
            sink.write_all(name).map_err(SdError::from)?;
            sink.write_all(b"\n").map_err(SdError::from)?;
            sink.write_all(&(value.len() as u64).to_le_bytes())
                .map_err(SdError::from)?;
            sink.write_all(value).map_err(SdError::from)?;
        }
        sink.write_all(b"\n").map_err(SdError::from)?;
    }

    sink.write_all(b"\n").map_err(SdError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id128::Id128;
    use crate::reader::{Entry, MemoryJournalReader};

    fn reader_with(entry: Entry) -> MemoryJournalReader {
        let mut r = MemoryJournalReader::new(vec![entry]);
        r.next_entry().unwrap();
        r
    }

    #[test]
    fn headers_and_printable_field_are_raw() {
        let boot = Id128::from([7; 16]);
        let entry = Entry::new("c-1", 1_700_000_000_000_000, boot)
            .with_monotonic(42)
            .with_field("PRIORITY", "6");
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_export(&mut out, &mut r, ExportFlags::empty()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("__CURSOR=c-1\n__REALTIME_TIMESTAMP=1700000000000000\n__MONOTONIC_TIMESTAMP=42\n_BOOT_ID="));
        assert!(text.contains("PRIORITY=6\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn message_is_suppressed_by_default_but_kept_under_full_fidelity() {
        let boot = Id128::from([7; 16]);
        let entry = Entry::new("c-1", 1, boot).with_field("MESSAGE", "hi there");

        let mut out = Vec::new();
        encode_export(&mut out, &mut reader_with(entry.clone()), ExportFlags::empty()).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("MESSAGE="));

        let mut out = Vec::new();
        encode_export(&mut out, &mut reader_with(entry), ExportFlags::FULL_FIDELITY).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("MESSAGE=hi there\n"));
    }

    #[test]
    fn non_printable_value_is_framed_with_length_prefix() {
        let boot = Id128::from([7; 16]);
        let entry = Entry::new("c-1", 1, boot).with_binary_field("BIN", &[0xff, 0x00, 0x01]);
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_export(&mut out, &mut r, ExportFlags::empty()).unwrap();

        let marker = b"BIN\n";
        let pos = out
            .windows(marker.len())
            .position(|w| w == marker)
            .expect("BIN field name present");
        let len_bytes = &out[pos + marker.len()..pos + marker.len() + 8];
        assert_eq!(u64::from_le_bytes(len_bytes.try_into().unwrap()), 3);
        let value = &out[pos + marker.len() + 8..pos + marker.len() + 8 + 3];
        assert_eq!(value, &[0xff, 0x00, 0x01]);
    }

    #[test]
    fn boot_id_header_is_not_duplicated_from_fields() {
        let boot = Id128::from([7; 16]);
        let entry = Entry::new("c-1", 1, boot).with_binary_field("_BOOT_ID", boot.as_bytes());
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_export(&mut out, &mut r, ExportFlags::empty()).unwrap();
        let text_bytes = out;
        let occurrences = text_bytes
            .windows(b"_BOOT_ID=".len())
            .filter(|w| *w == b"_BOOT_ID=")
            .count();
        assert_eq!(occurrences, 1);
    }
}
