//! `json` / `json-pretty` / `json-sse` encoder (§4.C.4).

use super::{OutputFlags, OutputMode};
use crate::errors::SdError;
use crate::escape::json_escape;
use crate::fields::{split_field, JSON_THRESHOLD};
use crate::reader::JournalReader;
use std::collections::HashMap;
use std::io::Write;

/// Renders the entry as a single JSON object: four fixed metadata keys
/// followed by one key per field, with fields repeated in the entry
/// coalesced into a single JSON array value rather than repeated keys.
///
/// The source this is ported from counts repeats with a hashmap, then
/// rescans the field enumeration from the start every time it finishes
/// emitting a repeated field, an O(N^2) dance needed only because its
/// underlying cursor can't be rewound cheaply. Materializing
/// `current_fields()` up front (see [`crate::reader::JournalReader`]'s
/// docs) lets this implementation do the same coalescing in one O(N)
/// pass: count once, then walk the fields in first-occurrence order and
/// gather every value sharing a name the first time it's seen.
pub fn encode_json<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    mode: OutputMode,
    flags: OutputFlags,
) -> Result<(), SdError> {
    let show_all = flags.contains(OutputFlags::SHOW_ALL);
    reader.set_data_threshold(if show_all { 0 } else { JSON_THRESHOLD });

    let realtime = reader.current_realtime_usec().map_err(|e| {
        log::error!("Failed to get realtime timestamp: {}", e);
        SdError::from(e)
    })?;
    let monotonic = reader.current_boot_and_monotonic_usec().map_err(|e| {
        log::error!("Failed to get monotonic timestamp: {}", e);
        e
    })?;
    let cursor = reader.current_cursor()?;

    let pretty = mode == OutputMode::JsonPretty;
    let sse = mode == OutputMode::JsonSse;

    if sse {
        sink.write_all(b"data: ").map_err(SdError::from)?;
    }

    if pretty {
        write!(
            sink,
            "{{\n\t\"__CURSOR\" : \"{}\",\n\t\"__REALTIME_TIMESTAMP\" : \"{}\",\n\t\"__MONOTONIC_TIMESTAMP\" : \"{}\",\n\t\"_BOOT_ID\" : \"{}\"",
            cursor, realtime, monotonic.0, monotonic.1.lower_hex()
        )
        .map_err(SdError::from)?;
    } else {
        write!(
            sink,
            "{{ \"__CURSOR\" : \"{}\", \"__REALTIME_TIMESTAMP\" : \"{}\", \"__MONOTONIC_TIMESTAMP\" : \"{}\", \"_BOOT_ID\" : \"{}\"",
            cursor, realtime, monotonic.0, monotonic.1.lower_hex()
        )
        .map_err(SdError::from)?;
    }

    let fields = reader.current_fields()?;

    let mut counts: HashMap<&[u8], usize> = HashMap::new();
    for field in &fields {
        if let Some((name, _)) = split_field(field) {
            if name == b"_BOOT_ID" {
                continue;
            }
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut emitted: HashMap<&[u8], bool> = HashMap::new();
    for field in &fields {
        let (name, value) = match split_field(field) {
            Some(nv) => nv,
            None => continue,
        };
        if name == b"_BOOT_ID" || *emitted.get(name).unwrap_or(&false) {
            continue;
        }
        emitted.insert(name, true);

        if pretty {
            sink.write_all(b",\n\t").map_err(SdError::from)?;
        } else {
            sink.write_all(b", ").map_err(SdError::from)?;
        }
        json_escape(sink, name, show_all)?;
        sink.write_all(b" : ").map_err(SdError::from)?;

        let count = counts.get(name).copied().unwrap_or(1);
        if count <= 1 {
            json_escape(sink, value, show_all)?;
        } else {
            sink.write_all(b"[ ").map_err(SdError::from)?;
            let mut first = true;
            for other in &fields {
                if let Some((n, v)) = split_field(other) {
                    if n == name {
                        if !first {
                            sink.write_all(b", ").map_err(SdError::from)?;
                        }
                        first = false;
                        json_escape(sink, v, show_all)?;
                    }
                }
            }
            sink.write_all(b" ]").map_err(SdError::from)?;
        }
    }

    if pretty {
        sink.write_all(b"\n}\n").map_err(SdError::from)?;
    } else if sse {
        sink.write_all(b"}\n\n").map_err(SdError::from)?;
    } else {
        sink.write_all(b" }\n").map_err(SdError::from)?;
    }

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
    fn plain_json_has_fixed_header_keys() {
        let boot = Id128::from([3; 16]);
        let entry = Entry::new("c-1", 1, boot).with_field("MESSAGE", "hi");
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_json(&mut out, &mut r, OutputMode::Json, OutputFlags::empty()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("{ \"__CURSOR\" : \"c-1\", \"__REALTIME_TIMESTAMP\" : \"1\""));
        assert!(text.contains("\"MESSAGE\" : \"hi\""));
        assert!(text.ends_with(" }\n"));
    }

    #[test]
    fn pretty_json_uses_tab_indented_lines() {
        let boot = Id128::from([3; 16]);
        let entry = Entry::new("c-1", 1, boot).with_field("MESSAGE", "hi");
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_json(&mut out, &mut r, OutputMode::JsonPretty, OutputFlags::empty()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("{\n\t\"__CURSOR\""));
        assert!(text.contains(",\n\t\"MESSAGE\""));
        assert!(text.ends_with("\n}\n"));
    }

    #[test]
    fn sse_json_is_wrapped_in_data_prefix_and_blank_line() {
        let boot = Id128::from([3; 16]);
        let entry = Entry::new("c-1", 1, boot).with_field("MESSAGE", "hi");
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_json(&mut out, &mut r, OutputMode::JsonSse, OutputFlags::empty()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("data: {"));
        assert!(text.ends_with("}\n\n"));
    }

    #[test]
    fn repeated_field_name_coalesces_into_array() {
        let boot = Id128::from([3; 16]);
        let entry = Entry::new("c-1", 1, boot)
            .with_field("TAG", "a")
            .with_field("MESSAGE", "hi")
            .with_field("TAG", "b")
            .with_field("TAG", "c");
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_json(&mut out, &mut r, OutputMode::Json, OutputFlags::empty()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\"TAG\" : [ \"a\", \"b\", \"c\" ]"));
        // Only emitted once, at its first occurrence.
        assert_eq!(text.matches("\"TAG\"").count(), 1);
    }

    #[test]
    fn boot_id_field_is_not_duplicated_from_header() {
        let boot = Id128::from([3; 16]);
        let entry = Entry::new("c-1", 1, boot).with_binary_field("_BOOT_ID", boot.as_bytes());
        let mut r = reader_with(entry);

        let mut out = Vec::new();
        encode_json(&mut out, &mut r, OutputMode::Json, OutputFlags::empty()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("_BOOT_ID").count(), 1);
    }
}
