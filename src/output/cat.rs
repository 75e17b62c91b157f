//! `cat` encoder (§4.C.5).

use crate::errors::SdError;
use crate::fields::split_field;
use crate::reader::JournalReader;
use std::io::Write;

/// Renders only the entry's `MESSAGE` value, verbatim, followed by a
/// newline. An entry without a `MESSAGE` field produces no output at
/// all, rather than an error — callers piping `cat` output expect silent
/// skips, not failures, for message-less entries (e.g. structured-only
/// records).
pub fn encode_cat<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
) -> Result<(), SdError> {
    reader.set_data_threshold(0);

    for field in reader.current_fields()? {
        if let Some((name, value)) = split_field(&field) {
            // Exact field-name match, the way the journal's own
            // `get_data("MESSAGE")` looks it up — not a prefix match,
            // which would also catch fields like `MESSAGE_ID`.
            if name == b"MESSAGE" {
                sink.write_all(value).map_err(SdError::from)?;
                sink.write_all(b"\n").map_err(SdError::from)?;
                return Ok(());
            }
        }
    }

    Ok(())
}
