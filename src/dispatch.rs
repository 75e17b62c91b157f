//! Dispatcher (component G).
//!
//! Thin wiring layer in front of [`encode_entry`]: defaults the column
//! width when the caller didn't pin one, and flushes the sink afterwards
//! so callers writing to a line-buffered pipe see output promptly.

use crate::errors::SdError;
use crate::output::{encode_entry, OutputFlags, OutputMode};
use crate::reader::JournalReader;
use crate::termwidth;
use std::io::Write;

/// Renders the entry at `reader`'s current position to `sink`.
///
/// `n_columns == 0` means "not pinned by the caller"; the actual
/// terminal width is resolved via [`termwidth::columns`], mirroring the
/// source's `output_journal` (`if (n_columns <= 0) n_columns =
/// columns();`).
pub fn output_journal<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    mode: OutputMode,
    n_columns: u16,
    flags: OutputFlags,
) -> Result<(), SdError> {
    let n_columns = if n_columns == 0 {
        termwidth::columns()
    } else {
        n_columns
    };

    let result = encode_entry(sink, reader, mode, n_columns, flags);
    sink.flush().map_err(SdError::from)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id128::Id128;
    use crate::reader::{Entry, MemoryJournalReader};

    #[test]
    fn zero_columns_falls_back_to_detected_width() {
        let boot = Id128::from([1; 16]);
        let mut r = MemoryJournalReader::new(vec![Entry::new("c-1", 1, boot)
            .with_field("MESSAGE", "hi")]);
        r.next_entry().unwrap();

        let mut out = Vec::new();
        output_journal(&mut out, &mut r, OutputMode::Cat, 0, OutputFlags::empty()).unwrap();
        assert_eq!(out, b"hi\n");
    }

    #[test]
    fn explicit_columns_are_respected() {
        let boot = Id128::from([1; 16]);
        let mut r = MemoryJournalReader::new(vec![Entry::new("c-1", 1, boot)
            .with_field("MESSAGE", "hi")]);
        r.next_entry().unwrap();

        let mut out = Vec::new();
        output_journal(&mut out, &mut r, OutputMode::Cat, 40, OutputFlags::empty()).unwrap();
        assert_eq!(out, b"hi\n");
    }
}
