//! Mode encoders (component C): six encoders sharing a substrate (field
//! enumeration, threshold policy, boot-id elision) but differing in
//! framing, escaping, length encoding, and repeated-field grouping.

mod cat;
mod export;
mod json;
mod short;
mod verbose;

pub use cat::encode_cat;
pub use export::{encode_export, ExportFlags};
pub use json::encode_json;
pub use short::encode_short;
pub use verbose::encode_verbose;

use crate::errors::SdError;
use crate::reader::JournalReader;
use std::io::Write;
use std::str::FromStr;

/// The renderer's eight output modes. `ShortMonotonic` currently routes
/// to the same encoder as `Short` — see [`encode_short`]'s docs for why
/// that's a known, preserved quirk rather than an oversight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputMode {
    Short,
    ShortMonotonic,
    Verbose,
    Export,
    Json,
    JsonPretty,
    JsonSse,
    Cat,
}

impl FromStr for OutputMode {
    type Err = SdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(OutputMode::Short),
            "short-monotonic" => Ok(OutputMode::ShortMonotonic),
            "verbose" => Ok(OutputMode::Verbose),
            "export" => Ok(OutputMode::Export),
            "json" => Ok(OutputMode::Json),
            "json-pretty" => Ok(OutputMode::JsonPretty),
            "json-sse" => Ok(OutputMode::JsonSse),
            "cat" => Ok(OutputMode::Cat),
            other => Err(SdError(format!("unknown output mode '{}'", other))),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputMode::Short => "short",
            OutputMode::ShortMonotonic => "short-monotonic",
            OutputMode::Verbose => "verbose",
            OutputMode::Export => "export",
            OutputMode::Json => "json",
            OutputMode::JsonPretty => "json-pretty",
            OutputMode::JsonSse => "json-sse",
            OutputMode::Cat => "cat",
        };
        f.write_str(s)
    }
}

/// Rendering flags, packed into a single byte.
///
/// A small hand-rolled bitset rather than a `bitflags`-crate type: the
/// teacher's dependency pack carries no such crate, and six named bits
/// don't earn one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputFlags(u8);

impl OutputFlags {
    /// Disable size thresholds and printability filtering; emit everything.
    pub const SHOW_ALL: Self = Self(1 << 0);
    /// Disable column-based ellipsization.
    pub const FULL_WIDTH: Self = Self(1 << 1);
    /// Emit ANSI color escapes around MESSAGE and by priority.
    pub const COLOR: Self = Self(1 << 2);
    /// After verbose rendering, emit the catalog text.
    pub const CATALOG: Self = Self(1 << 3);
    /// After draining, block for new entries.
    pub const FOLLOW: Self = Self(1 << 4);
    /// Emit a one-shot warning if requested backstep crosses a rotation boundary.
    pub const WARN_CUTOFF: Self = Self(1 << 5);
    /// `export` mode only: disable the payload-field suppression list,
    /// see [`export::ExportFlags::FULL_FIDELITY`].
    pub const EXPORT_FULL_FIDELITY: Self = Self(1 << 6);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Removes `other`'s bits, used by the pager to clear `WARN_CUTOFF`
    /// once the one-shot warning has fired.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for OutputFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for OutputFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Renders exactly one entry at the reader's current position, in the
/// encoding named by `mode`.
pub fn encode_entry<R: JournalReader + ?Sized, W: Write>(
    sink: &mut W,
    reader: &mut R,
    mode: OutputMode,
    n_columns: u16,
    flags: OutputFlags,
) -> Result<(), SdError> {
    match mode {
        OutputMode::Short | OutputMode::ShortMonotonic => encode_short(sink, reader, mode),
        OutputMode::Verbose => encode_verbose(sink, reader, n_columns, flags),
        OutputMode::Export => {
            let export_flags = if flags.contains(OutputFlags::EXPORT_FULL_FIDELITY) {
                ExportFlags::FULL_FIDELITY
            } else {
                ExportFlags::empty()
            };
            encode_export(sink, reader, export_flags)
        }
        OutputMode::Json | OutputMode::JsonPretty | OutputMode::JsonSse => {
            encode_json(sink, reader, mode, flags)
        }
        OutputMode::Cat => encode_cat(sink, reader),
    }
}
