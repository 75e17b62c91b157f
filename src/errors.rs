//! Error handling.

/// A generic, stringly-described error.
///
/// This is the crate-wide error type for everything that doesn't need a
/// richer taxonomy: boot-id parsing, reader plumbing, match construction.
/// Construct it with `.into()` from a `String` or `&str`, as seen
/// throughout this crate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SdError(pub String);

impl From<String> for SdError {
    fn from(s: String) -> Self {
        SdError(s)
    }
}

impl From<&str> for SdError {
    fn from(s: &str) -> Self {
        SdError(s.to_string())
    }
}

impl From<std::io::Error> for SdError {
    fn from(e: std::io::Error) -> Self {
        SdError(e.to_string())
    }
}

/// Failure to retrieve an entry's realtime timestamp.
///
/// Kept distinct from [`SdError`] so callers can tell "timestamp not
/// available for this entry" (which `verbose` output logs at `debug` and
/// other encoders log at `error`, per the renderer's error taxonomy) apart
/// from every other reader failure, without parsing error strings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// The reader has no realtime timestamp for the current entry.
    #[error("realtime timestamp not available for this entry")]
    Unavailable,
    /// Any other reader failure while fetching the timestamp.
    #[error(transparent)]
    Reader(#[from] SdError),
}

impl From<TimestampError> for SdError {
    fn from(e: TimestampError) -> Self {
        match e {
            TimestampError::Unavailable => SdError("realtime timestamp not available".into()),
            TimestampError::Reader(inner) => inner,
        }
    }
}
