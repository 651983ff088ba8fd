use std::io;

/// Failure raised by a read or write pass.
///
/// Every variant is terminal for the pass that produced it: the reader does
/// not resynchronize past a malformed row, and a caller that wants to retry
/// must start a fresh pass against a repositioned source. Row numbers are
/// 1-based and count data rows only (a skipped heading is not a row).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The field count is zero and no heading is available to infer it from.
    #[error("field count is zero and there is no heading to infer it from")]
    UnsetFieldCount,

    /// The chunk buffer cannot hold a worst-case row of all-empty fields.
    #[error("{fields} fields cannot fit a {buffer_size} byte buffer")]
    BufferTooSmall { fields: usize, buffer_size: usize },

    /// The heading's field count disagrees with the configured one.
    #[error("heading has {found} fields, expected {expected}")]
    HeadingMismatch { expected: usize, found: usize },

    /// A row produced more separator-delimited fields than expected.
    #[error("row {row}: expected {expected} fields, got at least {found}")]
    FieldOverflow {
        row: u64,
        expected: usize,
        found: usize,
    },

    /// The stream ended before the in-flight row reached the expected count.
    #[error("row {row}: stream ended after {found} of {expected} fields")]
    TruncatedRow {
        row: u64,
        expected: usize,
        found: usize,
    },

    /// A non-end-of-stream failure from the byte source, passed on verbatim.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}
