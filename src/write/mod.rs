use std::io::Write;

use crate::constants::DEFAULT_SEPARATOR;
use crate::{Error, Result};

/// Serializer for the reader's wire format: fields joined by the separator
/// byte, rows terminated by `\n`.
///
/// No quoting or escaping is applied, so a field containing the separator or
/// a newline will not survive a round trip; for fields free of those bytes
/// [`Reader`](crate::Reader) is the exact inverse.
///
/// # Examples
/// ```
/// use dsv_stream::Writer;
///
/// let mut writer = Writer::new(Vec::new(), 3);
/// writer.write_row(&["1000", "first string", "final string"]).unwrap();
/// let out = writer.into_inner().unwrap();
/// assert_eq!(out, b"1000|first string|final string\n");
/// ```
pub struct Writer<W> {
    out: W,
    separator: u8,
    expected: usize,
    rows_written: u64,
}

impl<W: Write> Writer<W> {
    /// Writer over `out` emitting `fields` fields per row with the default
    /// separator.
    pub fn new(out: W, fields: usize) -> Self {
        Self {
            out,
            separator: DEFAULT_SEPARATOR,
            expected: fields,
            rows_written: 0,
        }
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Write one row. The field count must match the writer's exactly.
    pub fn write_row<T: AsRef<[u8]>>(&mut self, fields: &[T]) -> Result<()> {
        if self.expected == 0 {
            return Err(Error::UnsetFieldCount);
        }
        let row = self.rows_written + 1;
        if fields.len() > self.expected {
            return Err(Error::FieldOverflow {
                row,
                expected: self.expected,
                found: fields.len(),
            });
        }
        if fields.len() < self.expected {
            return Err(Error::TruncatedRow {
                row,
                expected: self.expected,
                found: fields.len(),
            });
        }
        for (idx, field) in fields.iter().enumerate() {
            if idx > 0 {
                self.out.write_all(&[self.separator])?;
            }
            self.out.write_all(field.as_ref())?;
        }
        self.out.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
