mod buffers;
mod lines;

use std::io::{self, Read};

use memchr::{memchr2, memchr3};
use smol_str::SmolStr;

use crate::options::ReadOptions;
use crate::row::Row;
use crate::{Error, Result};

use buffers::FieldBuf;
pub use lines::LineReader;

/// Streaming reader for delimiter-separated rows.
///
/// The separator is a fixed byte; fields are variable-length and may contain
/// embedded newlines. A newline terminates a row only when exactly one field
/// short of the expected count has already been closed; otherwise it is
/// literal field content. That rule, not line boundaries, is what decides
/// where rows end, so no quoting is needed around multi-line fields.
///
/// Input is pulled from any [`Read`] impl through a fixed-size chunk buffer;
/// field bytes accumulate in a scratch buffer that grows geometrically and
/// is reused for every field, and completed fields are copied into a row
/// buffer reused for every row. One instance therefore performs a constant
/// number of allocations regardless of input size, but the [`Row`] handed
/// out is only valid until the next row is read.
///
/// # Examples
/// ```
/// use dsv_stream::Reader;
///
/// let input = "1000|first string|final string\n\
///              1001|second string\nthat is multi-line|final string\n";
/// let mut reader = Reader::new(input.as_bytes(), 3);
/// let mut cells = Vec::new();
/// reader
///     .read_all(|row| {
///         cells.push(String::from_utf8_lossy(&row[1]).into_owned());
///     })
///     .unwrap();
/// assert_eq!(cells, ["first string", "second string\nthat is multi-line"]);
/// ```
pub struct Reader<R> {
    src: R,
    separator: u8,
    skip_heading: bool,
    buffer_size: usize,
    chunk: Vec<u8>,
    chunk_pos: usize,
    chunk_len: usize,
    field: FieldBuf,
    row: Row,
    expected: usize,
    closed: usize,
    headings: Option<Vec<SmolStr>>,
    rows_read: u64,
    started: bool,
    done: bool,
}

impl<R: Read> Reader<R> {
    /// Reader over `src` expecting `fields` fields per row, with default
    /// separator and buffer size.
    pub fn new(src: R, fields: usize) -> Self {
        Self::with_options(src, ReadOptions::new().with_fields(fields))
    }

    pub fn with_options(src: R, options: ReadOptions) -> Self {
        Self {
            src,
            separator: options.separator,
            skip_heading: options.skip_heading,
            buffer_size: options.buffer_size,
            chunk: vec![0; options.buffer_size],
            chunk_pos: 0,
            chunk_len: 0,
            field: FieldBuf::with_capacity(options.buffer_size),
            row: Row::with_fields(options.fields),
            expected: options.fields,
            closed: 0,
            headings: None,
            rows_read: 0,
            started: false,
            done: false,
        }
    }

    /// Pull the next row, or `None` at a clean end of stream.
    ///
    /// The returned [`Row`] borrows the reader's reusable buffers and is
    /// overwritten by the next call. Any error is terminal for the pass;
    /// subsequent calls return `None`.
    pub fn read_row(&mut self) -> Result<Option<&Row>> {
        if self.done {
            return Ok(None);
        }
        match self.advance() {
            Ok(true) => Ok(Some(&self.row)),
            Ok(false) => {
                self.done = true;
                Ok(None)
            }
            Err(err) => {
                self.done = true;
                Err(err)
            }
        }
    }

    /// Drain the stream, invoking `on_row` once per row in input order.
    ///
    /// The row passed to the consumer is ephemeral: it must not be retained
    /// past the call, since its cells are rewritten for the next row.
    pub fn read_all<F>(&mut self, mut on_row: F) -> Result<()>
    where
        F: FnMut(&Row),
    {
        while let Some(row) = self.read_row()? {
            on_row(row);
        }
        Ok(())
    }

    /// Heading cell names, once a heading line has been consumed.
    pub fn headings(&self) -> Option<&[SmolStr]> {
        self.headings.as_deref()
    }

    /// Fields per row: the configured count, or the inferred one after the
    /// heading has been read. Zero while still unknown.
    pub fn fields(&self) -> usize {
        self.expected
    }

    /// Rows emitted so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.started {
            self.start()?;
        }
        loop {
            if self.chunk_pos >= self.chunk_len {
                if !self.fill()? {
                    return self.flush_pending();
                }
            }
            if self.scan_chunk()? {
                return Ok(true);
            }
        }
    }

    /// Configuration checks and heading negotiation, before any data byte.
    fn start(&mut self) -> Result<()> {
        self.started = true;
        if self.expected == 0 && !self.skip_heading {
            return Err(Error::UnsetFieldCount);
        }
        if self.expected > 0 {
            self.check_buffer()?;
        } else if self.buffer_size == 0 {
            return Err(Error::BufferTooSmall {
                fields: 1,
                buffer_size: 0,
            });
        }
        if self.skip_heading {
            self.consume_heading()?;
        }
        Ok(())
    }

    /// The chunk buffer must hold a worst-case all-empty row: N - 1
    /// separators plus the terminator.
    fn check_buffer(&self) -> Result<()> {
        if self.expected > self.buffer_size / 2 {
            return Err(Error::BufferTooSmall {
                fields: self.expected,
                buffer_size: self.buffer_size,
            });
        }
        Ok(())
    }

    /// Scan `chunk[chunk_pos..chunk_len]`, returning `true` once a row has
    /// been completed. Literal runs between interesting bytes are appended
    /// to the accumulator in bulk.
    fn scan_chunk(&mut self) -> Result<bool> {
        while self.chunk_pos < self.chunk_len {
            let haystack = &self.chunk[self.chunk_pos..self.chunk_len];
            let Some(off) = memchr3(self.separator, b'\n', b'\r', haystack) else {
                self.field.extend(haystack);
                self.chunk_pos = self.chunk_len;
                return Ok(false);
            };
            let byte = haystack[off];
            self.field.extend(&haystack[..off]);
            self.chunk_pos += off + 1;
            if byte == self.separator {
                self.close_on_separator()?;
            } else if byte == b'\n' && self.closed == self.expected - 1 {
                self.close_field();
                self.closed = 0;
                self.rows_read += 1;
                return Ok(true);
            } else if byte == b'\n' {
                // short of the expected count: the newline is field content
                self.field.push(b'\n');
            }
            // carriage returns are consumed and dropped
        }
        Ok(false)
    }

    /// A separator may never close the final field: that would leave at
    /// least one more field than expected on this row.
    fn close_on_separator(&mut self) -> Result<()> {
        if self.closed + 1 >= self.expected {
            return Err(Error::FieldOverflow {
                row: self.rows_read + 1,
                expected: self.expected,
                found: self.expected + 1,
            });
        }
        self.close_field();
        Ok(())
    }

    /// Copy the accumulator window into the next row cell and reset it.
    /// The cell is rebuilt rather than aliased so the accumulator can be
    /// reused immediately.
    fn close_field(&mut self) {
        let cell = self.row.cell_mut(self.closed);
        cell.clear();
        cell.extend_from_slice(self.field.window());
        self.field.reset();
        self.closed += 1;
    }

    /// End of stream: a trailing row without a terminating newline is still
    /// a row, provided closing the pending field completes exactly the
    /// expected count. Anything shorter is truncation, not a row.
    fn flush_pending(&mut self) -> Result<bool> {
        if self.closed == 0 && !self.field.has_pending() {
            return Ok(false);
        }
        if self.closed == self.expected - 1 {
            self.close_field();
            self.closed = 0;
            self.rows_read += 1;
            return Ok(true);
        }
        Err(Error::TruncatedRow {
            row: self.rows_read + 1,
            expected: self.expected,
            found: self.closed + 1,
        })
    }

    /// Consume the first line, dropping carriage returns, and fix the field
    /// count from it: adopt the heading's count when none was configured,
    /// otherwise require an exact match.
    fn consume_heading(&mut self) -> Result<()> {
        let mut saw_bytes = false;
        loop {
            if self.chunk_pos >= self.chunk_len {
                if !self.fill()? {
                    break;
                }
            }
            saw_bytes = true;
            let haystack = &self.chunk[self.chunk_pos..self.chunk_len];
            match memchr2(b'\n', b'\r', haystack) {
                None => {
                    self.field.extend(haystack);
                    self.chunk_pos = self.chunk_len;
                }
                Some(off) => {
                    let byte = haystack[off];
                    self.field.extend(&haystack[..off]);
                    self.chunk_pos += off + 1;
                    if byte == b'\n' {
                        return self.adopt_heading();
                    }
                }
            }
        }
        if !saw_bytes {
            // empty stream: nothing to skip, nothing to infer from
            if self.expected == 0 {
                return Err(Error::UnsetFieldCount);
            }
            return Ok(());
        }
        self.adopt_heading()
    }

    fn adopt_heading(&mut self) -> Result<()> {
        let line = self.field.window();
        let mut names = Vec::new();
        let mut start = 0;
        for idx in memchr::memchr_iter(self.separator, line) {
            names.push(SmolStr::new(String::from_utf8_lossy(&line[start..idx])));
            start = idx + 1;
        }
        names.push(SmolStr::new(String::from_utf8_lossy(&line[start..])));
        let found = names.len();
        if self.expected == 0 {
            self.expected = found;
            self.row.resize(found);
            self.check_buffer()?;
        } else if found != self.expected {
            return Err(Error::HeadingMismatch {
                expected: self.expected,
                found,
            });
        }
        self.headings = Some(names);
        self.field.reset();
        Ok(())
    }

    /// Refill the chunk buffer. `false` means end of stream; interrupted
    /// reads are retried, every other failure propagates verbatim.
    fn fill(&mut self) -> Result<bool> {
        loop {
            match self.src.read(&mut self.chunk) {
                Ok(0) => return Ok(false),
                Ok(read) => {
                    self.chunk_len = read;
                    self.chunk_pos = 0;
                    return Ok(true);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(Error::Io(err)),
            }
        }
    }
}
