use std::io::{BufRead, BufReader, Read};

use smallvec::SmallVec;

use crate::options::ReadOptions;
use crate::{Error, Result};

type RowFields = SmallVec<[String; 16]>;

/// Line-splitting fallback reader.
///
/// Reads a whole line, splits it on the separator, and keeps pulling
/// continuation lines (joined back with a restored `\n`) until the field
/// count is satisfied. Simpler than the byte-level [`Reader`](crate::Reader)
/// but allocates a fresh row per call, so the streaming reader remains the
/// primary design.
///
/// Differences from the byte-level reader: the field count must be supplied
/// (no inference), a requested heading is discarded unvalidated, and
/// carriage returns are only trimmed at line ends rather than dropped
/// everywhere.
pub struct LineReader<R> {
    src: BufReader<R>,
    separator: char,
    expected: usize,
    skip_heading: bool,
    line: String,
    rows_read: u64,
    started: bool,
    done: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(src: R, fields: usize) -> Self {
        Self::with_options(src, ReadOptions::new().with_fields(fields))
    }

    pub fn with_options(src: R, options: ReadOptions) -> Self {
        Self {
            src: BufReader::new(src),
            separator: char::from(options.separator),
            expected: options.fields,
            skip_heading: options.skip_heading,
            line: String::new(),
            rows_read: 0,
            started: false,
            done: false,
        }
    }

    /// Read the next row, or `None` at a clean end of stream.
    ///
    /// As with the streaming reader, any error is terminal for the pass.
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.done {
            return Ok(None);
        }
        match self.next_row() {
            Ok(Some(row)) => Ok(Some(row)),
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(err) => {
                self.done = true;
                Err(err)
            }
        }
    }

    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if !self.started {
            if self.expected == 0 {
                return Err(Error::UnsetFieldCount);
            }
            self.started = true;
            if self.skip_heading && self.next_line()?.is_none() {
                return Ok(None);
            }
        }
        let sep = self.separator;
        let expected = self.expected;

        let mut fields: RowFields = match self.next_line()? {
            None => return Ok(None),
            Some(line) => line.split(sep).map(String::from).collect(),
        };
        while fields.len() < expected {
            match self.next_line()? {
                None => {
                    return Err(Error::TruncatedRow {
                        row: self.rows_read + 1,
                        expected,
                        found: fields.len(),
                    })
                }
                Some(line) => {
                    let mut parts = line.split(sep);
                    if let (Some(first), Some(last)) = (parts.next(), fields.last_mut()) {
                        last.push('\n');
                        last.push_str(first);
                    }
                    fields.extend(parts.map(String::from));
                }
            }
        }
        if fields.len() > expected {
            return Err(Error::FieldOverflow {
                row: self.rows_read + 1,
                expected,
                found: fields.len(),
            });
        }
        self.rows_read += 1;
        Ok(Some(fields.into_vec()))
    }

    /// Drain the stream, invoking `on_row` once per row in input order.
    pub fn read_all<F>(&mut self, mut on_row: F) -> Result<()>
    where
        F: FnMut(&[String]),
    {
        while let Some(row) = self.read_row()? {
            on_row(&row);
        }
        Ok(())
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn next_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        if self.src.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }
        Ok(Some(self.line.as_str()))
    }
}
