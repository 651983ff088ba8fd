use crate::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_SEPARATOR};

/// Configuration for a [`Reader`](crate::Reader) pass.
///
/// # Examples
/// ```
/// use dsv_stream::ReadOptions;
///
/// let options = ReadOptions::new()
///     .with_separator(b',')
///     .with_fields(20)
///     .with_skip_heading(true);
/// assert_eq!(options.separator, b',');
/// ```
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field separator byte.
    pub separator: u8,
    /// Expected fields per row. Zero means infer from the heading, which
    /// requires `skip_heading`.
    pub fields: usize,
    /// Consume the first line as a heading before any data row.
    pub skip_heading: bool,
    /// Capacity of the chunk buffer refilled from the byte source.
    pub buffer_size: usize,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_fields(mut self, fields: usize) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_skip_heading(mut self, skip_heading: bool) -> Self {
        self.skip_heading = skip_heading;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            fields: 0,
            skip_heading: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
