pub mod constants;
pub mod error;
pub mod options;
pub mod read;
pub mod row;
pub mod write;

use std::io::Read;

pub use smol_str::SmolStr;

pub use crate::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_SEPARATOR};
pub use crate::error::Error;
pub use crate::options::ReadOptions;
pub use crate::read::{LineReader, Reader};
pub use crate::row::Row;
pub use crate::write::Writer;

pub type Result<T> = std::result::Result<T, Error>;

/// Stream `src` with default options and `fields` fields per row, invoking
/// `on_row` once per completed row.
pub fn read_records<R, F>(src: R, fields: usize, on_row: F) -> Result<()>
where
    R: Read,
    F: FnMut(&Row),
{
    Reader::new(src, fields).read_all(on_row)
}

pub fn read_records_with_options<R, F>(src: R, options: ReadOptions, on_row: F) -> Result<()>
where
    R: Read,
    F: FnMut(&Row),
{
    Reader::with_options(src, options).read_all(on_row)
}
