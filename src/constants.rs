/// Separator byte used when none is configured.
pub const DEFAULT_SEPARATOR: u8 = b'|';

/// Chunk buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
