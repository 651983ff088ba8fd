/// Scratch buffer for the field currently being scanned.
///
/// Backing storage is allocated once and grows geometrically; the write
/// index is reset after every field close so the same allocation serves the
/// whole pass. Capacity never shrinks.
#[derive(Debug)]
pub(crate) struct FieldBuf {
    buf: Vec<u8>,
    wr_idx: usize,
}

impl FieldBuf {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1)],
            wr_idx: 0,
        }
    }

    /// Append a single byte, growing if the buffer is full.
    pub(crate) fn push(&mut self, byte: u8) {
        self.reserve(1);
        self.buf[self.wr_idx] = byte;
        self.wr_idx += 1;
    }

    /// Append a run of literal bytes in bulk.
    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.buf[self.wr_idx..self.wr_idx + bytes.len()].copy_from_slice(bytes);
        self.wr_idx += bytes.len();
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.wr_idx + additional;
        if needed > self.buf.len() {
            let grown = (self.buf.len() + self.buf.len() / 2).max(1);
            self.buf.resize(needed.max(grown), 0);
        }
    }

    /// Bytes written since the last reset.
    pub(crate) fn window(&self) -> &[u8] {
        &self.buf[..self.wr_idx]
    }

    pub(crate) fn reset(&mut self) {
        self.wr_idx = 0;
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.wr_idx != 0
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }
}
