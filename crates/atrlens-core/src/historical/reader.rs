/// Cursor over the historical bytes with zero-padding reads.
pub struct HistoricalReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HistoricalReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_len(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    pub fn next_byte(&mut self) -> Option<u8> {
        let value = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(value)
    }

    /// Read exactly `len` bytes, zero-filling past the end.
    ///
    /// Returns the bytes and how many of them were actually present.
    pub fn read_padded(&mut self, len: usize) -> (Vec<u8>, usize) {
        let end = (self.pos + len).min(self.bytes.len());
        let mut value = self.bytes[self.pos..end].to_vec();
        let present = value.len();
        value.resize(len, 0);
        self.pos = end;
        (value, present)
    }

    /// Split off the last `len` bytes: returns a reader over everything before
    /// them and the trailing slice.
    pub fn split_tail(&self, len: usize) -> Option<(HistoricalReader<'a>, &'a [u8])> {
        let rest = self.remaining();
        if rest.len() < len {
            return None;
        }
        let (head, tail) = rest.split_at(rest.len() - len);
        Some((HistoricalReader::new(head), tail))
    }
}

#[cfg(test)]
mod tests {
    use super::HistoricalReader;

    #[test]
    fn read_padded_fills_missing_with_zero() {
        let bytes = [0x41, 0x42];
        let mut reader = HistoricalReader::new(&bytes);
        let (value, present) = reader.read_padded(4);
        assert_eq!(value, [0x41, 0x42, 0, 0]);
        assert_eq!(present, 2);
        assert_eq!(reader.remaining_len(), 0);
    }

    #[test]
    fn split_tail_keeps_head_order() {
        let bytes = [1, 2, 3, 4, 5];
        let mut reader = HistoricalReader::new(&bytes);
        reader.next_byte();
        let (head, tail) = reader.split_tail(3).unwrap();
        assert_eq!(head.remaining(), &[2]);
        assert_eq!(tail, &[3, 4, 5]);
        assert!(reader.split_tail(5).is_none());
    }
}
