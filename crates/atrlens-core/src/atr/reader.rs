/// Forward-only cursor over the normalized ATR bytes.
pub struct AtrReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> AtrReader<'a> {
    pub fn starting_at(bytes: &'a [u8], pos: usize) -> Self {
        Self {
            bytes,
            pos: pos.min(bytes.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    pub fn next_byte(&mut self) -> Option<u8> {
        let value = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(value)
    }

    /// Take up to `len` bytes; fewer are returned when the input ends first.
    pub fn take_up_to(&mut self, len: usize) -> &'a [u8] {
        let end = self.pos.saturating_add(len).min(self.bytes.len());
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        slice
    }
}
