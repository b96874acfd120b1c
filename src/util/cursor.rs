// Bounds-checked forward reader over an in-memory tag buffer

/// A read past the end of the buffer.
///
/// Callers treat this as "the tag is truncated, stop parsing", not as a
/// fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underrun;

/// Forward-only cursor over a tag region.
///
/// The position only ever moves forward and never exceeds the buffer
/// length. A failed read leaves the position untouched.
#[derive(Debug)]
pub struct TagCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> TagCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        TagCursor {
            buffer,
            position: 0,
        }
    }

    /// Next `n` bytes, advancing the position by `n`.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Underrun> {
        if n > self.remaining() {
            return Err(Underrun);
        }
        let start = self.position;
        self.position += n;
        Ok(&self.buffer[start..self.position])
    }

    pub fn read_u8(&mut self) -> Result<u8, Underrun> {
        Ok(self.read_bytes(1)?[0])
    }

    /// 4-byte big-endian unsigned integer.
    pub fn read_u32_be(&mut self) -> Result<u32, Underrun> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Bytes up to (not including) the next NUL terminator of the given
    /// width, advancing past the terminator. UTF-16 strings are terminated
    /// by an aligned double NUL, everything else by a single zero byte.
    pub fn read_terminated(&mut self, nul_width: usize) -> Result<&'a [u8], Underrun> {
        let rest = &self.buffer[self.position..];
        let mut offset = 0;
        while offset + nul_width <= rest.len() {
            if rest[offset..offset + nul_width].iter().all(|&b| b == 0) {
                let value = &rest[..offset];
                self.position += offset + nul_width;
                return Ok(value);
            }
            offset += nul_width;
        }
        Err(Underrun)
    }

    /// Advance by `n`, clamped to the end of the buffer.
    pub fn skip(&mut self, n: usize) {
        self.position = (self.position + n).min(self.buffer.len());
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }
}
