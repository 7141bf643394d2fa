// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Forward-only, bounds-checked reader over an immutable byte buffer.

use ippspool_core::DecodeError;

/// Read position over a borrowed buffer.  The position never moves
/// backwards; every read is checked against the end of the buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The next `n` bytes, without advancing.
    pub fn peek(&self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::TruncatedInput {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// The next `n` bytes, advancing past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read(1)?[0])
    }

    /// Big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.read(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.read(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Consume everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..];
        self.pos = self.data.len();
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_and_peeks_do_not() {
        let mut c = Cursor::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(c.peek(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(c.position(), 0);
        assert_eq!(c.read(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(c.position(), 2);
        assert_eq!(c.remaining(), 3);
    }

    #[test]
    fn big_endian_helpers() {
        let mut c = Cursor::new(&[0x01, 0x01, 0x00, 0x00, 0x00, 0x2a, 0xff]);
        assert_eq!(c.read_u16().unwrap(), 0x0101);
        assert_eq!(c.read_u32().unwrap(), 42);
        assert_eq!(c.read_u8().unwrap(), 0xff);
        assert!(c.is_empty());
    }

    #[test]
    fn short_read_reports_truncation_and_keeps_position() {
        let mut c = Cursor::new(&[0x00, 0x05, 0xaa]);
        c.read_u16().unwrap();
        let err = c.read(5).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedInput {
                offset: 2,
                needed: 5,
                remaining: 1
            }
        );
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn zero_length_read_at_end_is_fine() {
        let mut c = Cursor::new(&[]);
        assert_eq!(c.read(0).unwrap(), &[] as &[u8]);
        assert!(c.read_u8().is_err());
    }

    #[test]
    fn rest_drains_the_buffer() {
        let mut c = Cursor::new(b"\x03%PDF-1.7");
        c.read_u8().unwrap();
        assert_eq!(c.rest(), b"%PDF-1.7");
        assert!(c.is_empty());
        assert_eq!(c.rest(), b"");
    }
}
