//! Fixed staging buffer and bit packing.
//!
//! [`Stage`] is the single output buffer for both marker segments and
//! entropy-coded data; its capacity is sized for the largest possible
//! header (color SOI..SOS plus a full 16-byte comment). [`BitPacker`]
//! appends Huffman codes MSB-first and byte-stuffs entropy-coded data
//! (0xFF -> 0xFF 0x00) as completed bytes are flushed into the stage.

use crate::error::{EncodeError, Result};

/// Staging buffer capacity: 607-byte color header + 20-byte COM segment.
pub const STAGE_CAPACITY: usize = 627;

/// Fixed-capacity output staging buffer with checked appends.
pub(crate) struct Stage {
    buf: [u8; STAGE_CAPACITY],
    len: usize,
}

impl Stage {
    pub(crate) const fn new() -> Self {
        Self {
            buf: [0; STAGE_CAPACITY],
            len: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub(crate) fn put(&mut self, byte: u8) -> Result<()> {
        if self.len >= STAGE_CAPACITY {
            return Err(EncodeError::BufferOverflow);
        }
        self.buf[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if self.len + bytes.len() > STAGE_CAPACITY {
            return Err(EncodeError::BufferOverflow);
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Append a big-endian u16 (marker and length fields).
    pub(crate) fn put_u16(&mut self, v: u16) -> Result<()> {
        self.put((v >> 8) as u8)?;
        self.put(v as u8)
    }
}

/// Bit accumulator for entropy-coded output. At most 7 bits are ever
/// pending between calls; completed bytes are flushed to the stage with
/// byte stuffing applied.
pub(crate) struct BitPacker {
    acc: u32,
    nbits: u8,
}

impl BitPacker {
    pub(crate) const fn new() -> Self {
        Self { acc: 0, nbits: 0 }
    }

    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.nbits = 0;
    }

    pub(crate) fn pending(&self) -> u8 {
        self.nbits
    }

    /// Append the low `count` bits of `bits` (MSB first, count <= 16).
    pub(crate) fn put_bits(&mut self, out: &mut Stage, bits: u16, count: u8) -> Result<()> {
        debug_assert!(count <= 16);
        if count == 0 {
            return Ok(());
        }
        let mask = if count == 16 { 0xFFFF } else { (1u16 << count) - 1 };
        self.acc = (self.acc << count) | (bits & mask) as u32;
        self.nbits += count;
        while self.nbits >= 8 {
            let byte = (self.acc >> (self.nbits - 8)) as u8;
            out.put(byte)?;
            if byte == 0xFF {
                out.put(0x00)?;
            }
            self.nbits -= 8;
        }
        // keep the accumulator bounded
        self.acc &= (1u32 << self.nbits) - 1;
        Ok(())
    }

    /// Pad the pending bits with 1s up to the next byte boundary.
    pub(crate) fn flush(&mut self, out: &mut Stage) -> Result<()> {
        if self.nbits > 7 {
            return Err(EncodeError::State("bit accumulator out of range"));
        }
        if self.nbits > 0 {
            let pad = 8 - self.nbits;
            self.put_bits(out, (1u16 << pad) - 1, pad)?;
        }
        Ok(())
    }
}
