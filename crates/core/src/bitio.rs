//! Bit-level I/O utilities for reading and writing individual bits.
//!
//! `BitWriter` serializes Huffman codes and `BitReader` walks them back.
//! Both operate in MSB-first (most significant bit first) order.
//!
//! # Padding Rules
//! - BitWriter: pads incomplete bytes with trailing zeros, both on `finish`
//!   and when flushed to a byte boundary ahead of an escaped raw value
//! - BitReader: padding bits are indistinguishable from data, so a reader can
//!   be bounded to an exact bit length with [`BitReader::with_bit_len`]
//!
//! # Example
//! ```
//! use symcodec_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! // Total: 10111 -> padded to 10111000
//!
//! let bytes = writer.finish();
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - `bit_buffer` holds exactly `bit_count` meaningful bits, MSB-aligned
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::with_output(Vec::new())
    }

    /// Create a BitWriter that appends to existing output.
    ///
    /// The existing bytes are kept as-is; new bits start on a fresh byte.
    pub fn with_output(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Take the top bits_to_write of what is left
            let shift = remaining - bits_to_write;
            let bits = ((value >> shift) & ((1u64 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(u64::from(bit), 1)
    }

    /// Pad the current partial byte with zeros and push it to the output.
    ///
    /// Does nothing when already on a byte boundary.
    pub fn flush(&mut self) {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Flush to a byte boundary and expose the underlying bytes.
    ///
    /// Used to append raw, non-bit-packed data (escaped symbols) directly to
    /// the output. Writing resumes on a fresh byte afterwards.
    pub fn aligned_output(&mut self) -> &mut Vec<u8> {
        self.flush();
        &mut self.bytes
    }

    /// Finish writing and return the output bytes.
    ///
    /// Any remaining bits are padded with trailing zeros.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.bytes
    }

    /// Return the number of complete bytes written so far.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position <= bit_len <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Number of readable bits
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader over every bit of the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_len: data.len() * 8,
            bit_position: 0,
        }
    }

    /// Create a BitReader that stops after `bit_len` bits.
    ///
    /// `bit_len` is clamped to the bits actually present in `data`.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Self {
        Self {
            data,
            bit_len: bit_len.min(data.len() * 8),
            bit_position: 0,
        }
    }

    /// Read up to 64 bits from the input.
    ///
    /// Bits are read MSB-first. For example, reading 3 bits from byte 0b10110000
    /// returns 0b101.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::InsufficientBits` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::InsufficientBits {
                requested: count,
                available,
            }
            .into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = self.bit_position / 8;
            let bit_offset = self.bit_position % 8;

            let bits_in_byte = 8 - bit_offset;
            let bits_to_read = remaining.min(bits_in_byte);

            let byte = self.data[byte_idx];
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (byte >> (bits_in_byte - bits_to_read)) & mask;

            result = (result << bits_to_read) | u64::from(bits);

            self.bit_position += bits_to_read;
            remaining -= bits_to_read;
        }

        Ok(result)
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` when the reader is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.is_empty() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.bit_position / 8];
        let bit = (byte >> (7 - self.bit_position % 8)) & 1;
        self.bit_position += 1;
        Ok(bit == 1)
    }

    /// Move the cursor to an absolute bit position.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.bit_len {
            return Err(BitIoError::PositionOutOfRange {
                position,
                len: self.bit_len,
            }
            .into());
        }
        self.bit_position = position;
        Ok(())
    }

    /// Skip padding up to the next byte boundary (no-op when aligned).
    pub fn align_to_byte(&mut self) {
        let aligned = self.bit_position.div_ceil(8) * 8;
        self.bit_position = aligned.min(self.bit_len);
    }

    /// Index of the first byte not yet touched by the cursor.
    pub fn byte_position(&self) -> usize {
        self.bit_position.div_ceil(8)
    }

    /// Return the number of bits remaining.
    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if we're at the end of the readable bits.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_partial_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11, 2).unwrap();
        writer.write_bits(0b000, 3).unwrap();

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10111000]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(2).unwrap(), 0b11);
        assert_eq!(reader.read_bits(3).unwrap(), 0b000);
    }

    #[test]
    fn test_padding() {
        let mut writer = BitWriter::new();
        writer.write_bit(true).unwrap();

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10000000]);
    }

    #[test]
    fn test_multi_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1010101111110000, 16).unwrap();

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10101011, 0b11110000]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(16).unwrap(), 0b1010101111110000);
    }

    #[test]
    fn test_read_past_end() {
        let data = vec![0b10101010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(8).unwrap(), 0b10101010);
        assert!(reader.read_bits(1).is_err());
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_64_bit_values() {
        let mut writer = BitWriter::new();
        let val = 0x123456789ABCDEF0u64;
        writer.write_bits(val, 64).unwrap();

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(64).unwrap(), val);
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new();
        assert!(writer.write_bits(0, 65).is_err());
    }

    #[test]
    fn test_flush_then_raw_bytes() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b11, 2).unwrap();
        writer.aligned_output().push(0xAB);
        writer.write_bits(0b1, 1).unwrap();

        assert_eq!(writer.finish(), vec![0b11000000, 0xAB, 0b10000000]);
    }

    #[test]
    fn test_flush_when_aligned_is_noop() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFF, 8).unwrap();
        writer.flush();
        assert_eq!(writer.bit_len(), 8);
        assert_eq!(writer.byte_len(), 1);
    }

    #[test]
    fn test_with_output_appends() {
        let mut writer = BitWriter::with_output(vec![7]);
        writer.write_bits(0b1, 1).unwrap();
        assert_eq!(writer.finish(), vec![7, 0b10000000]);
    }

    #[test]
    fn test_bounded_reader() {
        let data = [0xFF, 0xFF];
        let mut reader = BitReader::with_bit_len(&data, 11);

        assert_eq!(reader.bits_remaining(), 11);
        reader.read_bits(10).unwrap();
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_empty());
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_set_position_and_align() {
        let data = [0b0000_0001, 0b1000_0000];
        let mut reader = BitReader::new(&data);

        reader.set_position(7).unwrap();
        assert!(reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());

        reader.align_to_byte();
        assert_eq!(reader.position(), 16);
        assert_eq!(reader.byte_position(), 2);
        assert!(reader.set_position(17).is_err());
    }

    #[test]
    fn test_bits_remaining() {
        let data = vec![0xFF, 0xFF];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.bits_remaining(), 16);
        reader.read_bits(5).unwrap();
        assert_eq!(reader.bits_remaining(), 11);
        assert_eq!(reader.byte_position(), 1);
        reader.read_bits(11).unwrap();
        assert_eq!(reader.bits_remaining(), 0);
        assert!(reader.is_empty());
    }
}
