//! Byte-level cursor and compact integer encodings.
//!
//! Escaped symbols are written as raw bytes between runs of Huffman bits,
//! so the fast decoder hands consumers a [`ByteReader`] positioned right
//! after the escape code's byte. The "flexible" encodings spend one byte on
//! small values and fall back to a marker plus a fixed-width value.
//!
//! # Formats
//!
//! ```text
//! flexible char:   v < 0xFF  -> [v]
//!                  otherwise -> [0xFF, b2, b1, b0]   (21-bit scalar, big-endian)
//! flexible short:  v < 0xFF  -> [v]
//!                  otherwise -> [0xFF, hi, lo]
//! booleans:        ceil(n / 8) bytes, MSB first
//! ```

use crate::error::{BitIoError, Result};

/// Marker byte that introduces a wide flexible value.
const WIDE: u8 = 0xFF;

/// Sequential reader over encoded bytes.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Next byte, or `None` at the end of input.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.position).copied()?;
        self.position += 1;
        Some(byte)
    }

    /// Next byte, failing at the end of input.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.next_byte().ok_or_else(|| BitIoError::UnexpectedEof.into())
    }

    /// Read `len` bytes as a slice.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(BitIoError::InsufficientBits {
                requested: len * 8,
                available: self.remaining() * 8,
            }
            .into());
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn read_flexible_char(&mut self) -> Result<char> {
        let first = self.read_u8()?;
        if first < WIDE {
            return Ok(char::from(first));
        }
        let bytes = self.read_slice(3)?;
        let value = u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2]);
        // Non-scalar values can only come from foreign input
        Ok(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    pub fn read_flexible_short(&mut self) -> Result<u16> {
        let first = self.read_u8()?;
        if first < WIDE {
            return Ok(u16::from(first));
        }
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read `count` booleans packed MSB first.
    pub fn read_booleans(&mut self, count: usize) -> Result<Vec<bool>> {
        let bytes = self.read_slice(count.div_ceil(8))?;
        Ok((0..count)
            .map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0)
            .collect())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(BitIoError::PositionOutOfRange {
                position,
                len: self.data.len(),
            }
            .into());
        }
        self.position = position;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }
}

pub fn write_flexible_char(output: &mut Vec<u8>, value: char) {
    let value = u32::from(value);
    if value < u32::from(WIDE) {
        output.push(value as u8);
    } else {
        output.push(WIDE);
        output.extend_from_slice(&value.to_be_bytes()[1..]);
    }
}

pub fn write_flexible_short(output: &mut Vec<u8>, value: u16) {
    if value < u16::from(WIDE) {
        output.push(value as u8);
    } else {
        output.push(WIDE);
        output.extend_from_slice(&value.to_be_bytes());
    }
}

pub fn write_booleans(output: &mut Vec<u8>, values: &[bool]) {
    for chunk in values.chunks(8) {
        let mut byte = 0u8;
        for (i, &value) in chunk.iter().enumerate() {
            if value {
                byte |= 0x80 >> i;
            }
        }
        output.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_char_sizes() {
        let mut output = Vec::new();
        write_flexible_char(&mut output, 'a');
        assert_eq!(output, vec![b'a']);

        output.clear();
        write_flexible_char(&mut output, 'ÿ');
        assert_eq!(output, vec![0xFF, 0x00, 0x00, 0xFF]);

        output.clear();
        write_flexible_char(&mut output, '😀');
        assert_eq!(output.len(), 4);
        assert_eq!(ByteReader::new(&output).read_flexible_char().unwrap(), '😀');
    }

    #[test]
    fn test_flexible_short_boundary() {
        let mut output = Vec::new();
        write_flexible_short(&mut output, 254);
        write_flexible_short(&mut output, 255);
        write_flexible_short(&mut output, 65535);
        assert_eq!(output, vec![254, 0xFF, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);

        let mut reader = ByteReader::new(&output);
        assert_eq!(reader.read_flexible_short().unwrap(), 254);
        assert_eq!(reader.read_flexible_short().unwrap(), 255);
        assert_eq!(reader.read_flexible_short().unwrap(), 65535);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_booleans_packing() {
        let values = [true, false, true, true, false, false, false, false, true];
        let mut output = Vec::new();
        write_booleans(&mut output, &values);
        assert_eq!(output, vec![0b1011_0000, 0b1000_0000]);

        let mut reader = ByteReader::new(&output);
        assert_eq!(reader.read_booleans(values.len()).unwrap(), values);
    }

    #[test]
    fn test_truncated_input() {
        let mut reader = ByteReader::new(&[0xFF, 0x01]);
        assert!(reader.read_flexible_char().is_err());

        let mut reader = ByteReader::new(&[]);
        assert!(reader.next_byte().is_none());
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_set_position() {
        let data = [1, 2, 3];
        let mut reader = ByteReader::new(&data);
        reader.set_position(2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 3);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.set_position(4).is_err());
    }
}
