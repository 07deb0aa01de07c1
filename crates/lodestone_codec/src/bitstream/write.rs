//! Write side of the stream.
//!
//! ## Field placement
//!
//! A field is the bit range `[bit_index, bit_index + count)` of a value. Its
//! most significant bits go first, into the high end of the cursor's word:
//!
//! ```text
//!  free = 32 - bit_offset, take = min(free, remaining)
//!
//!  word:  [ written | field bits (take) | zero ... ]
//!           31 ...   ^free-1     ^free-take
//! ```
//!
//! Whatever does not fit continues at bit 31 of the next word. 64-bit values
//! are written as their low 32-bit half followed by their high half.

use bytemuck::Pod;

use super::masks::mask;
use super::{check_bit_range, slice_range, BitField, BitStream};
use crate::error::BitStreamResult;
use crate::WORD_BITS;

impl BitStream {
    /// Writes every bit of `value`.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed.
    pub fn write<T: BitField>(&mut self, value: T) -> BitStreamResult<()> {
        self.write_partial(value, 0, T::BITS)
    }

    /// Writes `count` bits of `value`, starting at its bit `bit_index`.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed,
    /// [`crate::BitStreamError::InvalidBitRange`] if the field does not fit in
    /// `T`.
    pub fn write_partial<T: BitField>(
        &mut self,
        value: T,
        bit_index: u32,
        count: u32,
    ) -> BitStreamResult<()> {
        self.ensure_open()?;
        check_bit_range(bit_index, count, T::BITS)?;
        self.put_raw(value.to_raw(), bit_index, count);
        Ok(())
    }

    /// Writes every element of `values` in order.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed.
    pub fn write_slice<T: BitField>(&mut self, values: &[T]) -> BitStreamResult<()> {
        self.write_slice_range(values, 0, values.len())
    }

    /// Writes `count` elements of `values`, starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed,
    /// [`crate::BitStreamError::InvalidSliceRange`] if the range exceeds
    /// `values`.
    pub fn write_slice_range<T: BitField>(
        &mut self,
        values: &[T],
        offset: usize,
        count: usize,
    ) -> BitStreamResult<()> {
        self.ensure_open()?;
        let range = slice_range(values.len(), offset, count)?;
        for &value in &values[range] {
            self.put_raw(value.to_raw(), 0, T::BITS);
        }
        Ok(())
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed.
    pub fn write_byte(&mut self, value: u8) -> BitStreamResult<()> {
        self.write(value)
    }

    /// Writes raw bytes, e.g. a datagram received off a socket.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> BitStreamResult<()> {
        self.write_slice(bytes)
    }

    /// Writes `count` bytes of `bytes`, starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed,
    /// [`crate::BitStreamError::InvalidSliceRange`] if the range exceeds
    /// `bytes`.
    pub fn write_bytes_range(
        &mut self,
        bytes: &[u8],
        offset: usize,
        count: usize,
    ) -> BitStreamResult<()> {
        self.write_slice_range(bytes, offset, count)
    }

    /// Writes a Pod type as its in-memory bytes.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed.
    pub fn write_pod<T: Pod>(&mut self, value: &T) -> BitStreamResult<()> {
        self.write_bytes(bytemuck::bytes_of(value))
    }

    /// Writes an already validated field of up to 64 bits.
    pub(super) fn put_raw(&mut self, raw: u64, bit_index: u32, count: u32) {
        let mut written = 0;
        if bit_index < WORD_BITS {
            written = count.min(WORD_BITS - bit_index);
            #[allow(clippy::cast_possible_truncation)]
            let low = raw as u32;
            self.put_word_bits(low, bit_index, written);
        }
        if written < count {
            #[allow(clippy::cast_possible_truncation)]
            let high = (raw >> WORD_BITS) as u32;
            self.put_word_bits(high, bit_index.saturating_sub(WORD_BITS), count - written);
        }
    }

    /// Writes bits `[bit_index, bit_index + count)` of `value` at the cursor.
    ///
    /// Requires `bit_index + count <= 32`.
    fn put_word_bits(&mut self, value: u32, bit_index: u32, count: u32) {
        let mut remaining = count;
        while remaining > 0 {
            let free = WORD_BITS - self.bit_offset;
            let take = remaining.min(free);
            let shift = free - take;
            let chunk = (value >> (bit_index + remaining - take)) & mask(take);

            let start = self.cursor();
            let overwriting = start < self.len;
            let word = self.current_word_mut();
            if overwriting {
                *word &= !(mask(take) << shift);
            }
            *word |= chunk << shift;

            let end = start + u64::from(take);
            if end > self.len {
                self.len = end;
            }
            self.advance(take);
            remaining -= take;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BitStreamError;

    #[test]
    fn test_first_bits_fill_word_from_the_top() {
        let mut stream = BitStream::new();
        stream.write_partial(0b101u32, 0, 3).unwrap();
        assert_eq!(stream.words[0], 0b101 << 29);
        assert_eq!(stream.len().unwrap(), 3);
        assert_eq!(stream.position().unwrap(), 3);
    }

    #[test]
    fn test_byte_lands_in_big_endian_order() {
        let mut stream = BitStream::new();
        stream.write_bytes(&[0x12, 0x34, 0x56, 0x78, 0x9A]).unwrap();
        assert_eq!(stream.words[0], 0x1234_5678);
        assert_eq!(stream.words[1], 0x9A00_0000);
        assert_eq!(stream.len().unwrap(), 40);
    }

    #[test]
    fn test_field_spans_word_boundary() {
        let mut stream = BitStream::new();
        stream.write_partial(0u32, 0, 28).unwrap();
        stream.write(0xABCDu16).unwrap();
        // High 4 bits close word 0, the remaining 12 open word 1.
        assert_eq!(stream.words[0] & 0xF, 0xA);
        assert_eq!(stream.words[1], 0xBCD << 20);
        assert_eq!(stream.len().unwrap(), 44);
    }

    #[test]
    fn test_partial_field_uses_bit_index() {
        let mut stream = BitStream::new();
        // Bits 4..8 of 0xA5 are 0b1010.
        stream.write_partial(0xA5u8, 4, 4).unwrap();
        assert_eq!(stream.words[0], 0b1010 << 28);
    }

    #[test]
    fn test_overwrite_clears_destination_bits() {
        let mut stream = BitStream::new();
        stream.write(u32::MAX).unwrap();
        stream.set_position(8).unwrap();
        stream.write(0u8).unwrap();
        assert_eq!(stream.words[0], 0xFF00_FFFF);
        assert_eq!(stream.len().unwrap(), 32);
        assert_eq!(stream.position().unwrap(), 16);
    }

    #[test]
    fn test_overwrite_past_end_extends_length() {
        let mut stream = BitStream::new();
        stream.write(0xFFu8).unwrap();
        stream.set_position(4).unwrap();
        stream.write(0u8).unwrap();
        assert_eq!(stream.len().unwrap(), 12);
        assert_eq!(stream.words[0], 0xF000_0000);
    }

    #[test]
    fn test_u64_is_written_low_half_first() {
        let mut stream = BitStream::new();
        stream.write(0x1111_2222_3333_4444u64).unwrap();
        assert_eq!(stream.words[0], 0x3333_4444);
        assert_eq!(stream.words[1], 0x1111_2222);
    }

    #[test]
    fn test_u64_field_in_high_half_only() {
        let mut stream = BitStream::new();
        stream.write_partial(0xF0_0000_0000u64, 36, 4).unwrap();
        assert_eq!(stream.words[0], 0xF000_0000);
        assert_eq!(stream.len().unwrap(), 4);
    }

    #[test]
    fn test_stream_grows_on_demand() {
        let mut stream = BitStream::new();
        stream.write_slice(&[1u32, 2, 3, 4, 5]).unwrap();
        assert!(stream.capacity().unwrap() >= 160);
        assert_eq!(stream.words[..5], [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_invalid_arguments_leave_stream_untouched() {
        let mut stream = BitStream::new();
        stream.write(0x7Fu8).unwrap();

        assert_eq!(
            stream.write_partial(0u8, 4, 5),
            Err(BitStreamError::InvalidBitRange { bit_index: 4, count: 5, width: 8 })
        );
        assert_eq!(
            stream.write_slice_range(&[1u16, 2], 1, 2),
            Err(BitStreamError::InvalidSliceRange { offset: 1, count: 2, len: 2 })
        );
        assert_eq!(stream.len().unwrap(), 8);
        assert_eq!(stream.position().unwrap(), 8);
        assert_eq!(stream.words[0], 0x7F00_0000);
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut stream = BitStream::new();
        stream.close();
        assert_eq!(stream.write(true), Err(BitStreamError::Closed));
        assert_eq!(stream.write_bytes(&[1]), Err(BitStreamError::Closed));
    }

    #[test]
    fn test_zero_count_is_a_no_op() {
        let mut stream = BitStream::new();
        stream.write_partial(u64::MAX, 64, 0).unwrap();
        stream.write_slice::<u8>(&[]).unwrap();
        assert_eq!(stream.len().unwrap(), 0);
    }
}
