//! Read side of the stream, the mirror image of `write.rs`.
//!
//! Reads walk the words exactly like writes do and refill the field from its
//! most significant requested bit downwards. At the end of the stream they
//! stop early and report how many bits they got; the bits they never reached
//! stay zero.

use bytemuck::Pod;

use super::masks::mask;
use super::{check_bit_range, slice_range, BitField, BitStream};
use crate::error::{BitStreamError, BitStreamResult};
use crate::WORD_BITS;

impl BitStream {
    /// Reads a whole `T`.
    ///
    /// Returns the value and the number of bits read, which is `0` at the end
    /// of the stream and less than `T::BITS` if the stream ended mid-value.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed,
    /// [`BitStreamError::InvalidChar`] if a `char` decodes to an invalid
    /// scalar value.
    pub fn read<T: BitField>(&mut self) -> BitStreamResult<(T, u32)> {
        self.read_partial(0, T::BITS)
    }

    /// Reads `count` bits into bits `[bit_index, bit_index + count)` of a
    /// zeroed `T`.
    ///
    /// Returns the value and the number of bits read.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed,
    /// [`BitStreamError::InvalidBitRange`] if the field does not fit in `T`,
    /// [`BitStreamError::InvalidChar`] if a `char` decodes to an invalid
    /// scalar value.
    pub fn read_partial<T: BitField>(
        &mut self,
        bit_index: u32,
        count: u32,
    ) -> BitStreamResult<(T, u32)> {
        self.ensure_open()?;
        check_bit_range(bit_index, count, T::BITS)?;
        let (raw, read) = self.take_raw(bit_index, count);
        Ok((decode(raw)?, read))
    }

    /// Fills `out` from the stream, stopping at the end of the stream.
    ///
    /// Returns the number of bits read.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed,
    /// [`BitStreamError::InvalidChar`] on an invalid `char`.
    pub fn read_slice<T: BitField>(&mut self, out: &mut [T]) -> BitStreamResult<u64> {
        let len = out.len();
        self.read_slice_range(out, 0, len)
    }

    /// Fills `count` elements of `out`, starting at `offset`.
    ///
    /// Returns the number of bits read. An element the stream ended inside of
    /// is stored with the bits that were available.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed,
    /// [`BitStreamError::InvalidSliceRange`] if the range exceeds `out`,
    /// [`BitStreamError::InvalidChar`] on an invalid `char`.
    pub fn read_slice_range<T: BitField>(
        &mut self,
        out: &mut [T],
        offset: usize,
        count: usize,
    ) -> BitStreamResult<u64> {
        self.ensure_open()?;
        let range = slice_range(out.len(), offset, count)?;
        let mut total = 0u64;
        for slot in &mut out[range] {
            let (raw, read) = self.take_raw(0, T::BITS);
            if read == 0 {
                break;
            }
            *slot = decode(raw)?;
            total += u64::from(read);
            if read < T::BITS {
                break;
            }
        }
        Ok(total)
    }

    /// Reads one byte, or `None` at the end of the stream.
    ///
    /// A trailing partial byte comes back with its missing low bits zeroed.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn read_byte(&mut self) -> BitStreamResult<Option<u8>> {
        let (byte, read) = self.read::<u8>()?;
        Ok((read > 0).then_some(byte))
    }

    /// Reads a Pod type from its in-memory bytes.
    ///
    /// Returns `None`, leaving the cursor where it was, if fewer than
    /// `size_of::<T>()` bytes remain.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn read_pod<T: Pod>(&mut self) -> BitStreamResult<Option<T>> {
        self.ensure_open()?;
        let needed = (std::mem::size_of::<T>() as u64) * 8;
        if self.remaining() < needed {
            return Ok(None);
        }
        let mut value = T::zeroed();
        self.read_slice(bytemuck::bytes_of_mut(&mut value))?;
        Ok(Some(value))
    }

    /// Reads an already validated field of up to 64 bits.
    pub(super) fn take_raw(&mut self, bit_index: u32, count: u32) -> (u64, u32) {
        let mut raw = 0u64;
        let mut read = 0;
        if bit_index < WORD_BITS {
            let low_count = count.min(WORD_BITS - bit_index);
            let (low, got) = self.take_word_bits(bit_index, low_count);
            raw |= u64::from(low);
            read = got;
            if got < low_count {
                return (raw, read);
            }
        }
        if read < count {
            let high_index = bit_index.saturating_sub(WORD_BITS);
            let (high, got) = self.take_word_bits(high_index, count - read);
            raw |= u64::from(high) << WORD_BITS;
            read += got;
        }
        (raw, read)
    }

    /// Reads up to `count` bits from the cursor into bits
    /// `[bit_index, bit_index + count)` of a zeroed word.
    ///
    /// Requires `bit_index + count <= 32`.
    fn take_word_bits(&mut self, bit_index: u32, count: u32) -> (u32, u32) {
        let mut value = 0u32;
        let mut remaining = count;
        while remaining > 0 {
            let available = u32::try_from(self.remaining()).unwrap_or(u32::MAX);
            if available == 0 {
                break;
            }
            let free = WORD_BITS - self.bit_offset;
            let take = remaining.min(free).min(available);
            let shift = free - take;
            let chunk = (self.words[self.word_index] >> shift) & mask(take);
            value |= chunk << (bit_index + remaining - take);

            self.advance(take);
            remaining -= take;
        }
        (value, count - remaining)
    }
}

/// Rebuilds a value; only `char` can reject its bits.
fn decode<T: BitField>(raw: u64) -> BitStreamResult<T> {
    #[allow(clippy::cast_possible_truncation)]
    T::from_raw(raw).ok_or(BitStreamError::InvalidChar(raw as u32))
}
