//! # Bit Stream
//!
//! Growable, bit-addressable buffer with a single read/write cursor.
//!
//! ## Design
//!
//! - Backing store is a `Vec<u32>` that only ever grows
//! - `len` counts written bits, independent of the allocation
//! - Cursor is `(word_index, bit_offset)` with `bit_offset < 32`
//! - Every typed access funnels through one 32-bit field primitive
//!   (see `write.rs` and `read.rs`)
//!
//! ## Invariants
//!
//! ```text
//! position = word_index * 32 + bit_offset <= len <= words.len() * 32
//! every bit at a position >= len is zero
//! ```

mod field;
mod interop;
mod masks;
mod read;
mod write;

use std::ops::Range;

use crate::config::{BitStreamConfig, GrowthPolicy};
use crate::error::{BitStreamError, BitStreamResult};
use crate::{WORD_BITS, WORD_MOD, WORD_SHIFT};

pub use field::BitField;

/// A bit-addressable stream over an auto-growing buffer of 32-bit words.
///
/// Writes past the end extend the stream; reads past the end report how
/// many bits were actually available instead of failing. Once
/// [`BitStream::close`] is called, every operation fails with
/// [`BitStreamError::Closed`].
#[derive(Clone, Debug)]
pub struct BitStream {
    /// Backing words. Never shrinks.
    words: Vec<u32>,
    /// Number of valid bits.
    len: u64,
    /// Word the cursor is in.
    word_index: usize,
    /// Bit offset of the cursor inside its word (`< 32`).
    bit_offset: u32,
    /// Cleared by [`BitStream::close`].
    open: bool,
    /// How `words` grows once exhausted.
    growth: GrowthPolicy,
}

impl BitStream {
    /// Creates an empty stream with a capacity of one word.
    #[must_use]
    pub fn new() -> Self {
        Self::with_words(1, GrowthPolicy::Double)
    }

    /// Creates an empty stream with room for at least `capacity_bits` bits.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::ZeroCapacity`] if `capacity_bits` is zero.
    pub fn with_capacity(capacity_bits: u64) -> BitStreamResult<Self> {
        Self::with_config(&BitStreamConfig {
            initial_capacity_bits: capacity_bits,
            ..BitStreamConfig::default()
        })
    }

    /// Creates an empty stream from a configuration.
    ///
    /// # Errors
    ///
    /// Everything [`BitStreamConfig::validate`] rejects.
    pub fn with_config(config: &BitStreamConfig) -> BitStreamResult<Self> {
        config.validate()?;
        #[allow(clippy::cast_possible_truncation)]
        let words = units(config.initial_capacity_bits, WORD_SHIFT) as usize;
        Ok(Self::with_words(words, config.growth))
    }

    fn with_words(words: usize, growth: GrowthPolicy) -> Self {
        Self {
            words: vec![0; words.max(1)],
            len: 0,
            word_index: 0,
            bit_offset: 0,
            open: true,
            growth,
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Length of the stream in bits.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn len(&self) -> BitStreamResult<u64> {
        self.ensure_open()?;
        Ok(self.len)
    }

    /// Returns true if no bits have been written.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn is_empty(&self) -> BitStreamResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of 8-bit values needed to hold the stream.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn len8(&self) -> BitStreamResult<u64> {
        Ok(units(self.len()?, 3))
    }

    /// Number of 16-bit values needed to hold the stream.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn len16(&self) -> BitStreamResult<u64> {
        Ok(units(self.len()?, 4))
    }

    /// Number of 32-bit values needed to hold the stream.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn len32(&self) -> BitStreamResult<u64> {
        Ok(units(self.len()?, 5))
    }

    /// Number of 64-bit values needed to hold the stream.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn len64(&self) -> BitStreamResult<u64> {
        Ok(units(self.len()?, 6))
    }

    /// Bits currently allocated.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn capacity(&self) -> BitStreamResult<u64> {
        self.ensure_open()?;
        Ok((self.words.len() as u64) << WORD_SHIFT)
    }

    /// Current bit position of the cursor.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn position(&self) -> BitStreamResult<u64> {
        self.ensure_open()?;
        Ok(self.cursor())
    }

    /// Moves the cursor to bit `position`.
    ///
    /// `position == len` is allowed so the next write appends.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed,
    /// [`BitStreamError::PositionOutOfRange`] if `position > len`.
    pub fn set_position(&mut self, position: u64) -> BitStreamResult<()> {
        self.ensure_open()?;
        if position > self.len {
            return Err(BitStreamError::PositionOutOfRange {
                position,
                length: self.len,
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        let word_index = (position >> WORD_SHIFT) as usize;
        #[allow(clippy::cast_possible_truncation)]
        let bit_offset = (position & WORD_MOD) as u32;
        self.word_index = word_index;
        self.bit_offset = bit_offset;
        Ok(())
    }

    /// Returns true while the stream accepts reads.
    #[must_use]
    pub const fn can_read(&self) -> bool {
        self.open
    }

    /// Returns true while the stream accepts writes.
    #[must_use]
    pub const fn can_write(&self) -> bool {
        self.open
    }

    /// Always false: move the cursor with [`BitStream::set_position`].
    #[must_use]
    pub const fn can_seek() -> bool {
        false
    }

    /// Always false: the stream only grows through writes.
    #[must_use]
    pub const fn can_set_length() -> bool {
        false
    }

    /// Always false: data lives in memory, so there is nothing to flush.
    #[must_use]
    pub const fn can_flush() -> bool {
        false
    }

    /// No-op.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::Closed`] if the stream is closed.
    pub fn flush(&mut self) -> BitStreamResult<()> {
        self.ensure_open()
    }

    /// Closes the stream. Every later operation fails with
    /// [`BitStreamError::Closed`].
    pub fn close(&mut self) {
        if self.open {
            tracing::debug!("Bit stream closed at {} bits", self.len);
        }
        self.open = false;
    }

    // =========================================================================
    // Cursor plumbing
    // =========================================================================

    #[inline]
    fn ensure_open(&self) -> BitStreamResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(BitStreamError::Closed)
        }
    }

    /// Flat cursor position in bits.
    #[inline]
    fn cursor(&self) -> u64 {
        ((self.word_index as u64) << WORD_SHIFT) + u64::from(self.bit_offset)
    }

    /// Bits between the cursor and the end of the stream.
    #[inline]
    fn remaining(&self) -> u64 {
        self.len - self.cursor()
    }

    /// Moves the cursor forward by `bits`, which never crosses the end of the
    /// current word.
    #[inline]
    fn advance(&mut self, bits: u32) {
        self.bit_offset += bits;
        if self.bit_offset == WORD_BITS {
            self.word_index += 1;
            self.bit_offset = 0;
        }
    }

    /// The word under the cursor, growing the backing store if needed.
    fn current_word_mut(&mut self) -> &mut u32 {
        if self.word_index >= self.words.len() {
            let grown = self.growth.grown_len(self.words.len(), self.word_index);
            tracing::debug!("Bit buffer grown: {} -> {} words", self.words.len(), grown);
            self.words.resize(grown, 0);
        }
        &mut self.words[self.word_index]
    }
}

impl Default for BitStream {
    fn default() -> Self {
        Self::new()
    }
}

/// `ceil(bits / 2^shift)`.
#[inline]
fn units(bits: u64, shift: u32) -> u64 {
    let mask = (1u64 << shift) - 1;
    (bits >> shift) + u64::from(bits & mask != 0)
}

/// Validates a partial-width field against its value width.
fn check_bit_range(bit_index: u32, count: u32, width: u32) -> BitStreamResult<()> {
    if bit_index > width || count > width - bit_index {
        return Err(BitStreamError::InvalidBitRange {
            bit_index,
            count,
            width,
        });
    }
    Ok(())
}

/// Validates an element range against a slice length.
fn slice_range(len: usize, offset: usize, count: usize) -> BitStreamResult<Range<usize>> {
    if offset > len || count > len - offset {
        return Err(BitStreamError::InvalidSliceRange { offset, count, len });
    }
    Ok(offset..offset + count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_stream_is_one_empty_word() {
        let stream = BitStream::new();
        assert_eq!(stream.len().unwrap(), 0);
        assert_eq!(stream.capacity().unwrap(), 32);
        assert_eq!(stream.position().unwrap(), 0);
        assert!(stream.is_empty().unwrap());
    }

    #[test]
    fn test_capacity_rounds_up_to_words() {
        assert_eq!(BitStream::with_capacity(1).unwrap().capacity().unwrap(), 32);
        assert_eq!(BitStream::with_capacity(32).unwrap().capacity().unwrap(), 32);
        assert_eq!(BitStream::with_capacity(33).unwrap().capacity().unwrap(), 64);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = BitStream::with_capacity(0).unwrap_err();
        assert_eq!(err, BitStreamError::ZeroCapacity);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_units() {
        assert_eq!(units(0, 3), 0);
        assert_eq!(units(1, 3), 1);
        assert_eq!(units(8, 3), 1);
        assert_eq!(units(9, 3), 2);
        assert_eq!(units(64, 6), 1);
        assert_eq!(units(65, 6), 2);
    }

    #[test]
    fn test_advance_rolls_into_next_word() {
        let mut stream = BitStream::new();
        stream.advance(31);
        assert_eq!((stream.word_index, stream.bit_offset), (0, 31));
        stream.advance(1);
        assert_eq!((stream.word_index, stream.bit_offset), (1, 0));
        assert_eq!(stream.cursor(), 32);
    }

    #[test]
    fn test_growth_follows_policy() {
        let mut stream = BitStream::with_config(&BitStreamConfig {
            initial_capacity_bits: 32,
            growth: GrowthPolicy::Linear { words: 3 },
        })
        .unwrap();
        stream.word_index = 1;
        *stream.current_word_mut() = 7;
        assert_eq!(stream.words.len(), 4);
        assert_eq!(stream.words[1], 7);
    }

    #[test]
    fn test_check_bit_range() {
        assert!(check_bit_range(0, 8, 8).is_ok());
        assert!(check_bit_range(8, 0, 8).is_ok());
        assert!(check_bit_range(3, 6, 8).is_err());
        assert!(check_bit_range(9, 0, 8).is_err());
    }

    #[test]
    fn test_slice_range() {
        assert_eq!(slice_range(4, 1, 3).unwrap(), 1..4);
        assert_eq!(slice_range(4, 4, 0).unwrap(), 4..4);
        assert!(slice_range(4, 2, 3).is_err());
        assert!(slice_range(4, 5, 0).is_err());
    }

    #[test]
    fn test_flags_and_close() {
        let mut stream = BitStream::new();
        assert!(stream.can_read() && stream.can_write());
        assert!(!BitStream::can_seek());
        assert!(!BitStream::can_set_length());
        assert!(!BitStream::can_flush());
        assert!(stream.flush().is_ok());

        stream.close();
        stream.close();
        assert!(!stream.can_read());
        assert!(!stream.can_write());
        assert_eq!(stream.len(), Err(BitStreamError::Closed));
        assert_eq!(stream.position(), Err(BitStreamError::Closed));
        assert_eq!(stream.set_position(0), Err(BitStreamError::Closed));
        assert_eq!(stream.flush(), Err(BitStreamError::Closed));
    }
}
