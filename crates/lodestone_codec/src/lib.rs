//! # Lodestone Codec - The Bit Transport
//!
//! Variable-bit-width stream codec underlying the Lodestone client protocol.
//!
//! ## Architecture
//!
//! - **BitStream**: growable buffer of 32-bit words, addressed per bit
//! - **Typed access**: 1 to 64-bit fields at any bit offset, for every
//!   primitive the packet layer decodes (bools, bytes, shorts, ints, longs,
//!   floats, chars)
//! - **Interop**: byte-level `std::io::Read`/`Write` so socket data can be
//!   pushed straight in
//!
//! ## Bit Layout
//!
//! ```text
//!  stream bit:  0  1  2 ...                31 | 32 33 ...
//!  word bit:   31 30 29 ...                 0 | 31 30 ...
//!             └──────────── word 0 ─────────┘ └── word 1 ...
//! ```
//!
//! Bits are numbered little-endian inside a *value* (bit 0 is the least
//! significant), while the stream fills each backing word from its most
//! significant bit downwards. A byte written at a byte-aligned position
//! therefore shows up verbatim in [`BitStream::to_bytes`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use lodestone_codec::BitStream;
//!
//! let mut stream = BitStream::new();
//! stream.write(0xA9u8)?;
//! stream.write_partial(0b101u32, 0, 3)?;
//!
//! stream.set_position(0)?;
//! let (opcode, _) = stream.read::<u8>()?;
//! assert_eq!(opcode, 0xA9);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bitstream;
pub mod config;
pub mod error;

pub use bitstream::{BitField, BitStream};
pub use config::{BitStreamConfig, GrowthPolicy};
pub use error::{BitStreamError, BitStreamResult, ErrorKind};

/// Number of bits in one backing word.
pub const WORD_BITS: u32 = 32;

/// Shift equivalent of a division by [`WORD_BITS`].
pub const WORD_SHIFT: u32 = 5;

/// Mask equivalent of a modulo by [`WORD_BITS`].
pub const WORD_MOD: u64 = 31;
