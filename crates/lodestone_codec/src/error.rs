//! # Codec Error Types
//!
//! All errors that can occur while operating a bit stream.

use std::io;

use thiserror::Error;

/// Coarse classification of a [`BitStreamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The stream was closed before the call.
    ClosedStream,
    /// An index, count, offset, capacity or decoded value was rejected.
    InvalidArgument,
    /// The cursor was moved outside `[0, len]`.
    OutOfRange,
    /// A foreign reader or writer failed.
    Io,
}

/// Errors that can occur in the codec.
///
/// Every failing call leaves the stream exactly as it was, except
/// [`BitStreamError::InvalidChar`], which is detected after the bits were
/// consumed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitStreamError {
    /// Operation attempted after [`crate::BitStream::close`].
    #[error("cannot access a closed bit stream")]
    Closed,

    /// A partial-width field does not fit inside its value type.
    #[error("invalid bit range: index {bit_index} + count {count} exceeds {width}-bit value")]
    InvalidBitRange {
        /// First bit of the field inside the value.
        bit_index: u32,
        /// Number of bits requested.
        count: u32,
        /// Width of the value type in bits.
        width: u32,
    },

    /// An element range does not fit inside the supplied slice.
    #[error("invalid offset or count: offset {offset} + count {count} exceeds slice length {len}")]
    InvalidSliceRange {
        /// First element of the range.
        offset: usize,
        /// Number of elements requested.
        count: usize,
        /// Length of the slice.
        len: usize,
    },

    /// A stream cannot be created with zero capacity.
    #[error("capacity must be at least one bit")]
    ZeroCapacity,

    /// Position outside `[0, length]`.
    #[error("position {position} out of range: stream holds {length} bits")]
    PositionOutOfRange {
        /// Requested bit position.
        position: u64,
        /// Stream length in bits.
        length: u64,
    },

    /// Decoded bits are not a Unicode scalar value.
    #[error("invalid unicode scalar value: {0:#x}")]
    InvalidChar(u32),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A foreign reader or writer failed.
    #[error("i/o failure ({kind:?}): {message}")]
    Io {
        /// Kind reported by the underlying error.
        kind: io::ErrorKind,
        /// Rendered error message.
        message: String,
    },
}

impl BitStreamError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Closed => ErrorKind::ClosedStream,
            Self::InvalidBitRange { .. }
            | Self::InvalidSliceRange { .. }
            | Self::ZeroCapacity
            | Self::InvalidChar(_)
            | Self::InvalidConfig(_) => ErrorKind::InvalidArgument,
            Self::PositionOutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

impl From<io::Error> for BitStreamError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<BitStreamError> for io::Error {
    fn from(err: BitStreamError) -> Self {
        let kind = match err.kind() {
            ErrorKind::ClosedStream => io::ErrorKind::BrokenPipe,
            ErrorKind::InvalidArgument | ErrorKind::OutOfRange => io::ErrorKind::InvalidInput,
            ErrorKind::Io => match &err {
                BitStreamError::Io { kind, .. } => *kind,
                _ => io::ErrorKind::Other,
            },
        };
        io::Error::new(kind, err)
    }
}

/// Result type for codec operations.
pub type BitStreamResult<T> = Result<T, BitStreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(BitStreamError::Closed.kind(), ErrorKind::ClosedStream);
        assert_eq!(BitStreamError::ZeroCapacity.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            BitStreamError::InvalidBitRange { bit_index: 4, count: 8, width: 8 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            BitStreamError::PositionOutOfRange { position: 9, length: 8 }.kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: BitStreamError = io::Error::new(io::ErrorKind::UnexpectedEof, "short").into();
        assert_eq!(err.kind(), ErrorKind::Io);

        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::UnexpectedEof);

        let closed: io::Error = BitStreamError::Closed.into();
        assert_eq!(closed.kind(), io::ErrorKind::BrokenPipe);
    }
}
