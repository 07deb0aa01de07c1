//! Byte-level bridges between a [`BitStream`] and the rest of `std::io`.
//!
//! The packet layer receives whole datagrams, pushes them in through
//! `io::Write` (or [`BitStream::from_bytes`]), rewinds, and decodes fields
//! with typed reads.

use std::io::{self, Read, Write};

use super::BitStream;
use crate::config::GrowthPolicy;
use crate::error::BitStreamResult;

impl BitStream {
    /// Creates a stream holding `bytes`, with the cursor after the last one.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut stream = Self::with_words(bytes.len().div_ceil(4), GrowthPolicy::Double);
        for &byte in bytes {
            stream.put_raw(u64::from(byte), 0, 8);
        }
        stream
    }

    /// Creates a stream from everything `reader` yields, with the cursor
    /// after the last byte.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Io`] if the reader fails.
    pub fn from_reader<R: Read>(mut reader: R) -> BitStreamResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// The stream as [`BitStream::len8`] bytes, independent of the cursor.
    ///
    /// A trailing partial byte is padded with zero bits.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed.
    pub fn to_bytes(&self) -> BitStreamResult<Vec<u8>> {
        #[allow(clippy::cast_possible_truncation)]
        let byte_len = self.len8()? as usize;
        Ok(self
            .words
            .iter()
            .flat_map(|word| word.to_be_bytes())
            .take(byte_len)
            .collect())
    }

    /// Writes [`BitStream::to_bytes`] to `sink`.
    ///
    /// # Errors
    ///
    /// [`crate::BitStreamError::Closed`] if the stream is closed,
    /// [`crate::BitStreamError::Io`] if the sink fails.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> BitStreamResult<()> {
        let bytes = self.to_bytes()?;
        sink.write_all(&bytes)?;
        Ok(())
    }
}

impl Write for BitStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        BitStream::flush(self)?;
        Ok(())
    }
}

impl Read for BitStream {
    /// Reads whole bytes from the cursor; `Ok(0)` at the end of the stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bits = self.read_slice(buf)?;
        #[allow(clippy::cast_possible_truncation)]
        let bytes = bits.div_ceil(8) as usize;
        Ok(bytes)
    }
}
