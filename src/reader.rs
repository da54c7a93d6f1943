use std::io::{self, Read, Seek, SeekFrom};

use zerocopy::transmute;

use crate::codec::{self, Swap};
use crate::order::{ByteOrder, NativeOrder};
use crate::stream::Stream;

/// Result type for [`BinaryReader`] operations.
pub type Result<T> = core::result::Result<T, ReaderError>;

/// Reads fixed-width values from a byte stream, in a declared byte order.
///
/// Each `read_*` method consumes exactly the number of bytes its type occupies and advances the
/// stream by that much. Multi-byte values are byte-swapped when the reader's [`ByteOrder`]
/// differs from the host's [`NativeOrder`]; single bytes and strings are never swapped.
///
/// The reader owns the stream until [`BinaryReader::close`] or [`BinaryReader::into_inner`] is
/// called. After `close`, every method fails with [`ReaderError::Closed`].
///
/// The reader does not buffer. Reading many small values from a `File` issues one `read` call
/// per value, so wrap it in a `BufReader` if that matters.
pub struct BinaryReader<R> {
    stream: Stream<R>,
    order: ByteOrder,
    native: NativeOrder,
}

impl<R: Read> BinaryReader<R> {
    /// Constructor. Values are read in little-endian byte order.
    pub fn new(stream: R) -> Self {
        Self::with_order(stream, ByteOrder::default())
    }

    /// Creates a reader for values stored in `order`.
    pub fn with_order(stream: R, order: ByteOrder) -> Self {
        Self::with_native(stream, order, NativeOrder::detect())
    }

    /// Creates a reader for values stored in `order`, on a host whose byte order is `native`.
    pub fn with_native(stream: R, order: ByteOrder, native: NativeOrder) -> Self {
        tracing::trace!(
            %order,
            native = %native.order(),
            swap = native.needs_swap(order),
            "binary reader opened"
        );
        Self {
            stream: Stream::new(stream),
            order,
            native,
        }
    }

    /// The byte order values are read in.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// The byte order the reader assumes for the host.
    pub fn native(&self) -> NativeOrder {
        self.native
    }

    /// Whether [`BinaryReader::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    /// Accesses the underlying stream, or returns `None` once closed.
    pub fn get_ref(&self) -> Option<&R> {
        self.stream.get_ref()
    }

    #[inline(always)]
    fn swap(&self) -> bool {
        self.native.needs_swap(self.order)
    }

    /// Fills `buf` completely, or fails with `ShortRead` if the stream ends first.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let stream = self.stream.get_mut().ok_or(ReaderError::Closed)?;
        let mut filled = 0;
        while filled < buf.len() {
            match stream.read(&mut buf[filled..]) {
                Ok(0) => {
                    tracing::debug!(needed = buf.len(), available = filled, "short read");
                    return Err(ReaderError::ShortRead {
                        needed: buf.len(),
                        available: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::debug!(error = %e, "read failed");
                    return Err(ReaderError::Io(e));
                }
            }
        }
        Ok(())
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Reads exactly `len` bytes.
    ///
    /// The buffer grows as data arrives, so a bogus `len` taken from a corrupt header ends in
    /// `ShortRead` at the end of the stream rather than in a huge allocation.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let stream = self.stream.get_mut().ok_or(ReaderError::Closed)?;
        let mut buf = Vec::new();
        stream.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            tracing::debug!(needed = len, available = buf.len(), "short read");
            return Err(ReaderError::ShortRead {
                needed: len,
                available: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.read_cbytes::<1>()?;
        Ok(b)
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads a `u16` in the reader's byte order.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_cbytes::<2>()?;
        let raw: u16 = transmute!(bytes);
        Ok(raw.swap_if(self.swap()))
    }

    /// Reads an `i16` in the reader's byte order.
    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.read_cbytes::<2>()?;
        let raw: i16 = transmute!(bytes);
        Ok(raw.swap_if(self.swap()))
    }

    /// Reads a `u32` in the reader's byte order.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_cbytes::<4>()?;
        let raw: u32 = transmute!(bytes);
        Ok(raw.swap_if(self.swap()))
    }

    /// Reads an `i32` in the reader's byte order.
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_cbytes::<4>()?;
        let raw: i32 = transmute!(bytes);
        Ok(raw.swap_if(self.swap()))
    }

    /// Reads an IEEE-754 single-precision `f32` in the reader's byte order. The bit pattern is
    /// preserved exactly, including NaN payloads.
    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.read_cbytes::<4>()?;
        let raw: f32 = transmute!(bytes);
        Ok(raw.swap_if(self.swap()))
    }

    /// Reads a 16-bit fixed-point value (12 fractional bits).
    pub fn read_fx16(&mut self) -> Result<f32> {
        Ok(codec::fx16_to_f32(self.read_i16()?))
    }

    /// Reads a 32-bit fixed-point value (12 fractional bits).
    pub fn read_fx32(&mut self) -> Result<f32> {
        Ok(codec::fx32_to_f32(self.read_i32()?))
    }

    /// Reads a string of exactly `len` single-byte characters.
    ///
    /// Each byte becomes one `char` with the same code point (Latin-1), so the result always
    /// has `len` characters. No length prefix or terminator is read; a zero byte is kept as
    /// `'\0'`.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Reads `len` bytes and returns them as a byte string, without any decoding.
    #[cfg(feature = "bstr")]
    pub fn read_bstring(&mut self, len: usize) -> Result<bstr::BString> {
        Ok(bstr::BString::from(self.read_bytes(len)?))
    }

    /// Releases the stream. Any later call on this reader fails with [`ReaderError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        let stream = self.stream.close().ok_or(ReaderError::Closed)?;
        drop(stream);
        tracing::trace!("binary reader closed");
        Ok(())
    }

    /// Extracts the stream, or fails with [`ReaderError::Closed`] if it was already closed.
    pub fn into_inner(mut self) -> Result<R> {
        self.stream.close().ok_or(ReaderError::Closed)
    }
}

impl<R: Read + Seek> BinaryReader<R> {
    /// Returns the current offset in the stream.
    pub fn position(&mut self) -> Result<u64> {
        let stream = self.stream.get_mut().ok_or(ReaderError::Closed)?;
        Ok(stream.stream_position()?)
    }

    /// Moves to a new offset in the stream and returns it.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let stream = self.stream.get_mut().ok_or(ReaderError::Closed)?;
        Ok(stream.seek(pos)?)
    }
}

/// Error type for `BinaryReader`
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The stream ended before the value was complete. The bytes that were available have been
    /// consumed, so the stream should not be read further.
    #[error("stream ended after {available} of {needed} bytes")]
    ShortRead {
        /// Number of bytes the value needed.
        needed: usize,
        /// Number of bytes the stream actually supplied.
        available: usize,
    },

    /// The underlying stream reported an error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reader was used after [`BinaryReader::close`].
    #[error("reader used after close")]
    Closed,
}
