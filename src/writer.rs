use std::io::{self, Write};

use zerocopy::IntoBytes;

use crate::codec::{self, Swap};
use crate::order::{ByteOrder, NativeOrder};
use crate::stream::Stream;

/// Result type for [`BinaryWriter`] operations.
pub type Result<T> = core::result::Result<T, WriterError>;

/// Encodes fixed-width values onto a byte stream, in a declared byte order.
///
/// This is the mirror image of [`BinaryReader`](crate::BinaryReader): every `write_*` method
/// emits exactly the bytes the matching `read_*` method consumes.
pub struct BinaryWriter<W> {
    stream: Stream<W>,
    order: ByteOrder,
    native: NativeOrder,
}

impl<W: Write> BinaryWriter<W> {
    /// Constructor. Values are written in little-endian byte order.
    pub fn new(stream: W) -> Self {
        Self::with_order(stream, ByteOrder::default())
    }

    /// Creates a writer that stores values in `order`.
    pub fn with_order(stream: W, order: ByteOrder) -> Self {
        Self::with_native(stream, order, NativeOrder::detect())
    }

    /// Creates a writer that stores values in `order`, on a host whose byte order is `native`.
    pub fn with_native(stream: W, order: ByteOrder, native: NativeOrder) -> Self {
        tracing::trace!(
            %order,
            native = %native.order(),
            swap = native.needs_swap(order),
            "binary writer opened"
        );
        Self {
            stream: Stream::new(stream),
            order,
            native,
        }
    }

    /// The byte order values are written in.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// The byte order the writer assumes for the host.
    pub fn native(&self) -> NativeOrder {
        self.native
    }

    /// Whether [`BinaryWriter::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    /// Accesses the underlying stream, or returns `None` once closed.
    pub fn get_ref(&self) -> Option<&W> {
        self.stream.get_ref()
    }

    #[inline(always)]
    fn swap(&self) -> bool {
        self.native.needs_swap(self.order)
    }

    /// Writes `bytes` to the output, as-is.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream.get_mut().ok_or(WriterError::Closed)?;
        stream.write_all(bytes).map_err(|e| {
            tracing::debug!(error = %e, len = bytes.len(), "write failed");
            WriterError::WriteFailure(e)
        })
    }

    /// Writes a small, fixed-size array of bytes.
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&[value as u8])
    }

    /// Writes a `u16` in the writer's byte order.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let raw = value.swap_if(self.swap());
        self.write_bytes(raw.as_bytes())
    }

    /// Writes an `i16` in the writer's byte order.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let raw = value.swap_if(self.swap());
        self.write_bytes(raw.as_bytes())
    }

    /// Writes a `u32` in the writer's byte order.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let raw = value.swap_if(self.swap());
        self.write_bytes(raw.as_bytes())
    }

    /// Writes an `i32` in the writer's byte order.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let raw = value.swap_if(self.swap());
        self.write_bytes(raw.as_bytes())
    }

    /// Writes an `f32` in the writer's byte order, bit for bit.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let raw = value.swap_if(self.swap());
        self.write_bytes(raw.as_bytes())
    }

    /// Writes a 16-bit fixed-point value (12 fractional bits).
    ///
    /// Out-of-range values wrap; see [`codec`] for details. Use
    /// [`BinaryWriter::write_fx16_checked`] to reject them instead.
    pub fn write_fx16(&mut self, value: f32) -> Result<()> {
        self.write_i16(codec::f32_to_fx16(value))
    }

    /// Writes a 32-bit fixed-point value (12 fractional bits).
    ///
    /// Out-of-range values wrap; see [`codec`] for details. Use
    /// [`BinaryWriter::write_fx32_checked`] to reject them instead.
    pub fn write_fx32(&mut self, value: f32) -> Result<()> {
        self.write_i32(codec::f32_to_fx32(value))
    }

    /// Like [`BinaryWriter::write_fx16`], but fails with [`WriterError::OutOfRange`] rather
    /// than wrapping. Nothing is written on failure.
    pub fn write_fx16_checked(&mut self, value: f32) -> Result<()> {
        let raw = codec::f32_to_fx16_checked(value).ok_or(WriterError::OutOfRange(value))?;
        self.write_i16(raw)
    }

    /// Like [`BinaryWriter::write_fx32`], but fails with [`WriterError::OutOfRange`] rather
    /// than wrapping. Nothing is written on failure.
    pub fn write_fx32_checked(&mut self, value: f32) -> Result<()> {
        let raw = codec::f32_to_fx32_checked(value).ok_or(WriterError::OutOfRange(value))?;
        self.write_i32(raw)
    }

    /// Writes each character of `s` as one byte, with no length prefix and no terminator.
    ///
    /// Only characters up to U+00FF fit in a byte. If `s` contains any other character this
    /// fails with [`WriterError::CannotEncode`] before writing anything.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        let mut bytes = Vec::with_capacity(s.len());
        for c in s.chars() {
            let b = u8::try_from(c).map_err(|_| WriterError::CannotEncode(c))?;
            bytes.push(b);
        }
        self.write_bytes(&bytes)
    }

    /// Flushes the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        let stream = self.stream.get_mut().ok_or(WriterError::Closed)?;
        stream.flush().map_err(WriterError::WriteFailure)
    }

    /// Flushes and releases the stream.
    ///
    /// The writer is closed even if the flush fails; the flush error is returned.
    pub fn close(&mut self) -> Result<()> {
        let mut stream = self.stream.close().ok_or(WriterError::Closed)?;
        let flushed = stream.flush();
        drop(stream);
        tracing::trace!(ok = flushed.is_ok(), "binary writer closed");
        flushed.map_err(WriterError::WriteFailure)
    }

    /// Flushes the stream and extracts it.
    pub fn into_inner(mut self) -> Result<W> {
        let mut stream = self.stream.close().ok_or(WriterError::Closed)?;
        stream.flush().map_err(WriterError::WriteFailure)?;
        Ok(stream)
    }
}

/// Error type for `BinaryWriter`.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// The underlying stream rejected or could not complete a write. Part of the value may
    /// have been written.
    #[error("write failed: {0}")]
    WriteFailure(#[from] io::Error),

    /// The writer was used after [`BinaryWriter::close`].
    #[error("writer used after close")]
    Closed,

    /// A string contained a character that does not fit in one byte.
    #[error("character {0:?} cannot be encoded as a single byte")]
    CannotEncode(char),

    /// A fixed-point value does not fit in the target width.
    #[error("{0} is out of range for the fixed-point encoding")]
    OutOfRange(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written<F>(order: ByteOrder, f: F) -> Vec<u8>
    where
        F: FnOnce(&mut BinaryWriter<Vec<u8>>) -> Result<()>,
    {
        let mut w = BinaryWriter::with_order(Vec::new(), order);
        f(&mut w).unwrap();
        w.into_inner().unwrap()
    }

    #[test]
    fn u32_both_orders() {
        assert_eq!(
            written(ByteOrder::Big, |w| w.write_u32(0x0102_0304)),
            [0x01, 0x02, 0x03, 0x04]
        );
        assert_eq!(
            written(ByteOrder::Little, |w| w.write_u32(0x0102_0304)),
            [0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn assumed_native_order() {
        let host = NativeOrder::detect().order();

        let right = NativeOrder::assume(host);
        let mut w = BinaryWriter::with_native(Vec::new(), ByteOrder::Little, right);
        w.write_u16(0xaa55).unwrap();
        assert_eq!(w.into_inner().unwrap(), [0x55, 0xaa]);

        // A wrong host order flips the swap decision.
        let wrong = NativeOrder::assume(host.opposite());
        let mut w = BinaryWriter::with_native(Vec::new(), ByteOrder::Little, wrong);
        w.write_u16(0xaa55).unwrap();
        assert_eq!(w.into_inner().unwrap(), [0xaa, 0x55]);
    }

    #[test]
    fn single_bytes_never_swap() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            assert_eq!(written(order, |w| w.write_u8(0xab)), [0xab]);
            assert_eq!(written(order, |w| w.write_i8(-1)), [0xff]);
        }
    }

    #[test]
    fn signed_and_float() {
        assert_eq!(written(ByteOrder::Big, |w| w.write_i16(-2)), [0xff, 0xfe]);
        assert_eq!(
            written(ByteOrder::Little, |w| w.write_i32(-2)),
            [0xfe, 0xff, 0xff, 0xff]
        );
        assert_eq!(
            written(ByteOrder::Big, |w| w.write_f32(1.5)),
            [0x3f, 0xc0, 0x00, 0x00]
        );
    }

    #[test]
    fn fixed_point() {
        assert_eq!(written(ByteOrder::Big, |w| w.write_fx16(1.5)), [0x18, 0x00]);
        assert_eq!(
            written(ByteOrder::Big, |w| w.write_fx32(-1.0)),
            [0xff, 0xff, 0xf0, 0x00]
        );
        // 8.0 * 4096 does not fit in i16 and wraps to -32768.
        assert_eq!(written(ByteOrder::Big, |w| w.write_fx16(8.0)), [0x80, 0x00]);
    }

    #[test]
    fn fixed_point_checked() {
        let mut w = BinaryWriter::with_order(Vec::new(), ByteOrder::Big);
        assert!(matches!(
            w.write_fx16_checked(8.0),
            Err(WriterError::OutOfRange(v)) if v == 8.0
        ));
        assert!(matches!(
            w.write_fx32_checked(f32::NAN),
            Err(WriterError::OutOfRange(_))
        ));
        w.write_fx16_checked(-8.0).unwrap();
        assert_eq!(w.into_inner().unwrap(), [0x80, 0x00]);
    }

    #[test]
    fn string_bytes() {
        assert_eq!(written(ByteOrder::Big, |w| w.write_str("NKSC")), b"NKSC");
        assert_eq!(
            written(ByteOrder::Little, |w| w.write_str("\u{e9}\0")),
            [0xe9, 0x00]
        );
        assert_eq!(written(ByteOrder::Little, |w| w.write_str("")), b"");
    }

    #[test]
    fn string_rejects_wide_chars() {
        let mut w = BinaryWriter::new(Vec::new());
        assert!(matches!(
            w.write_str("ab\u{20ac}"),
            Err(WriterError::CannotEncode('\u{20ac}'))
        ));
        assert!(w.into_inner().unwrap().is_empty());
    }

    /// Accepts `room` bytes, then reports the device as full.
    struct Full {
        room: usize,
        flushes: usize,
    }

    impl Write for Full {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::other("full"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn write_failure() {
        let mut w = BinaryWriter::new(Full { room: 2, flushes: 0 });
        w.write_u16(1).unwrap();
        match w.write_u32(1) {
            Err(WriterError::WriteFailure(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
            other => panic!("expected WriteFailure, got {other:?}"),
        }
    }

    #[test]
    fn close_flushes() {
        let mut w = BinaryWriter::new(Full { room: 8, flushes: 0 });
        w.write_u32(7).unwrap();
        w.flush().unwrap();
        assert_eq!(w.get_ref().map(|s| s.flushes), Some(1));
        let inner = w.into_inner().unwrap();
        assert_eq!(inner.flushes, 2);
    }

    #[test]
    fn use_after_close() {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_u8(1).unwrap();
        w.close().unwrap();
        assert!(w.is_closed());
        assert!(matches!(w.write_u8(1), Err(WriterError::Closed)));
        assert!(matches!(w.write_u32(1), Err(WriterError::Closed)));
        assert!(matches!(w.write_str("a"), Err(WriterError::Closed)));
        assert!(matches!(w.flush(), Err(WriterError::Closed)));
        assert!(matches!(w.close(), Err(WriterError::Closed)));
        assert!(matches!(w.into_inner(), Err(WriterError::Closed)));
    }
}
