//! Reads and writes fixed-width binary values on a byte stream, in a byte order chosen by the
//! caller rather than the byte order of the host.
//!
//! A [`BinaryReader`] or [`BinaryWriter`] is bound to one stream and one [`ByteOrder`]. Every
//! multi-byte value is byte-swapped if, and only if, that order differs from the host's
//! [`NativeOrder`]. Single bytes and strings are never swapped.
//!
//! Supported encodings:
//! * `u8`, `i8`: 1 byte
//! * `u16`, `i16`: 2 bytes
//! * `u32`, `i32`, `f32`: 4 bytes
//! * Fx16 / Fx32: fixed-point with 12 fractional bits, stored as `i16` / `i32`
//! * strings: one byte per character, no length prefix and no terminator

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

pub mod codec;
mod order;
mod reader;
mod stream;
mod writer;


pub use order::{is_native_little_endian, ByteOrder, InvalidByteOrder, NativeOrder};
pub use reader::{BinaryReader, ReaderError};
pub use stream::Stream;
pub use writer::{BinaryWriter, WriterError};
