//! Byte-swap and fixed-point primitives shared by [`BinaryReader`](crate::BinaryReader) and
//! [`BinaryWriter`](crate::BinaryWriter).
//!
//! # Fixed-point range loss
//!
//! Fx16 and Fx32 values are `f32` quantities scaled by 4096 (12 fractional bits) and stored as
//! `i16` / `i32`. Encoding does not check the range: the scaled value is truncated toward zero
//! and then wrapped into the target width, so `8.0` encodes as Fx16 `-32768` and decodes back as
//! `-8.0`. NaN encodes as `0`. Use the `*_checked` variants to detect this instead.

/// Scale factor between a fixed-point integer and the value it stands for.
pub const FX_SCALE: f32 = 4096.0;

/// Number of fractional bits in Fx16 and Fx32.
pub const FX_FRACTION_BITS: u32 = 12;

/// Reverses the bytes of a 16-bit value.
#[inline(always)]
pub fn swap16(value: u16) -> u16 {
    (value >> 8) | (value << 8)
}

/// Reverses the bytes of a 32-bit value.
#[inline(always)]
pub fn swap32(value: u32) -> u32 {
    ((value >> 24) & 0x0000_00ff)
        | ((value >> 8) & 0x0000_ff00)
        | ((value << 8) & 0x00ff_0000)
        | ((value << 24) & 0xff00_0000)
}

/// A fixed-width value whose byte order can be reversed.
///
/// The swap works on the raw bit pattern, never on the numeric value. For `f32` this means the
/// bits go through [`f32::to_bits`] and [`f32::from_bits`], so NaN payloads survive.
pub trait Swap: Copy {
    /// Returns the value with its bytes reversed.
    fn swap(self) -> Self;

    /// Returns [`Swap::swap`] of the value if `cond` is set, else the value unchanged.
    #[inline(always)]
    fn swap_if(self, cond: bool) -> Self {
        if cond {
            self.swap()
        } else {
            self
        }
    }
}

impl Swap for u16 {
    #[inline(always)]
    fn swap(self) -> Self {
        swap16(self)
    }
}

impl Swap for i16 {
    #[inline(always)]
    fn swap(self) -> Self {
        swap16(self as u16) as i16
    }
}

impl Swap for u32 {
    #[inline(always)]
    fn swap(self) -> Self {
        swap32(self)
    }
}

impl Swap for i32 {
    #[inline(always)]
    fn swap(self) -> Self {
        swap32(self as u32) as i32
    }
}

impl Swap for f32 {
    #[inline(always)]
    fn swap(self) -> Self {
        f32::from_bits(swap32(self.to_bits()))
    }
}

/// Decodes an Fx16 integer.
pub fn fx16_to_f32(raw: i16) -> f32 {
    raw as f32 / FX_SCALE
}

/// Decodes an Fx32 integer.
///
/// `f32` has a 24-bit mantissa, so raw values above 2^24 in magnitude lose their low bits.
pub fn fx32_to_f32(raw: i32) -> f32 {
    raw as f32 / FX_SCALE
}

/// Scales and truncates toward zero. `as i64` maps NaN to 0 and saturates at the `i64` limits.
fn scale(value: f32) -> i64 {
    (value * FX_SCALE) as i64
}

/// Encodes `value` as Fx16, wrapping when it does not fit. See the module docs.
pub fn f32_to_fx16(value: f32) -> i16 {
    scale(value) as i16
}

/// Encodes `value` as Fx32, wrapping when it does not fit. See the module docs.
pub fn f32_to_fx32(value: f32) -> i32 {
    scale(value) as i32
}

/// Encodes `value` as Fx16, or returns `None` if it is NaN or out of range.
pub fn f32_to_fx16_checked(value: f32) -> Option<i16> {
    if value.is_nan() {
        return None;
    }
    i16::try_from(scale(value)).ok()
}

/// Encodes `value` as Fx32, or returns `None` if it is NaN or out of range.
pub fn f32_to_fx32_checked(value: f32) -> Option<i32> {
    if value.is_nan() {
        return None;
    }
    i32::try_from(scale(value)).ok()
}
