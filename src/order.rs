use core::fmt;
use core::str::FromStr;
use std::sync::OnceLock;

use zerocopy::IntoBytes;

/// The order in which the bytes of a multi-byte value are stored.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Returns `true` for [`ByteOrder::Little`].
    pub fn is_little(self) -> bool {
        self == Self::Little
    }

    /// Returns the other byte order.
    pub fn opposite(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }
}

/// Decodes the one-byte flag used by older callers: `0` is little-endian, `1` is big-endian.
impl TryFrom<u8> for ByteOrder {
    type Error = InvalidByteOrder;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            0 => Ok(Self::Little),
            1 => Ok(Self::Big),
            _ => Err(InvalidByteOrder::Flag(flag)),
        }
    }
}

impl From<ByteOrder> for u8 {
    fn from(order: ByteOrder) -> u8 {
        match order {
            ByteOrder::Little => 0,
            ByteOrder::Big => 1,
        }
    }
}

impl FromStr for ByteOrder {
    type Err = InvalidByteOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("little") || s.eq_ignore_ascii_case("le") {
            Ok(Self::Little)
        } else if s.eq_ignore_ascii_case("big") || s.eq_ignore_ascii_case("be") {
            Ok(Self::Big)
        } else {
            Err(InvalidByteOrder::Name(s.to_string()))
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => f.write_str("little"),
            Self::Big => f.write_str("big"),
        }
    }
}

/// Error returned when a flag or name does not identify a byte order.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum InvalidByteOrder {
    /// The flag was neither `0` nor `1`.
    #[error("invalid byte order flag {0}, expected 0 (little) or 1 (big)")]
    Flag(u8),
    /// The name was not one of `little`, `le`, `big`, `be`.
    #[error("invalid byte order name {0:?}")]
    Name(String),
}

/// Checks the byte order of the executing machine.
///
/// Stores the value `1` in a native `u16` and looks at the lowest-addressed byte. It holds `1` on
/// a little-endian machine and `0` on a big-endian one.
pub fn is_native_little_endian() -> bool {
    let probe: u16 = 1;
    probe.as_bytes()[0] == 1
}

/// The byte order of the host.
///
/// Readers and writers take this as a construction parameter instead of consulting global state.
/// [`NativeOrder::detect`] runs the detector once per process; [`NativeOrder::assume`] lets a
/// caller pick the value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NativeOrder(ByteOrder);

static DETECTED: OnceLock<NativeOrder> = OnceLock::new();

impl NativeOrder {
    /// Returns the host's byte order. The detector runs on the first call only.
    pub fn detect() -> Self {
        *DETECTED.get_or_init(|| {
            let order = if is_native_little_endian() {
                ByteOrder::Little
            } else {
                ByteOrder::Big
            };
            tracing::trace!(%order, "detected native byte order");
            Self(order)
        })
    }

    /// Treats `order` as the host's byte order.
    ///
    /// Values are still laid out in memory the way the real host lays them out; this only
    /// changes the swap decision. Passing anything other than [`NativeOrder::detect`]'s order
    /// makes readers and writers produce byte-reversed values for every multi-byte type.
    pub fn assume(order: ByteOrder) -> Self {
        Self(order)
    }

    /// The byte order this value stands for.
    pub fn order(self) -> ByteOrder {
        self.0
    }

    /// Whether values stored in `order` must be byte-swapped on this host.
    #[inline(always)]
    pub fn needs_swap(self, order: ByteOrder) -> bool {
        self.0 != order
    }
}

impl Default for NativeOrder {
    fn default() -> Self {
        Self::detect()
    }
}
