/*!
 * Typed Element Views
 *
 * Slots are raw bytes; typed access goes through the `Element` trait and is
 * checked against the slot's `ElementKind` tag. `ElementValue` is the tagged
 * replacement for reinterpreting bytes through a union.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant recorded on every slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Untyped bytes with a caller-chosen stride
    Raw { stride: usize },
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl ElementKind {
    /// Bytes per element
    pub fn stride(self) -> usize {
        match self {
            Self::Raw { stride } => stride,
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// Whether a view of kind `view` may read a slot tagged `self`
    ///
    /// Raw slots accept any typed view with the same stride; typed slots
    /// only accept their own kind.
    pub fn accepts(self, view: ElementKind) -> bool {
        match self {
            Self::Raw { stride } => stride == view.stride(),
            kind => kind == view,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw { stride } => write!(f, "raw[{}]", stride),
            Self::U8 => write!(f, "u8"),
            Self::I8 => write!(f, "i8"),
            Self::U16 => write!(f, "u16"),
            Self::I16 => write!(f, "i16"),
            Self::U32 => write!(f, "u32"),
            Self::I32 => write!(f, "i32"),
            Self::U64 => write!(f, "u64"),
            Self::I64 => write!(f, "i64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
        }
    }
}

/// Plain value type that can be stored in an arena slot
///
/// Encoding is little-endian so slot contents are identical across hosts.
pub trait Element: Copy + Send + Sync + 'static {
    const KIND: ElementKind;
    const SIZE: usize;

    /// Encode into exactly `Self::SIZE` bytes
    fn write_le(&self, out: &mut [u8]);

    /// Decode from exactly `Self::SIZE` bytes
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_le(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_element! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

/// One element decoded according to its slot's tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ElementValue {
    Raw(Vec<u8>),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl ElementValue {
    /// Decode `bytes` (exactly one stride long) as `kind`
    pub fn decode(kind: ElementKind, bytes: &[u8]) -> Self {
        match kind {
            ElementKind::Raw { .. } => Self::Raw(bytes.to_vec()),
            ElementKind::U8 => Self::U8(u8::read_le(bytes)),
            ElementKind::I8 => Self::I8(i8::read_le(bytes)),
            ElementKind::U16 => Self::U16(u16::read_le(bytes)),
            ElementKind::I16 => Self::I16(i16::read_le(bytes)),
            ElementKind::U32 => Self::U32(u32::read_le(bytes)),
            ElementKind::I32 => Self::I32(i32::read_le(bytes)),
            ElementKind::U64 => Self::U64(u64::read_le(bytes)),
            ElementKind::I64 => Self::I64(i64::read_le(bytes)),
            ElementKind::F32 => Self::F32(f32::read_le(bytes)),
            ElementKind::F64 => Self::F64(f64::read_le(bytes)),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Raw(bytes) => ElementKind::Raw {
                stride: bytes.len(),
            },
            Self::U8(_) => ElementKind::U8,
            Self::I8(_) => ElementKind::I8,
            Self::U16(_) => ElementKind::U16,
            Self::I16(_) => ElementKind::I16,
            Self::U32(_) => ElementKind::U32,
            Self::I32(_) => ElementKind::I32,
            Self::U64(_) => ElementKind::U64,
            Self::I64(_) => ElementKind::I64,
            Self::F32(_) => ElementKind::F32,
            Self::F64(_) => ElementKind::F64,
        }
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(bytes) => write!(f, "{:02x?}", bytes),
            Self::U8(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
        }
    }
}
