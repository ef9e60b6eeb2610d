use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};

use crate::{DataType, DecodeError, DecodedValue};

/// A fixed-width numeric native with a little-endian wire form.
///
/// Readers must check `src.remaining() >= WIDTH` before calling
/// [`NativeType::get_le`]; [`NativeType::decode`] does that check.
pub trait NativeType:
    Copy + Default + PartialEq + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
    /// The element type this native backs when used directly.
    const DATA_TYPE: DataType;
    /// Encoded width in bytes.
    const WIDTH: usize;
    /// Variant name shared by `DataType` and `DecodedValue`.
    const NAME: &'static str;

    fn put_le<B: BufMut>(self, dst: &mut B);

    fn get_le<B: Buf>(src: &mut B) -> Self;

    /// Bit-exact identity used for deduplication. Floats compare by bit
    /// pattern, so `-0.0` and `0.0` are distinct and equal NaNs collapse.
    #[inline]
    fn dedup_key(self) -> u64 {
        let mut buf = [0u8; 8];
        let mut dst = &mut buf[..];
        self.put_le(&mut dst);
        u64::from_le_bytes(buf)
    }

    fn into_decoded(self) -> DecodedValue<'static>;

    fn from_decoded(v: DecodedValue<'_>) -> Option<Self>;

    #[inline]
    fn decode<B: Buf>(src: &mut B) -> Result<Self, DecodeError> {
        if src.remaining() < Self::WIDTH {
            return Err(DecodeError::NotEnoughData {
                needed: Self::WIDTH,
                remaining: src.remaining(),
            });
        }
        Ok(Self::get_le(src))
    }
}

macro_rules! impl_native_type {
    ($variant:ident, $native:ident, $put:ident, $get:ident) => {
        impl NativeType for $native {
            const DATA_TYPE: DataType = DataType::$variant;
            const WIDTH: usize = std::mem::size_of::<$native>();
            const NAME: &'static str = stringify!($variant);

            #[inline]
            fn put_le<B: BufMut>(self, dst: &mut B) {
                dst.$put(self);
            }

            #[inline]
            fn get_le<B: Buf>(src: &mut B) -> Self {
                src.$get()
            }

            #[inline]
            fn into_decoded(self) -> DecodedValue<'static> {
                DecodedValue::$variant(self)
            }

            #[inline]
            fn from_decoded(v: DecodedValue<'_>) -> Option<Self> {
                match v {
                    DecodedValue::$variant(x) => Some(x),
                    _ => None,
                }
            }
        }
    };
}

crate::llkv_for_each_numeric!(impl_native_type);
