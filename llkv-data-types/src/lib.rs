//! Plain element types for LLKV columns.
//!
//! This crate owns everything a composite column type delegates to:
//!
//! - [`DataType`], the closed set of element types and their textual names.
//! - [`stream`], the substream tags, paths and stream-resolution trait used
//!   to split one logical column across several physical byte streams.
//! - [`storage`], the backing storages (`StringColumn`, `FixedStringColumn`,
//!   `NumericColumn<T>`) together with their scalar and bulk binary codecs.
//!
//! All binary payloads are little-endian. Variable-length payloads are
//! prefixed with an unsigned LEB128 length.

use std::fmt;

pub mod errors;
pub use errors::*;

pub mod internal;
pub use internal::{NativeType, get_varint, put_varint, varint_len};

pub mod parse;

pub mod storage;
pub use storage::{ColumnStorage, FixedStringColumn, NumericColumn, StringColumn};

pub mod stream;
pub use stream::{StreamGetter, StreamSet, Substream, SubstreamPath, stream_name};

mod text;

/// Invokes `$macro` once per supported numeric native type.
///
/// The callback receives:
///
/// ```text
/// $macro!(
///     $variant,   // DataType / DecodedValue variant (e.g. UInt16)
///     $native,    // Rust native type (e.g. u16)
///     $put,       // bytes::BufMut little-endian writer (e.g. put_u16_le)
///     $get        // bytes::Buf little-endian reader (e.g. get_u16_le)
/// );
/// ```
///
/// The list is closed: adding a numeric type means adding a line here and a
/// variant to [`DataType`], [`DecodedValue`] and [`OwnedValue`].
#[macro_export]
macro_rules! llkv_for_each_numeric {
    ($macro:ident) => {
        $macro!(UInt8, u8, put_u8, get_u8);
        $macro!(UInt16, u16, put_u16_le, get_u16_le);
        $macro!(UInt32, u32, put_u32_le, get_u32_le);
        $macro!(UInt64, u64, put_u64_le, get_u64_le);
        $macro!(Int8, i8, put_i8, get_i8);
        $macro!(Int16, i16, put_i16_le, get_i16_le);
        $macro!(Int32, i32, put_i32_le, get_i32_le);
        $macro!(Int64, i64, put_i64_le, get_i64_le);
        $macro!(Float32, f32, put_f32_le, get_f32_le);
        $macro!(Float64, f64, put_f64_le, get_f64_le);
    };
}

/// Logical type of a column's elements.
///
/// `Date` is stored as a `u16` day count since 1970-01-01 and `DateTime` as a
/// `u32` count of seconds since the Unix epoch, both UTC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Variable-length UTF-8 text.
    String,
    /// Exactly `n` bytes per value; shorter inputs are zero-padded.
    FixedString(usize),
    Date,
    DateTime,
    /// Optional wrapper around another type.
    Nullable(Box<DataType>),
    /// Variable-length list of another type.
    Array(Box<DataType>),
}

impl DataType {
    pub fn nullable(inner: DataType) -> Self {
        DataType::Nullable(Box::new(inner))
    }

    pub fn array(inner: DataType) -> Self {
        DataType::Array(Box::new(inner))
    }

    #[inline]
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
        )
    }

    /// Integers of every width plus both float widths.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::Float32
                | DataType::Float64
        )
    }

    #[inline]
    pub fn is_string_or_fixed_string(&self) -> bool {
        matches!(self, DataType::String | DataType::FixedString(_))
    }

    #[inline]
    pub fn is_date_or_datetime(&self) -> bool {
        matches!(self, DataType::Date | DataType::DateTime)
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_))
    }

    /// Strips exactly one `Nullable` layer, if present.
    #[inline]
    pub fn unwrap_nullable(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Encoded width in bytes for fixed-width types.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            DataType::UInt8 | DataType::Int8 => Some(1),
            DataType::UInt16 | DataType::Int16 | DataType::Date => Some(2),
            DataType::UInt32 | DataType::Int32 | DataType::Float32 | DataType::DateTime => Some(4),
            DataType::UInt64 | DataType::Int64 | DataType::Float64 => Some(8),
            DataType::FixedString(n) => Some(*n),
            DataType::String | DataType::Nullable(_) | DataType::Array(_) => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::UInt8 => f.write_str("UInt8"),
            DataType::UInt16 => f.write_str("UInt16"),
            DataType::UInt32 => f.write_str("UInt32"),
            DataType::UInt64 => f.write_str("UInt64"),
            DataType::Int8 => f.write_str("Int8"),
            DataType::Int16 => f.write_str("Int16"),
            DataType::Int32 => f.write_str("Int32"),
            DataType::Int64 => f.write_str("Int64"),
            DataType::Float32 => f.write_str("Float32"),
            DataType::Float64 => f.write_str("Float64"),
            DataType::String => f.write_str("String"),
            DataType::FixedString(n) => write!(f, "FixedString({n})"),
            DataType::Date => f.write_str("Date"),
            DataType::DateTime => f.write_str("DateTime"),
            DataType::Nullable(inner) => write!(f, "Nullable({inner})"),
            DataType::Array(inner) => write!(f, "Array({inner})"),
        }
    }
}

/// A borrowed view of one element read from (or destined for) a storage.
///
/// Strings and fixed-width byte payloads borrow from their source so reads
/// stay allocation-free.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DecodedValue<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl<'a> DecodedValue<'a> {
    /// Variant name, used in type-mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DecodedValue::Str(_) => "Str",
            DecodedValue::Bytes(_) => "Bytes",
            DecodedValue::UInt8(_) => "UInt8",
            DecodedValue::UInt16(_) => "UInt16",
            DecodedValue::UInt32(_) => "UInt32",
            DecodedValue::UInt64(_) => "UInt64",
            DecodedValue::Int8(_) => "Int8",
            DecodedValue::Int16(_) => "Int16",
            DecodedValue::Int32(_) => "Int32",
            DecodedValue::Int64(_) => "Int64",
            DecodedValue::Float32(_) => "Float32",
            DecodedValue::Float64(_) => "Float64",
        }
    }

    pub fn to_owned_value(&self) -> OwnedValue {
        match *self {
            DecodedValue::Str(s) => OwnedValue::Str(s.to_string()),
            DecodedValue::Bytes(b) => OwnedValue::Bytes(b.to_vec()),
            DecodedValue::UInt8(x) => OwnedValue::UInt8(x),
            DecodedValue::UInt16(x) => OwnedValue::UInt16(x),
            DecodedValue::UInt32(x) => OwnedValue::UInt32(x),
            DecodedValue::UInt64(x) => OwnedValue::UInt64(x),
            DecodedValue::Int8(x) => OwnedValue::Int8(x),
            DecodedValue::Int16(x) => OwnedValue::Int16(x),
            DecodedValue::Int32(x) => OwnedValue::Int32(x),
            DecodedValue::Int64(x) => OwnedValue::Int64(x),
            DecodedValue::Float32(x) => OwnedValue::Float32(x),
            DecodedValue::Float64(x) => OwnedValue::Float64(x),
        }
    }
}

impl fmt::Display for DecodedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Str(s) => f.write_str(s),
            // Zero padding is storage detail, not content.
            DecodedValue::Bytes(b) => {
                let end = b.iter().rposition(|&x| x != 0).map_or(0, |i| i + 1);
                f.write_str(&String::from_utf8_lossy(&b[..end]))
            }
            DecodedValue::UInt8(x) => write!(f, "{x}"),
            DecodedValue::UInt16(x) => write!(f, "{x}"),
            DecodedValue::UInt32(x) => write!(f, "{x}"),
            DecodedValue::UInt64(x) => write!(f, "{x}"),
            DecodedValue::Int8(x) => write!(f, "{x}"),
            DecodedValue::Int16(x) => write!(f, "{x}"),
            DecodedValue::Int32(x) => write!(f, "{x}"),
            DecodedValue::Int64(x) => write!(f, "{x}"),
            DecodedValue::Float32(x) => write!(f, "{x}"),
            DecodedValue::Float64(x) => write!(f, "{x}"),
        }
    }
}

/// Owned counterpart of [`DecodedValue`], returned where no storage outlives
/// the read.
#[derive(Debug, PartialEq, Clone)]
pub enum OwnedValue {
    Str(String),
    Bytes(Vec<u8>),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl OwnedValue {
    pub fn as_decoded(&self) -> DecodedValue<'_> {
        match self {
            OwnedValue::Str(s) => DecodedValue::Str(s),
            OwnedValue::Bytes(b) => DecodedValue::Bytes(b),
            OwnedValue::UInt8(x) => DecodedValue::UInt8(*x),
            OwnedValue::UInt16(x) => DecodedValue::UInt16(*x),
            OwnedValue::UInt32(x) => DecodedValue::UInt32(*x),
            OwnedValue::UInt64(x) => DecodedValue::UInt64(*x),
            OwnedValue::Int8(x) => DecodedValue::Int8(*x),
            OwnedValue::Int16(x) => DecodedValue::Int16(*x),
            OwnedValue::Int32(x) => DecodedValue::Int32(*x),
            OwnedValue::Int64(x) => DecodedValue::Int64(*x),
            OwnedValue::Float32(x) => DecodedValue::Float32(*x),
            OwnedValue::Float64(x) => DecodedValue::Float64(*x),
        }
    }
}

impl From<&str> for OwnedValue {
    fn from(v: &str) -> Self {
        OwnedValue::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_follow_the_closed_type_set() {
        assert!(DataType::UInt8.is_unsigned_integer());
        assert!(!DataType::Int8.is_unsigned_integer());
        assert!(DataType::Float32.is_numeric());
        assert!(!DataType::Date.is_numeric());
        assert!(DataType::Date.is_date_or_datetime());
        assert!(DataType::FixedString(3).is_string_or_fixed_string());
        assert!(!DataType::array(DataType::String).is_string_or_fixed_string());
    }

    #[test]
    fn unwrap_nullable_strips_one_layer() {
        let once = DataType::nullable(DataType::UInt32);
        assert_eq!(once.unwrap_nullable(), &DataType::UInt32);

        let twice = DataType::nullable(once.clone());
        assert_eq!(twice.unwrap_nullable(), &once);
        assert_eq!(DataType::Int8.unwrap_nullable(), &DataType::Int8);
    }

    #[test]
    fn display_renders_canonical_names() {
        assert_eq!(DataType::FixedString(4).to_string(), "FixedString(4)");
        assert_eq!(
            DataType::nullable(DataType::array(DataType::DateTime)).to_string(),
            "Nullable(Array(DateTime))"
        );
    }

    #[test]
    fn fixed_string_display_trims_padding() {
        let padded = [b'a', b'b', 0, 0];
        assert_eq!(DecodedValue::Bytes(&padded).to_string(), "ab");
    }

    #[test]
    fn owned_and_decoded_convert_both_ways() {
        let owned = OwnedValue::from("xyz");
        assert_eq!(owned.as_decoded(), DecodedValue::Str("xyz"));
        assert_eq!(DecodedValue::Int16(-3).to_owned_value(), OwnedValue::Int16(-3));
    }
}
