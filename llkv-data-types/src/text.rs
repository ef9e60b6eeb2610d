//! Human-readable rendering of single element values.

use llkv_result::{Error, Result};

use crate::internal::{
    NativeType, format_date_text, format_datetime_text, parse_date_text, parse_datetime_text,
};
use crate::{DataType, DecodedValue, EncodeError};

fn mismatch(expected: &DataType, got: &DecodedValue<'_>) -> Error {
    Error::InvalidArgumentError(format!(
        "value of kind {} does not belong to type {expected}",
        got.kind_name()
    ))
}

fn parse_native<T: NativeType>(text: &str) -> Result<DecodedValue<'static>> {
    text.trim()
        .parse::<T>()
        .map(T::into_decoded)
        .map_err(|_| {
            Error::InvalidArgumentError(format!("cannot parse '{text}' as {}", T::DATA_TYPE))
        })
}

impl DataType {
    /// Renders `value` as text for this (non-composite) type.
    ///
    /// Dates print as `YYYY-MM-DD`, date-times as `YYYY-MM-DD hh:mm:ss` in
    /// UTC, fixed strings without their zero padding.
    pub fn format_text(&self, value: DecodedValue<'_>) -> Result<String> {
        match (self, value) {
            (DataType::Date, DecodedValue::UInt16(days)) => format_date_text(days),
            (DataType::DateTime, DecodedValue::UInt32(secs)) => format_datetime_text(secs),
            (DataType::String, DecodedValue::Str(_))
            | (DataType::FixedString(_), DecodedValue::Bytes(_)) => Ok(value.to_string()),
            (DataType::Nullable(_) | DataType::Array(_), _) => Err(Error::InvalidArgumentError(
                format!("text form of composite type {self} is not supported"),
            )),
            (dt, v) if dt.is_numeric() && v.kind_name() == dt.to_string() => Ok(v.to_string()),
            (dt, v) => Err(mismatch(dt, &v)),
        }
    }

    /// Parses one value of this (non-composite) type from `text`.
    ///
    /// String payloads borrow from `text`. A `FixedString` input longer than
    /// the column width is rejected; shorter inputs are padded on store.
    pub fn parse_text<'a>(&self, text: &'a str) -> Result<DecodedValue<'a>> {
        match self {
            DataType::UInt8 => parse_native::<u8>(text),
            DataType::UInt16 => parse_native::<u16>(text),
            DataType::UInt32 => parse_native::<u32>(text),
            DataType::UInt64 => parse_native::<u64>(text),
            DataType::Int8 => parse_native::<i8>(text),
            DataType::Int16 => parse_native::<i16>(text),
            DataType::Int32 => parse_native::<i32>(text),
            DataType::Int64 => parse_native::<i64>(text),
            DataType::Float32 => parse_native::<f32>(text),
            DataType::Float64 => parse_native::<f64>(text),
            DataType::String => Ok(DecodedValue::Str(text)),
            DataType::FixedString(width) => {
                if text.len() > *width {
                    return Err(EncodeError::TooLong {
                        width: *width,
                        len: text.len(),
                    }
                    .into());
                }
                Ok(DecodedValue::Bytes(text.as_bytes()))
            }
            DataType::Date => parse_date_text(text).map(DecodedValue::UInt16),
            DataType::DateTime => parse_datetime_text(text).map(DecodedValue::UInt32),
            DataType::Nullable(_) | DataType::Array(_) => Err(Error::InvalidArgumentError(
                format!("text form of composite type {self} is not supported"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_roundtrip() {
        let v = DataType::Int16.parse_text(" -42 ").unwrap();
        assert_eq!(v, DecodedValue::Int16(-42));
        assert_eq!(DataType::Int16.format_text(v).unwrap(), "-42");

        let f = DataType::Float64.parse_text("2.5").unwrap();
        assert_eq!(DataType::Float64.format_text(f).unwrap(), "2.5");
    }

    #[test]
    fn numeric_overflow_is_rejected() {
        assert!(matches!(
            DataType::UInt8.parse_text("256"),
            Err(Error::InvalidArgumentError(_))
        ));
    }

    #[test]
    fn dates_use_calendar_form() {
        let d = DataType::Date.parse_text("1970-01-11").unwrap();
        assert_eq!(d, DecodedValue::UInt16(10));
        assert_eq!(DataType::Date.format_text(d).unwrap(), "1970-01-11");

        let t = DataType::DateTime.format_text(DecodedValue::UInt32(86_399)).unwrap();
        assert_eq!(t, "1970-01-01 23:59:59");
    }

    #[test]
    fn fixed_string_width_is_enforced() {
        let dt = DataType::FixedString(3);
        assert_eq!(dt.parse_text("ab").unwrap(), DecodedValue::Bytes(b"ab"));
        assert!(matches!(
            dt.parse_text("abcd"),
            Err(Error::InvalidArgumentError(_))
        ));
        assert_eq!(dt.format_text(DecodedValue::Bytes(b"ab\0")).unwrap(), "ab");
    }

    #[test]
    fn kind_must_match_type() {
        assert!(DataType::UInt32.format_text(DecodedValue::UInt8(1)).is_err());
        assert!(DataType::Date.format_text(DecodedValue::UInt32(1)).is_err());
        assert!(DataType::nullable(DataType::String).parse_text("x").is_err());
    }
}
