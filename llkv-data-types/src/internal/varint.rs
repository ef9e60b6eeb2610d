use bytes::{Buf, BufMut};

use crate::DecodeError;

/// Longest LEB128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `v` as unsigned LEB128 (7 bits per byte, high bit = continuation).
#[inline]
pub fn put_varint<B: BufMut>(dst: &mut B, mut v: u64) {
    while v >= 0x80 {
        dst.put_u8((v as u8) | 0x80);
        v >>= 7;
    }
    dst.put_u8(v as u8);
}

/// Read one unsigned LEB128 value.
#[inline]
pub fn get_varint<B: Buf>(src: &mut B) -> Result<u64, DecodeError> {
    let mut result = 0u64;
    let mut shift = 0u32;
    for _ in 0..MAX_VARINT_LEN {
        if !src.has_remaining() {
            return Err(DecodeError::NotEnoughData {
                needed: 1,
                remaining: 0,
            });
        }
        let byte = src.get_u8();
        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(DecodeError::InvalidFormat("varint longer than 10 bytes"))
}

/// Encoded length of `v` in bytes.
#[inline]
pub fn varint_len(v: u64) -> usize {
    let bits = 64 - (v | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}
