// src/common/codec.rs

//! Fixed-point conversion between register bytes and measurements.
//!
//! Readings are decoded like the vendor reference driver does: the raw bytes are
//! rendered as a string of hex digits (byte `0x24` becomes `"24"`) and that
//! string is parsed as a base-16 number. Writes serialize the rounded,
//! scaled value as a big-endian integer of the field width.

use super::error::CodecError;
use arrayvec::ArrayVec;

/// Widest register block the circuits expose.
pub const MAX_FIELD_WIDTH: usize = 4;

/// Raw bytes of one register block, most significant byte first.
pub type RegisterBlock = ArrayVec<u8, MAX_FIELD_WIDTH>;

/// ASCII hex digits of one register block, two per byte.
pub type HexDigits = ArrayVec<u8, { MAX_FIELD_WIDTH * 2 }>;

const HEX: &[u8; 16] = b"0123456789abcdef";

fn check_width(width: usize) -> Result<(), CodecError> {
    if (1..=MAX_FIELD_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(CodecError::InvalidWidth(width))
    }
}

/// Renders `bytes` as lowercase hex digits, most significant first.
pub fn hex_digits(bytes: &[u8]) -> Result<HexDigits, CodecError> {
    check_width(bytes.len())?;
    let mut digits = HexDigits::new();
    for byte in bytes {
        digits.push(HEX[usize::from(byte >> 4)]);
        digits.push(HEX[usize::from(byte & 0x0F)]);
    }
    Ok(digits)
}

/// Parses ASCII hex digits as a base-16 number. `None` on a non-hex character.
pub fn parse_hex_digits(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &c| {
        let digit = (c as char).to_digit(16)?;
        acc.checked_mul(16)?.checked_add(u64::from(digit))
    })
}

/// Decodes a register block into a measurement: hex-digit value divided by `scale`.
pub fn decode_fixed_point(bytes: &[u8], scale: f64) -> Result<f64, CodecError> {
    let digits = hex_digits(bytes)?;
    // Rendered digits are always valid hex and at most 8 of them
    let raw = parse_hex_digits(&digits).unwrap_or(0);
    Ok(raw as f64 / scale)
}

/// Encodes `value * scale`, rounded to nearest, as a big-endian integer of `width` bytes.
pub fn encode_fixed_point(value: f64, scale: f64, width: usize) -> Result<RegisterBlock, CodecError> {
    check_width(width)?;
    let scaled = libm::round(value * scale);
    let max = ((1u64 << (8 * width)) - 1) as f64;
    if !scaled.is_finite() || scaled < 0.0 || scaled > max {
        return Err(CodecError::EncodingOverflow { width });
    }
    let raw = (scaled as u32).to_be_bytes();
    let mut block = RegisterBlock::new();
    // Cannot overflow: width <= MAX_FIELD_WIDTH
    block
        .try_extend_from_slice(&raw[MAX_FIELD_WIDTH - width..])
        .map_err(|_| CodecError::InvalidWidth(width))?;
    Ok(block)
}
