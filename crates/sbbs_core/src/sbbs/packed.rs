//! Two decimal digits per byte (tens in the high nibble, ones in the low),
//! with an optional separate byte carrying the hundreds digit.

use crate::core_api::{CoreError, CoreErrorCode};

pub const MAX_PACKED: u8 = 99;
pub const MAX_PACKED_PAIR: u16 = 999;

pub fn decode_packed(byte: u8) -> Result<u8, CoreError> {
    let tens = byte >> 4;
    let ones = byte & 0x0F;
    if tens > 9 || ones > 9 {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!("packed digit byte {byte:#04x} has a nibble outside 0-9"),
        ));
    }
    Ok(tens * 10 + ones)
}

pub fn encode_packed(value: u8) -> Result<u8, CoreError> {
    if value > MAX_PACKED {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!("{value} does not fit in two packed digits"),
        ));
    }
    Ok((value / 10) * 16 + value % 10)
}

/// `[packed tens/ones, hundreds]`, in storage order.
pub fn decode_packed_pair(bytes: [u8; 2]) -> Result<u16, CoreError> {
    let [low, hundreds] = bytes;
    if hundreds > 9 {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!("hundreds byte {hundreds:#04x} is not a decimal digit"),
        ));
    }
    Ok(u16::from(hundreds) * 100 + u16::from(decode_packed(low)?))
}

pub fn encode_packed_pair(value: u16) -> Result<[u8; 2], CoreError> {
    if value > MAX_PACKED_PAIR {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!("{value} does not fit in three packed digits"),
        ));
    }
    let low = encode_packed((value % 100) as u8)?;
    Ok([low, (value / 100) as u8])
}
