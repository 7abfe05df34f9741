//! The in-game font. Only the glyphs seen in team and player names are
//! mapped; the `.` slots are unidentified glyphs.

use crate::core_api::{CoreError, CoreErrorCode};

const FONT: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUV0123456789..WXYZ..........................T...............HE.... ...............";

/// Rendered for bytes past the end of the table.
pub const PLACEHOLDER: char = ' ';

pub fn decode_char(byte: u8) -> char {
    FONT.as_bytes()
        .get(usize::from(byte))
        .map_or(PLACEHOLDER, |&b| b as char)
}

pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| decode_char(b)).collect()
}

/// First table slot holding `c`, after upper-casing.
pub fn encode_char(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    FONT.chars()
        .position(|glyph| glyph == upper)
        .and_then(|pos| u8::try_from(pos).ok())
}

pub fn encode(s: &str) -> Result<Vec<u8>, CoreError> {
    s.chars()
        .enumerate()
        .map(|(pos, c)| {
            encode_char(c).ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::Encoding,
                    format!("character {c:?} at position {pos} of {s:?} has no glyph"),
                )
            })
        })
        .collect()
}

/// Encode into exactly `len` bytes, padding short strings with blanks.
pub fn encode_padded(s: &str, len: usize) -> Result<Vec<u8>, CoreError> {
    let mut bytes = encode(s)?;
    if bytes.len() > len {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!(
                "{s:?} is {} characters, limit is {len}",
                s.chars().count()
            ),
        ));
    }
    let blank = encode_char(PLACEHOLDER).unwrap_or(0);
    bytes.resize(len, blank);
    Ok(bytes)
}

/// Like [`encode_padded`], but hands back `original` untouched when `s` is
/// exactly what it decodes to. The font has duplicate and unmapped slots, so
/// re-encoding an unedited name would not always give back the same bytes.
pub fn encode_preserving(s: &str, original: &[u8]) -> Result<Vec<u8>, CoreError> {
    if decode(original) == s {
        return Ok(original.to_vec());
    }
    encode_padded(s, original.len())
}
