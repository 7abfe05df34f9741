use crate::core_api::{CoreError, CoreErrorCode};

/// Fixed-offset view over a byte slice. Every read is bounds-checked and
/// reports the offending offset instead of panicking.
pub struct ByteReader<'a> {
    inner: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(inner: &'a [u8]) -> Self {
        Self { inner }
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, CoreError> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, CoreError> {
        let bytes = self.read_array::<2>(offset)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], CoreError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(offset, N)?);
        Ok(out)
    }

    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], CoreError> {
        let end = offset.checked_add(len).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::Range,
                format!("read of {len} bytes at {offset:#x} overflows"),
            )
        })?;
        self.inner.get(offset..end).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::Range,
                format!(
                    "read of {len} bytes at {offset:#x} past end of buffer (len {:#x})",
                    self.inner.len()
                ),
            )
        })
    }

    /// Read bytes up to the first NUL, consuming at most `max_len`.
    pub fn read_ascii(&self, offset: usize, max_len: usize) -> Result<String, CoreError> {
        let bytes = self.read_bytes(offset, max_len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(max_len);
        if !bytes[..end].is_ascii() {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!("non-ASCII text at {offset:#x}"),
            ));
        }
        Ok(bytes[..end].iter().map(|&b| b as char).collect())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;
    use crate::core_api::CoreErrorCode;

    #[test]
    fn reads_little_endian_words() {
        let bytes = [0x34, 0x12, 0xff];
        let r = ByteReader::new(&bytes);
        assert_eq!(r.read_u16_le(0).unwrap(), 0x1234);
        assert_eq!(r.read_u8(2).unwrap(), 0xff);
    }

    #[test]
    fn out_of_bounds_read_is_a_range_error() {
        let bytes = [0u8; 4];
        let r = ByteReader::new(&bytes);
        let err = r.read_bytes(3, 2).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Range);
        assert!(err.message.contains("0x3"));
        assert_eq!(r.read_u8(usize::MAX).unwrap_err().code, CoreErrorCode::Range);
    }

    #[test]
    fn ascii_stops_at_nul() {
        let bytes = *b"abc\0def";
        let r = ByteReader::new(&bytes);
        assert_eq!(r.read_ascii(0, 7).unwrap(), "abc");
    }
}
