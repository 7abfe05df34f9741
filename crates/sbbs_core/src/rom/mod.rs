pub mod header;
pub mod types;

use crate::core_api::{CoreError, CoreErrorCode};
use crate::reader::ByteReader;
use header::RomHeader;
use types::{
    CHECKSUM_COMPLEMENT_OFFSET, CHECKSUM_OFFSET, CHECKSUM_PAIR_BYTE_SUM, COPIER_HEADER_SIZE,
    HEADER_CANDIDATE_OFFSETS, HEADER_SIZE, IMAGE_PAGE_SIZE,
};

/// A cartridge image: the one mutable byte buffer every record codec reads
/// from and commits into.
///
/// All offsets taken and returned by this type are logical, i.e. relative to
/// the first byte after an optional copier header.
#[derive(Debug, Clone)]
pub struct Rom {
    data: Vec<u8>,
    base_offset: usize,
    header_offset: usize,
    header: RomHeader,
}

impl Rom {
    /// Locate and validate the internal header. Fails without constructing
    /// anything if no candidate header matches the image checksum.
    pub fn load(bytes: impl Into<Vec<u8>>) -> Result<Self, CoreError> {
        let data = bytes.into();
        let base_offset = detect_base_offset(data.len());
        let logical_len = data.len() - base_offset;
        if logical_len == 0 || logical_len % IMAGE_PAGE_SIZE != 0 {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!(
                    "unrecognized image length {:#x} (copier header: {})",
                    data.len(),
                    base_offset != 0
                ),
            ));
        }

        let computed = additive_checksum(&data[base_offset..]);
        let mut rejections = Vec::new();

        for &candidate in &HEADER_CANDIDATE_OFFSETS {
            let start = base_offset + candidate;
            let Some(window) = data.get(start..start + HEADER_SIZE) else {
                rejections.push(format!("{candidate:#x}: beyond end of image"));
                continue;
            };

            let header = match RomHeader::parse(window) {
                Ok(header) => header,
                Err(e) => {
                    tracing::debug!("header candidate {:#x} rejected: {}", candidate, e.message);
                    rejections.push(format!("{candidate:#x}: {}", e.message));
                    continue;
                }
            };

            if header.checksum != computed {
                tracing::debug!(
                    "header candidate {:#x} checksum mismatch: stored {:#06x}, computed {:#06x}",
                    candidate,
                    header.checksum,
                    computed
                );
                rejections.push(format!(
                    "{candidate:#x}: checksum mismatch, stored {:#06x}, computed {computed:#06x}",
                    header.checksum
                ));
                continue;
            }

            tracing::info!(
                "found {} header at {:#x}: \"{}\", checksum {:#06x}",
                header.mapping_mode,
                candidate,
                header.title,
                header.checksum
            );

            return Ok(Self {
                data,
                base_offset,
                header_offset: candidate,
                header,
            });
        }

        Err(CoreError::new(
            CoreErrorCode::Format,
            format!("couldn't find ROM header ({})", rejections.join("; ")),
        ))
    }

    pub fn header(&self) -> &RomHeader {
        &self.header
    }

    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    pub fn has_copier_header(&self) -> bool {
        self.base_offset != 0
    }

    /// Logical length, excluding any copier header.
    pub fn len(&self) -> usize {
        self.data.len() - self.base_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8], CoreError> {
        ByteReader::new(self.logical()).read_bytes(offset, len)
    }

    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(self.logical())
    }

    /// Overwrite `bytes.len()` bytes in place. Nothing is written if the range
    /// does not fit.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), CoreError> {
        let len = self.len();
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= len)
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::Range,
                    format!(
                        "write of {} bytes at {offset:#x} past end of image (len {len:#x})",
                        bytes.len()
                    ),
                )
            })?;
        let base = self.base_offset;
        self.data[base + offset..base + end].copy_from_slice(bytes);
        Ok(())
    }

    /// The checksum the header will carry after the next [`Rom::save`].
    ///
    /// Computed as if the header already held a consistent checksum pair, so
    /// the result doesn't depend on what the pair currently contains.
    pub fn checksum(&self) -> u16 {
        let logical = self.logical();
        let pair_start = self.header_offset + CHECKSUM_COMPLEMENT_OFFSET;
        let pair_end = self.header_offset + CHECKSUM_OFFSET + 2;
        let sum = byte_sum(&logical[..pair_start])
            .wrapping_add(byte_sum(&logical[pair_end..]))
            .wrapping_add(CHECKSUM_PAIR_BYTE_SUM);
        (sum & 0xFFFF) as u16
    }

    /// Recompute the checksum, patch it into the header and return the whole
    /// image, copier header included.
    pub fn save(&mut self) -> Vec<u8> {
        let checksum = self.checksum();
        let previous = self.header.checksum;
        self.header.set_checksum(checksum);
        let start = self.base_offset + self.header_offset;
        let mut window = [0u8; HEADER_SIZE];
        window.copy_from_slice(&self.data[start..start + HEADER_SIZE]);
        self.header.write_checksum(&mut window);
        self.header.sync_raw(&window);
        self.data[start..start + HEADER_SIZE].copy_from_slice(&window);
        tracing::info!(
            "checksum updated: {:#06x} -> {:#06x} (complement {:#06x})",
            previous,
            checksum,
            self.header.checksum_complement
        );
        self.data.clone()
    }

    /// The full buffer as it currently stands, without touching the checksum.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn logical(&self) -> &[u8] {
        &self.data[self.base_offset..]
    }
}

pub fn detect_base_offset(len: usize) -> usize {
    if len % IMAGE_PAGE_SIZE == COPIER_HEADER_SIZE {
        COPIER_HEADER_SIZE
    } else {
        0
    }
}

/// Sum of every byte, truncated to 16 bits.
pub fn additive_checksum(bytes: &[u8]) -> u16 {
    (byte_sum(bytes) & 0xFFFF) as u16
}

fn byte_sum(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
}
