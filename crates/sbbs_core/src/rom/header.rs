use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::reader::ByteReader;

use super::types::{
    CHECKSUM_COMPLEMENT_OFFSET, CHECKSUM_OFFSET, FAST_SPEED_BIT, HEADER_SIZE, MAP_MODE_MASK,
    MAX_SIZE_SHIFT, RAM_SIZE_OFFSET, REGION_OFFSET, ROM_SIZE_OFFSET, SPEED_MAP_MODE_OFFSET,
    TITLE_LEN, TITLE_OFFSET,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingMode {
    LoRom,
    HiRom,
    ExHiRom,
}

impl MappingMode {
    pub const LO_ROM_RAW: u8 = 0;
    pub const HI_ROM_RAW: u8 = 1;
    pub const EX_HI_ROM_RAW: u8 = 5;

    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            Self::LO_ROM_RAW => Some(Self::LoRom),
            Self::HI_ROM_RAW => Some(Self::HiRom),
            Self::EX_HI_ROM_RAW => Some(Self::ExHiRom),
            _ => None,
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::LoRom => Self::LO_ROM_RAW,
            Self::HiRom => Self::HI_ROM_RAW,
            Self::ExHiRom => Self::EX_HI_ROM_RAW,
        }
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::LoRom => "LoROM",
            Self::HiRom => "HiROM",
            Self::ExHiRom => "ExHiROM",
        })
    }
}

/// The 64-byte internal cartridge header.
///
/// Only the checksum pair is ever rewritten; every other byte of the window
/// is carried in `raw` and emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    pub title: String,
    pub mapping_mode: MappingMode,
    pub fast_speed: bool,
    pub rom_size: u64,
    pub ram_size: u64,
    pub region: u8,
    pub checksum: u16,
    pub checksum_complement: u16,
    raw: [u8; HEADER_SIZE],
}

impl RomHeader {
    pub fn parse(window: &[u8]) -> Result<Self, CoreError> {
        if window.len() != HEADER_SIZE {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!(
                    "header window must be {HEADER_SIZE} bytes, got {}",
                    window.len()
                ),
            ));
        }
        let r = ByteReader::new(window);
        let raw: [u8; HEADER_SIZE] = r.read_array(0)?;

        let title_bytes = r.read_bytes(TITLE_OFFSET, TITLE_LEN)?;
        if let Some(pos) = title_bytes
            .iter()
            .position(|&b| !(b.is_ascii_graphic() || b == b' '))
        {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!(
                    "title byte {pos} is not printable ASCII: {:#04x}",
                    title_bytes[pos]
                ),
            ));
        }
        let title = r.read_ascii(TITLE_OFFSET, TITLE_LEN)?;

        let speed_byte = r.read_u8(SPEED_MAP_MODE_OFFSET)?;
        let mapping_mode = MappingMode::from_raw(speed_byte & MAP_MODE_MASK).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::Format,
                format!("unknown mapping mode {:#x}", speed_byte & MAP_MODE_MASK),
            )
        })?;
        let fast_speed = speed_byte & FAST_SPEED_BIT != 0;

        let rom_size = size_from_shift(r.read_u8(ROM_SIZE_OFFSET)?, "ROM")?;
        let ram_size = size_from_shift(r.read_u8(RAM_SIZE_OFFSET)?, "RAM")?;
        let region = r.read_u8(REGION_OFFSET)?;
        let checksum_complement = r.read_u16_le(CHECKSUM_COMPLEMENT_OFFSET)?;
        let checksum = r.read_u16_le(CHECKSUM_OFFSET)?;

        if checksum ^ 0xFFFF != checksum_complement {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!(
                    "checksum {checksum:#06x} and complement {checksum_complement:#06x} don't match"
                ),
            ));
        }

        Ok(Self {
            title,
            mapping_mode,
            fast_speed,
            rom_size,
            ram_size,
            region,
            checksum,
            checksum_complement,
            raw,
        })
    }

    pub fn set_checksum(&mut self, checksum: u16) {
        self.checksum = checksum;
        self.checksum_complement = checksum ^ 0xFFFF;
    }

    pub fn is_consistent(&self) -> bool {
        self.checksum ^ 0xFFFF == self.checksum_complement
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = self.raw;
        self.write_checksum(&mut out);
        out
    }

    /// Patch the checksum pair into a live header window, leaving every other
    /// byte as the window currently holds it.
    pub fn write_checksum(&self, window: &mut [u8; HEADER_SIZE]) {
        window[CHECKSUM_COMPLEMENT_OFFSET..CHECKSUM_COMPLEMENT_OFFSET + 2]
            .copy_from_slice(&self.checksum_complement.to_le_bytes());
        window[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2]
            .copy_from_slice(&self.checksum.to_le_bytes());
    }

    pub(crate) fn sync_raw(&mut self, window: &[u8; HEADER_SIZE]) {
        self.raw = *window;
    }
}

fn size_from_shift(shift: u8, label: &str) -> Result<u64, CoreError> {
    if shift > MAX_SIZE_SHIFT {
        return Err(CoreError::new(
            CoreErrorCode::Format,
            format!("{label} size byte {shift:#x} out of range"),
        ));
    }
    Ok(1024u64 << shift)
}
