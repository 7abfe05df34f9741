// Cartridge image constants

/// Size of the optional block some copier devices prepend to a dump.
pub const COPIER_HEADER_SIZE: usize = 0x200;
/// Images are made of 4 KiB pages; a copier header shows up as the remainder.
pub const IMAGE_PAGE_SIZE: usize = 0x1000;

pub const HEADER_SIZE: usize = 0x40;
/// Candidate header locations, tried in order (LoROM, HiROM, ExHiROM).
pub const HEADER_CANDIDATE_OFFSETS: [usize; 3] = [0x7FC0, 0xFFC0, 0x40_FFC0];

// Offsets inside the 64-byte header window
pub const TITLE_OFFSET: usize = 0x00;
pub const TITLE_LEN: usize = 21;
pub const SPEED_MAP_MODE_OFFSET: usize = 0x15;
pub const ROM_SIZE_OFFSET: usize = 0x17;
pub const RAM_SIZE_OFFSET: usize = 0x18;
pub const REGION_OFFSET: usize = 0x19;
pub const CHECKSUM_COMPLEMENT_OFFSET: usize = 0x1C;
pub const CHECKSUM_OFFSET: usize = 0x1E;

pub const MAP_MODE_MASK: u8 = 0x0F;
pub const FAST_SPEED_BIT: u8 = 0x10;

/// Largest size shift that still describes a plausible chip (1024 << 32 = 4 TiB).
pub const MAX_SIZE_SHIFT: u8 = 32;

/// A consistent checksum/complement pair always adds this much to the byte sum.
pub const CHECKSUM_PAIR_BYTE_SUM: u32 = 0x1FE;
