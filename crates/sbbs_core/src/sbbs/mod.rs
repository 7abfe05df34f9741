pub mod ability;
pub mod charmap;
pub mod logo;
pub mod packed;
pub mod player;
pub mod team;
pub mod types;

use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::{ByteRange, RegionId, RomLayout};
use crate::rom::Rom;
use crate::rom::header::RomHeader;
use crate::rom::types::HEADER_SIZE;

use player::PlayerRecord;
use types::{
    EXPECTED_RAM_SIZE, EXPECTED_REGION, EXPECTED_ROM_SIZE, EXPECTED_TITLE, MAX_PLAYER_IDX,
    TEAM_COUNT,
};

/// Make sure a header that already passed the checksum belongs to this game.
pub fn check_header(header: &RomHeader) -> Result<(), CoreError> {
    if header.title != EXPECTED_TITLE {
        return Err(mismatch("title", EXPECTED_TITLE, &header.title));
    }
    if header.rom_size != EXPECTED_ROM_SIZE {
        return Err(mismatch(
            "ROM size",
            format!("{EXPECTED_ROM_SIZE:#x}"),
            format!("{:#x}", header.rom_size),
        ));
    }
    if header.ram_size != EXPECTED_RAM_SIZE {
        return Err(mismatch(
            "RAM size",
            format!("{EXPECTED_RAM_SIZE:#x}"),
            format!("{:#x}", header.ram_size),
        ));
    }
    if header.region != EXPECTED_REGION {
        return Err(mismatch("region", EXPECTED_REGION, header.region));
    }
    Ok(())
}

fn mismatch(
    field: &str,
    expected: impl std::fmt::Display,
    found: impl std::fmt::Display,
) -> CoreError {
    CoreError::new(
        CoreErrorCode::Format,
        format!("unexpected {field}: expected \"{expected}\", found \"{found}\""),
    )
}

/// Every region the editor reads or writes.
pub fn layout(rom: &Rom) -> Result<RomLayout, CoreError> {
    let mut layout = RomLayout::new(rom.len());
    layout.push(
        RegionId::Header,
        ByteRange::new(rom.header_offset(), HEADER_SIZE),
    );
    for team in 0..TEAM_COUNT {
        layout.push(RegionId::Team(team), team::team_range(team)?);
        let (high, low) = logo::logo_ranges(team)?;
        layout.push(RegionId::LogoHigh(team), high);
        layout.push(RegionId::LogoLow(team), low);
    }
    for player in 0..=MAX_PLAYER_IDX {
        layout.push(RegionId::Player(player), PlayerRecord::range(player)?);
    }
    Ok(layout)
}

/// Load an image and check that it is this game with every record in bounds.
pub fn load_rom(bytes: impl Into<Vec<u8>>) -> Result<Rom, CoreError> {
    let rom = Rom::load(bytes)?;
    check_header(rom.header())?;
    layout(&rom)?.validate()?;
    Ok(rom)
}
