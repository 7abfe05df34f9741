// Expected header values for Super Baseball Simulator 1000
pub const EXPECTED_TITLE: &str = "baseball simulator   ";
pub const EXPECTED_ROM_SIZE: u64 = 0x80000;
pub const EXPECTED_RAM_SIZE: u64 = 0x2000;
pub const EXPECTED_REGION: u8 = 1;

// Team records
pub const TEAM_COUNT: usize = 18;
pub const MAX_TEAM_IDX: usize = TEAM_COUNT - 1;
pub const TEAM_BASE: usize = 0x18012;
pub const TEAM_RECORD_SIZE: usize = 0x20;
pub const TEAM_NAME_OFFSET: usize = 0x03;
pub const TEAM_NAME_LEN: usize = 10;
pub const FIELD_MAP_OFFSET: usize = 0x0E;
pub const FIELDERS_PER_TEAM: usize = 12;
pub const PITCHER_MAP_OFFSET: usize = 0x1A;
pub const PITCHERS_PER_TEAM: usize = 6;

/// Pitcher records are numbered after every team's field players.
pub const PITCHER_IDX_BASE: usize = FIELDERS_PER_TEAM * TEAM_COUNT;

pub const JERSEY_NUMBER_MASK: u8 = 0x0F;
pub const FIELD_POSITION_MASK: u8 = 0xF0;
pub const MAX_JERSEY_NUMBER: u8 = 15;

// Player records
pub const PLAYER_BASE: usize = 0x18252;
pub const PLAYER_RECORD_SIZE: usize = 24;
pub const MAX_PLAYER_IDX: usize = 0xA1 * 2 + 1;
pub const PLAYER_NAME_LEN: usize = 5;

// Offsets inside a player record. Several are shared between roles.
pub const HANDED_OFFSET: usize = 0x05;
/// Batting average (fielder) or ERA x100 (pitcher): packed tens/ones, then hundreds.
pub const AVERAGE_OFFSET: usize = 0x06;
/// Home runs (fielder) or speed (pitcher), packed.
pub const HOME_RUN_OFFSET: usize = 0x08;
pub const THROW_OFFSET: usize = 0x0B;
pub const PITCH_RIGHT_OFFSET: usize = 0x0B;
pub const RUN_OFFSET: usize = 0x0C;
pub const PITCH_LEFT_OFFSET: usize = 0x0C;
pub const FIELD_OFFSET: usize = 0x0D;
pub const PITCHER_STAMINA_OFFSET: usize = 0x0E;
pub const FIELDER_STAMINA_OFFSET: usize = 0x0F;
pub const ABILITY_OFFSET: usize = 0x10;
pub const HITTER_ABILITY_ACTIVE_OFFSET: usize = 0x11;
pub const PITCHER_ABILITY_SLOTS: usize = 4;

// Logos
pub const LOGO_BASE: usize = 0x58000;
pub const LOGO_TEAM_STRIDE: usize = 0x400;
pub const LOGO_TEAMS_PER_ROW: usize = 8;
pub const LOGO_GROUP_SIZE: usize = 0x60;
pub const LOGO_LOW_OFFSET: usize = 0x200;
pub const LOGO_TILES_PER_GROUP: usize = 3;
pub const LOGO_WIDTH: usize = 24;
pub const LOGO_HEIGHT: usize = 16;

pub const LOGO_PALETTE: [[u8; 4]; 16] = [
    [0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0xFF],
    [0x63, 0xAD, 0xF7, 0xFF],
    [0x31, 0x7B, 0xDE, 0xFF],
    [0x00, 0xBD, 0x00, 0xFF],
    [0x00, 0xEF, 0x00, 0xFF],
    [0xB5, 0x29, 0x08, 0xFF],
    [0xEF, 0xEF, 0x00, 0xFF],
    [0x84, 0x84, 0x84, 0xFF],
    [0xAD, 0xAD, 0xAD, 0xFF],
    [0xC6, 0xC6, 0xC6, 0xFF],
    [0x18, 0x52, 0x9C, 0xFF],
    [0xA5, 0x5A, 0x00, 0xFF],
    [0xDE, 0x7B, 0x00, 0xFF],
    [0xCE, 0x94, 0x00, 0xFF],
    [0xF7, 0xF7, 0xF7, 0xFF],
];
