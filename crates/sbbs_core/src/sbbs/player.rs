use crate::core_api::{CoreError, CoreErrorCode};
use crate::handedness::Handedness;
use crate::layout::ByteRange;
use crate::rom::Rom;

use super::ability::{HitterAbility, PitcherAbility};
use super::charmap;
use super::packed::{decode_packed, decode_packed_pair, encode_packed, encode_packed_pair};
use super::types::{
    ABILITY_OFFSET, AVERAGE_OFFSET, FIELD_OFFSET, FIELDER_STAMINA_OFFSET, HANDED_OFFSET,
    HITTER_ABILITY_ACTIVE_OFFSET, HOME_RUN_OFFSET, MAX_PLAYER_IDX, PITCH_LEFT_OFFSET,
    PITCH_RIGHT_OFFSET, PITCHER_ABILITY_SLOTS, PITCHER_STAMINA_OFFSET, PLAYER_BASE,
    PLAYER_NAME_LEN, PLAYER_RECORD_SIZE, RUN_OFFSET, THROW_OFFSET,
};

pub type RawRecord = [u8; PLAYER_RECORD_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Fielder,
    Pitcher,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattingStats {
    /// Batting average in thousandths (0-999).
    pub average: u16,
    pub home_runs: u8,
    pub throwing: u8,
    pub running: u8,
    pub fielding: u8,
    pub stamina: u8,
    pub ability: HitterAbility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchingStats {
    /// Earned run average x100 (0-999).
    pub era: u16,
    pub speed: u8,
    pub pitch_right: u8,
    pub pitch_left: u8,
    pub fielding: u8,
    pub stamina: u8,
    pub abilities: [PitcherAbility; PITCHER_ABILITY_SLOTS],
}

/// Fielders and pitchers share one record layout but read the stat bytes
/// differently; the variant says which reading applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStats {
    Fielder(BattingStats),
    Pitcher(PitchingStats),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    index: usize,
    raw_name: [u8; PLAYER_NAME_LEN],
    pub name: String,
    pub handedness: Handedness,
    pub stats: PlayerStats,
}

impl PlayerRecord {
    pub fn offset(index: usize) -> Result<usize, CoreError> {
        if index > MAX_PLAYER_IDX {
            return Err(CoreError::new(
                CoreErrorCode::Range,
                format!("player index {index} is bigger than max player index {MAX_PLAYER_IDX}"),
            ));
        }
        Ok(PLAYER_BASE + PLAYER_RECORD_SIZE * index)
    }

    pub fn range(index: usize) -> Result<ByteRange, CoreError> {
        Ok(ByteRange::new(Self::offset(index)?, PLAYER_RECORD_SIZE))
    }

    pub fn decode(rom: &Rom, index: usize, role: Role) -> Result<Self, CoreError> {
        let offset = Self::offset(index)?;
        let raw: RawRecord = rom.reader().read_array(offset)?;
        Self::from_bytes(index, role, &raw)
            .map_err(|e| e.context(format!("player {index} at {offset:#x}")))
    }

    pub fn from_bytes(index: usize, role: Role, raw: &RawRecord) -> Result<Self, CoreError> {
        let mut raw_name = [0u8; PLAYER_NAME_LEN];
        raw_name.copy_from_slice(&raw[..PLAYER_NAME_LEN]);
        let name = charmap::decode(&raw_name);
        let handedness = Handedness::from_flags(raw[HANDED_OFFSET]);
        let average = decode_packed_pair([raw[AVERAGE_OFFSET], raw[AVERAGE_OFFSET + 1]])?;
        let home_runs = decode_packed(raw[HOME_RUN_OFFSET])?;

        let stats = match role {
            Role::Fielder => PlayerStats::Fielder(BattingStats {
                average,
                home_runs,
                throwing: raw[THROW_OFFSET],
                running: raw[RUN_OFFSET],
                fielding: raw[FIELD_OFFSET],
                stamina: raw[FIELDER_STAMINA_OFFSET],
                ability: decode_hitter_ability(raw[ABILITY_OFFSET])?,
            }),
            Role::Pitcher => {
                let mut abilities = [PitcherAbility::Nothing; PITCHER_ABILITY_SLOTS];
                for (slot, ability) in abilities.iter_mut().enumerate() {
                    *ability = decode_pitcher_ability(raw[ABILITY_OFFSET + slot], slot)?;
                }
                PlayerStats::Pitcher(PitchingStats {
                    era: average,
                    speed: home_runs,
                    pitch_right: raw[PITCH_RIGHT_OFFSET],
                    pitch_left: raw[PITCH_LEFT_OFFSET],
                    fielding: raw[FIELD_OFFSET],
                    stamina: raw[PITCHER_STAMINA_OFFSET],
                    abilities,
                })
            }
        };

        Ok(Self {
            index,
            raw_name,
            name,
            handedness,
            stats,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn role(&self) -> Role {
        match self.stats {
            PlayerStats::Fielder(_) => Role::Fielder,
            PlayerStats::Pitcher(_) => Role::Pitcher,
        }
    }

    pub fn batting(&self) -> Option<&BattingStats> {
        match &self.stats {
            PlayerStats::Fielder(stats) => Some(stats),
            PlayerStats::Pitcher(_) => None,
        }
    }

    pub fn pitching(&self) -> Option<&PitchingStats> {
        match &self.stats {
            PlayerStats::Pitcher(stats) => Some(stats),
            PlayerStats::Fielder(_) => None,
        }
    }

    /// Overlay the modeled fields onto `current`, keeping every byte this
    /// type doesn't know about.
    pub fn to_bytes(&self, current: &RawRecord) -> Result<RawRecord, CoreError> {
        let mut data = *current;

        let name = charmap::encode_preserving(&self.name, &self.raw_name)?;
        data[..PLAYER_NAME_LEN].copy_from_slice(&name);
        data[HANDED_OFFSET] = self.handedness.apply_to(data[HANDED_OFFSET]);

        match &self.stats {
            PlayerStats::Fielder(stats) => {
                let average = encode_packed_pair(stats.average)?;
                data[AVERAGE_OFFSET..AVERAGE_OFFSET + 2].copy_from_slice(&average);
                data[HOME_RUN_OFFSET] = encode_packed(stats.home_runs)?;
                data[THROW_OFFSET] = stats.throwing;
                data[RUN_OFFSET] = stats.running;
                data[FIELD_OFFSET] = stats.fielding;
                data[FIELDER_STAMINA_OFFSET] = stats.stamina;
                data[ABILITY_OFFSET] = stats.ability.raw();
                if stats.ability != HitterAbility::Nothing {
                    data[HITTER_ABILITY_ACTIVE_OFFSET] = 1;
                }
            }
            PlayerStats::Pitcher(stats) => {
                let era = encode_packed_pair(stats.era)?;
                data[AVERAGE_OFFSET..AVERAGE_OFFSET + 2].copy_from_slice(&era);
                data[HOME_RUN_OFFSET] = encode_packed(stats.speed)?;
                data[PITCH_RIGHT_OFFSET] = stats.pitch_right;
                data[PITCH_LEFT_OFFSET] = stats.pitch_left;
                data[FIELD_OFFSET] = stats.fielding;
                data[PITCHER_STAMINA_OFFSET] = stats.stamina;
                for (slot, ability) in stats.abilities.iter().enumerate() {
                    data[ABILITY_OFFSET + slot] = ability.raw();
                }
            }
        }

        Ok(data)
    }

    /// Encode against the bytes currently in `rom`. Nothing is written if any
    /// field fails to encode.
    pub fn encode(&self, rom: &Rom) -> Result<(usize, RawRecord), CoreError> {
        let offset = Self::offset(self.index)?;
        let current: RawRecord = rom.reader().read_array(offset)?;
        let data = self
            .to_bytes(&current)
            .map_err(|e| e.context(format!("player {} ({})", self.index, self.name.trim_end())))?;
        Ok((offset, data))
    }

    pub fn commit(&self, rom: &mut Rom) -> Result<(), CoreError> {
        let (offset, data) = self.encode(rom)?;
        rom.write(offset, &data)?;
        tracing::trace!("committed player {} at {:#x}", self.index, offset);
        Ok(())
    }
}

fn decode_hitter_ability(raw: u8) -> Result<HitterAbility, CoreError> {
    HitterAbility::from_raw(raw).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::Encoding,
            format!("unknown hitting ability {raw:#04x}, expected 0x00..=0x14"),
        )
    })
}

fn decode_pitcher_ability(raw: u8, slot: usize) -> Result<PitcherAbility, CoreError> {
    PitcherAbility::from_raw(raw).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::Encoding,
            format!("unknown pitch ability {raw:#04x} in slot {slot}, expected 0x00..=0x14"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // "GUS  ", right handed, .345, 12 HR, ability METEOR
    fn fielder_bytes() -> RawRecord {
        let mut raw = [0u8; PLAYER_RECORD_SIZE];
        raw[..5].copy_from_slice(&[0x10, 0x1E, 0x1C, 96, 96]);
        raw[HANDED_OFFSET] = 0x80;
        raw[AVERAGE_OFFSET] = 0x45;
        raw[AVERAGE_OFFSET + 1] = 3;
        raw[HOME_RUN_OFFSET] = 0x12;
        raw[THROW_OFFSET] = 7;
        raw[RUN_OFFSET] = 8;
        raw[FIELD_OFFSET] = 9;
        raw[FIELDER_STAMINA_OFFSET] = 50;
        raw[ABILITY_OFFSET] = 0x07;
        raw[HITTER_ABILITY_ACTIVE_OFFSET] = 1;
        raw[0x17] = 0xAB;
        raw
    }

    #[test]
    fn decodes_fielder_view() {
        let p = PlayerRecord::from_bytes(3, Role::Fielder, &fielder_bytes()).unwrap();
        assert_eq!(p.name, "GUS  ");
        assert_eq!(p.handedness, Handedness::Right);
        let stats = p.batting().expect("fielder stats");
        assert_eq!(stats.average, 345);
        assert_eq!(stats.home_runs, 12);
        assert_eq!(stats.ability, HitterAbility::Meteor);
        assert_eq!(stats.stamina, 50);
        assert!(p.pitching().is_none());
    }

    #[test]
    fn same_bytes_read_as_pitcher() {
        let mut raw = fielder_bytes();
        raw[ABILITY_OFFSET + 1] = 0x01;
        raw[ABILITY_OFFSET + 2] = 0x14;
        let p = PlayerRecord::from_bytes(300, Role::Pitcher, &raw).unwrap();
        let stats = p.pitching().expect("pitcher stats");
        assert_eq!(stats.era, 345);
        assert_eq!(stats.speed, 12);
        assert_eq!(stats.pitch_right, 7);
        assert_eq!(stats.pitch_left, 8);
        assert_eq!(stats.stamina, 0);
        assert_eq!(
            stats.abilities,
            [
                PitcherAbility::IronBall,
                PitcherAbility::FireBall,
                PitcherAbility::QuestionmarkBall,
                PitcherAbility::Nothing
            ]
        );
    }

    #[test]
    fn unchanged_record_encodes_to_same_bytes() {
        let raw = fielder_bytes();
        let p = PlayerRecord::from_bytes(3, Role::Fielder, &raw).unwrap();
        assert_eq!(p.to_bytes(&raw).unwrap(), raw);

        let p = PlayerRecord::from_bytes(300, Role::Pitcher, &raw).unwrap();
        assert_eq!(p.to_bytes(&raw).unwrap(), raw);
    }

    #[test]
    fn handedness_only_touches_bit_zero() {
        let raw = fielder_bytes();
        let mut p = PlayerRecord::from_bytes(3, Role::Fielder, &raw).unwrap();
        p.handedness = Handedness::Left;
        let out = p.to_bytes(&raw).unwrap();
        assert_eq!(out[HANDED_OFFSET], 0x81);
    }

    #[test]
    fn edits_rewrite_packed_fields_and_active_flag() {
        let mut raw = fielder_bytes();
        raw[ABILITY_OFFSET] = 0;
        raw[HITTER_ABILITY_ACTIVE_OFFSET] = 0;
        let mut p = PlayerRecord::from_bytes(3, Role::Fielder, &raw).unwrap();
        p.name = "ace".to_string();
        if let PlayerStats::Fielder(stats) = &mut p.stats {
            stats.average = 999;
            stats.home_runs = 40;
            stats.ability = HitterAbility::HyperHit;
        }
        let out = p.to_bytes(&raw).unwrap();
        assert_eq!(&out[..5], &[10, 12, 14, 96, 96]);
        assert_eq!(out[AVERAGE_OFFSET], 0x99);
        assert_eq!(out[AVERAGE_OFFSET + 1], 9);
        assert_eq!(out[HOME_RUN_OFFSET], 0x40);
        assert_eq!(out[ABILITY_OFFSET], 0x01);
        assert_eq!(out[HITTER_ABILITY_ACTIVE_OFFSET], 1);
        assert_eq!(out[0x17], 0xAB);
    }

    #[test]
    fn bad_values_fail_to_encode() {
        let raw = fielder_bytes();
        let mut p = PlayerRecord::from_bytes(3, Role::Fielder, &raw).unwrap();
        p.name = "TOOLONG".to_string();
        assert_eq!(p.to_bytes(&raw).unwrap_err().code, CoreErrorCode::Encoding);

        let mut p = PlayerRecord::from_bytes(3, Role::Fielder, &raw).unwrap();
        if let PlayerStats::Fielder(stats) = &mut p.stats {
            stats.home_runs = 150;
        }
        assert_eq!(p.to_bytes(&raw).unwrap_err().code, CoreErrorCode::Encoding);
    }

    #[test]
    fn out_of_set_ability_fails_decode() {
        let mut raw = fielder_bytes();
        raw[ABILITY_OFFSET] = 0x15;
        let err = PlayerRecord::from_bytes(3, Role::Fielder, &raw).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::Encoding);

        let mut raw = fielder_bytes();
        raw[ABILITY_OFFSET + 3] = 0x40;
        let err = PlayerRecord::from_bytes(3, Role::Pitcher, &raw).unwrap_err();
        assert!(err.message.contains("slot 3"));
    }

    #[test]
    fn index_bounds() {
        assert_eq!(PlayerRecord::offset(0).unwrap(), 0x18252);
        assert_eq!(PlayerRecord::offset(323).unwrap(), 0x18252 + 24 * 323);
        assert_eq!(
            PlayerRecord::offset(324).unwrap_err().code,
            CoreErrorCode::Range
        );
    }
}
