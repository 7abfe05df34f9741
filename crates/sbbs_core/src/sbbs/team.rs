use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::ByteRange;
use crate::rom::Rom;

use super::ability::FieldPosition;
use super::charmap;
use super::player::{PlayerRecord, Role};
use super::types::{
    FIELD_MAP_OFFSET, FIELD_POSITION_MASK, FIELDERS_PER_TEAM, JERSEY_NUMBER_MASK,
    MAX_JERSEY_NUMBER, MAX_TEAM_IDX, PITCHER_IDX_BASE, PITCHER_MAP_OFFSET, PITCHERS_PER_TEAM,
    TEAM_BASE, TEAM_NAME_LEN, TEAM_NAME_OFFSET, TEAM_RECORD_SIZE,
};

/// A roster slot: which position the player takes the field at, the jersey
/// number, and the player record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub position: FieldPosition,
    pub number: u8,
    pub player: PlayerRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitcherAssignment {
    pub number: u8,
    /// Flags sharing the assignment byte with the number. Kept as read.
    high_bits: u8,
    pub player: PlayerRecord,
}

impl PitcherAssignment {
    pub fn high_bits(&self) -> u8 {
        self.high_bits
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    index: usize,
    raw_name: [u8; TEAM_NAME_LEN],
    pub name: String,
    fielders: Vec<FieldAssignment>,
    pitchers: Vec<PitcherAssignment>,
}

pub fn team_offset(index: usize) -> Result<usize, CoreError> {
    if index > MAX_TEAM_IDX {
        return Err(CoreError::new(
            CoreErrorCode::Range,
            format!("team index {index} is bigger than max team index {MAX_TEAM_IDX}"),
        ));
    }
    Ok(TEAM_BASE + TEAM_RECORD_SIZE * index)
}

pub fn team_range(index: usize) -> Result<ByteRange, CoreError> {
    Ok(ByteRange::new(team_offset(index)?, TEAM_RECORD_SIZE))
}

pub fn fielder_index(team: usize, slot: usize) -> usize {
    team * FIELDERS_PER_TEAM + slot
}

pub fn pitcher_index(team: usize, slot: usize) -> usize {
    team * PITCHERS_PER_TEAM + PITCHER_IDX_BASE + slot
}

pub fn decode_field_assignment(byte: u8) -> Result<(FieldPosition, u8), CoreError> {
    let position = FieldPosition::from_raw(byte & FIELD_POSITION_MASK).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::Encoding,
            format!("unknown field position in assignment byte {byte:#04x}"),
        )
    })?;
    Ok((position, byte & JERSEY_NUMBER_MASK))
}

pub fn encode_field_assignment(position: FieldPosition, number: u8) -> Result<u8, CoreError> {
    check_jersey_number(number)?;
    Ok(position.raw() | number)
}

pub fn encode_pitcher_assignment(high_bits: u8, number: u8) -> Result<u8, CoreError> {
    check_jersey_number(number)?;
    Ok((high_bits & !JERSEY_NUMBER_MASK) | number)
}

fn check_jersey_number(number: u8) -> Result<(), CoreError> {
    if number > MAX_JERSEY_NUMBER {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!("jersey number {number} does not fit in a nibble (max {MAX_JERSEY_NUMBER})"),
        ));
    }
    Ok(())
}

impl Team {
    pub fn decode(rom: &Rom, index: usize) -> Result<Self, CoreError> {
        let offset = team_offset(index)?;
        let reader = rom.reader();

        let mut raw_name = [0u8; TEAM_NAME_LEN];
        raw_name.copy_from_slice(reader.read_bytes(offset + TEAM_NAME_OFFSET, TEAM_NAME_LEN)?);
        let name = charmap::decode(&raw_name);

        let field_map = reader.read_bytes(offset + FIELD_MAP_OFFSET, FIELDERS_PER_TEAM)?;
        let mut fielders = Vec::with_capacity(FIELDERS_PER_TEAM);
        for (slot, &byte) in field_map.iter().enumerate() {
            let (position, number) = decode_field_assignment(byte)
                .map_err(|e| e.context(format!("team {index} fielder slot {slot}")))?;
            let player = PlayerRecord::decode(rom, fielder_index(index, slot), Role::Fielder)?;
            fielders.push(FieldAssignment {
                position,
                number,
                player,
            });
        }

        let pitcher_map = reader.read_bytes(offset + PITCHER_MAP_OFFSET, PITCHERS_PER_TEAM)?;
        let mut pitchers = Vec::with_capacity(PITCHERS_PER_TEAM);
        for (slot, &byte) in pitcher_map.iter().enumerate() {
            let player = PlayerRecord::decode(rom, pitcher_index(index, slot), Role::Pitcher)?;
            pitchers.push(PitcherAssignment {
                number: byte & JERSEY_NUMBER_MASK,
                high_bits: byte & !JERSEY_NUMBER_MASK,
                player,
            });
        }

        tracing::debug!("decoded team {} \"{}\"", index, name.trim_end());

        Ok(Self {
            index,
            raw_name,
            name,
            fielders,
            pitchers,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn fielders(&self) -> &[FieldAssignment] {
        &self.fielders
    }

    pub fn fielders_mut(&mut self) -> &mut [FieldAssignment] {
        &mut self.fielders
    }

    pub fn pitchers(&self) -> &[PitcherAssignment] {
        &self.pitchers
    }

    pub fn pitchers_mut(&mut self) -> &mut [PitcherAssignment] {
        &mut self.pitchers
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.fielders
            .iter()
            .map(|f| &f.player)
            .chain(self.pitchers.iter().map(|p| &p.player))
    }

    /// Every write this team would make, as `(offset, bytes)` pairs. Encoding
    /// all of them up front is what lets [`Team::commit`] be all-or-nothing.
    pub fn encode(&self, rom: &Rom) -> Result<Vec<(usize, Vec<u8>)>, CoreError> {
        let offset = team_offset(self.index)?;
        let mut patches = Vec::with_capacity(3 + FIELDERS_PER_TEAM + PITCHERS_PER_TEAM);

        let name = charmap::encode_preserving(&self.name, &self.raw_name)
            .map_err(|e| e.context(format!("team {} name", self.index)))?;
        patches.push((offset + TEAM_NAME_OFFSET, name));

        let field_map = self
            .fielders
            .iter()
            .enumerate()
            .map(|(slot, f)| {
                encode_field_assignment(f.position, f.number)
                    .map_err(|e| e.context(format!("team {} fielder slot {slot}", self.index)))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        patches.push((offset + FIELD_MAP_OFFSET, field_map));

        let pitcher_map = self
            .pitchers
            .iter()
            .enumerate()
            .map(|(slot, p)| {
                encode_pitcher_assignment(p.high_bits, p.number)
                    .map_err(|e| e.context(format!("team {} pitcher slot {slot}", self.index)))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        patches.push((offset + PITCHER_MAP_OFFSET, pitcher_map));

        for player in self.players() {
            let (player_offset, data) = player.encode(rom)?;
            patches.push((player_offset, data.to_vec()));
        }

        Ok(patches)
    }

    pub fn commit(&self, rom: &mut Rom) -> Result<(), CoreError> {
        let patches = self.encode(rom)?;
        for (offset, bytes) in &patches {
            rom.write(*offset, bytes)?;
        }
        tracing::debug!(
            "committed team {} \"{}\" ({} writes)",
            self.index,
            self.name.trim_end(),
            patches.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_byte_splits_into_position_and_number() {
        assert_eq!(
            decode_field_assignment(0x23).unwrap(),
            (FieldPosition::Catcher, 3)
        );
        assert_eq!(
            decode_field_assignment(0x0C).unwrap(),
            (FieldPosition::PinchHitter, 12)
        );
        assert_eq!(
            decode_field_assignment(0x10).unwrap_err().code,
            CoreErrorCode::Encoding
        );
        assert_eq!(
            encode_field_assignment(FieldPosition::Catcher, 3).unwrap(),
            0x23
        );
        assert_eq!(
            encode_field_assignment(FieldPosition::RightField, 15).unwrap(),
            0x9F
        );
        assert!(encode_field_assignment(FieldPosition::Catcher, 16).is_err());
    }

    #[test]
    fn every_valid_assignment_byte_roundtrips() {
        let mut valid = 0;
        for byte in 0..=u8::MAX {
            match FieldPosition::from_raw(byte & 0xF0) {
                Some(position) => {
                    let decoded = decode_field_assignment(byte).unwrap();
                    assert_eq!(decoded, (position, byte & 0x0F));
                    assert_eq!(encode_field_assignment(decoded.0, decoded.1).unwrap(), byte);
                    valid += 1;
                }
                None => assert!(decode_field_assignment(byte).is_err(), "{byte:#04x}"),
            }
        }
        // nine position codes, sixteen numbers each
        assert_eq!(valid, 9 * 16);
    }

    #[test]
    fn pitcher_assignment_keeps_high_nibble() {
        assert_eq!(encode_pitcher_assignment(0xA0, 7).unwrap(), 0xA7);
        assert_eq!(encode_pitcher_assignment(0x00, 15).unwrap(), 0x0F);
        assert!(encode_pitcher_assignment(0x30, 16).is_err());
    }

    #[test]
    fn player_indices_follow_team_slot_order() {
        assert_eq!(fielder_index(0, 0), 0);
        assert_eq!(fielder_index(17, 11), 215);
        assert_eq!(pitcher_index(0, 0), 216);
        assert_eq!(pitcher_index(17, 5), 323);
    }

    #[test]
    fn team_offsets() {
        assert_eq!(team_offset(0).unwrap(), 0x18012);
        assert_eq!(team_offset(17).unwrap(), 0x18012 + 17 * 0x20);
        assert_eq!(team_offset(18).unwrap_err().code, CoreErrorCode::Range);
    }
}
