use serde::{Deserialize, Serialize};

use crate::handedness::Handedness;
use crate::sbbs::ability::{FieldPosition, HitterAbility, PitcherAbility};

/// One team in its interchange form. Field names and order are the on-disk
/// JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamExport {
    pub name: String,
    pub fielders: Vec<FielderAssignmentExport>,
    pub pitchers: Vec<PitcherAssignmentExport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FielderAssignmentExport {
    pub field_position: FieldPosition,
    pub number: u8,
    pub player: FielderExport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FielderExport {
    pub name: String,
    pub handedness: Handedness,
    pub st: u8,
    pub av: u16,
    pub hr: u8,
    pub r: u8,
    pub f: u8,
    pub yeet: u8,
    pub pwr: HitterAbility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitcherAssignmentExport {
    pub number: u8,
    pub player: PitcherExport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitcherExport {
    pub name: String,
    pub era: u16,
    pub spd: u8,
    pub r: u8,
    pub l: u8,
    pub f: u8,
    pub st: u8,
    /// Up to four pitches; missing slots are `NOTHING`.
    pub pwr: Vec<PitcherAbility>,
}
