use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(rename = "R", alias = "r")]
    Right,
    #[serde(rename = "L", alias = "l")]
    Left,
}

impl Handedness {
    pub const LEFT_BIT: u8 = 0x01;

    pub fn from_flags(flags: u8) -> Self {
        if flags & Self::LEFT_BIT != 0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Set or clear the left-handed bit, leaving the other bits of `flags` alone.
    pub fn apply_to(&self, flags: u8) -> u8 {
        match *self {
            Self::Left => flags | Self::LEFT_BIT,
            Self::Right => flags & !Self::LEFT_BIT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Right => "R",
            Self::Left => "L",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
