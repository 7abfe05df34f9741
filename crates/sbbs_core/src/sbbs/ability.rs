use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum HitterAbility {
    Nothing = 0x00,
    HyperHit = 0x01,
    MissileHit = 0x02,
    TremorHit = 0x03,
    BombHit = 0x04,
    Shadowless = 0x05,
    Invisiball = 0x06,
    Meteor = 0x07,
    SquirrelHit = 0x08,
    SpinnerHit = 0x09,
    LeafHit = 0x0A,
    ShadowHit = 0x0B,
    HyperRun = 0x0C,
    FreakHit = 0x0D,
    DizzyBall = 0x0E,
    OrbitHit = 0x0F,
    // Accepted by the game but with no visible effect
    #[serde(rename = "INVAL_1")]
    Inval1 = 0x10,
    #[serde(rename = "INVAL_2")]
    Inval2 = 0x11,
    #[serde(rename = "INVAL_3")]
    Inval3 = 0x12,
    #[serde(rename = "INVAL_4")]
    Inval4 = 0x13,
    #[serde(rename = "INVAL_5")]
    Inval5 = 0x14,
}

impl HitterAbility {
    pub const ALL: [Self; 21] = [
        Self::Nothing,
        Self::HyperHit,
        Self::MissileHit,
        Self::TremorHit,
        Self::BombHit,
        Self::Shadowless,
        Self::Invisiball,
        Self::Meteor,
        Self::SquirrelHit,
        Self::SpinnerHit,
        Self::LeafHit,
        Self::ShadowHit,
        Self::HyperRun,
        Self::FreakHit,
        Self::DizzyBall,
        Self::OrbitHit,
        Self::Inval1,
        Self::Inval2,
        Self::Inval3,
        Self::Inval4,
        Self::Inval5,
    ];

    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    pub fn raw(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        HITTER_ABILITY_NAMES[usize::from(self.raw())]
    }
}

impl fmt::Display for HitterAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const HITTER_ABILITY_NAMES: [&str; 21] = [
    "NOTHING",
    "HYPER_HIT",
    "MISSILE_HIT",
    "TREMOR_HIT",
    "BOMB_HIT",
    "SHADOWLESS",
    "INVISIBALL",
    "METEOR",
    "SQUIRREL_HIT",
    "SPINNER_HIT",
    "LEAF_HIT",
    "SHADOW_HIT",
    "HYPER_RUN",
    "FREAK_HIT",
    "DIZZY_BALL",
    "ORBIT_HIT",
    "INVAL_1",
    "INVAL_2",
    "INVAL_3",
    "INVAL_4",
    "INVAL_5",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PitcherAbility {
    Nothing = 0x00,
    FireBall = 0x01,
    StopperBall = 0x02,
    PhantomBall = 0x03,
    SnakeBall = 0x04,
    NinjaBall = 0x05,
    SparkBall = 0x06,
    IronBall = 0x07,
    SpeederBall = 0x08,
    PhotonBall = 0x09,
    ZigZagBall = 0x0A,
    SpiralBall = 0x0B,
    JumperBall = 0x0C,
    TremorBall = 0x0D,
    ChangeUpBall = 0x0E,
    FloaterBall = 0x0F,
    MultiBall = 0x10,
    Fadeout = 0x11,
    WarpBall = 0x12,
    LottaBall = 0x13,
    QuestionmarkBall = 0x14,
}

impl PitcherAbility {
    pub const ALL: [Self; 21] = [
        Self::Nothing,
        Self::FireBall,
        Self::StopperBall,
        Self::PhantomBall,
        Self::SnakeBall,
        Self::NinjaBall,
        Self::SparkBall,
        Self::IronBall,
        Self::SpeederBall,
        Self::PhotonBall,
        Self::ZigZagBall,
        Self::SpiralBall,
        Self::JumperBall,
        Self::TremorBall,
        Self::ChangeUpBall,
        Self::FloaterBall,
        Self::MultiBall,
        Self::Fadeout,
        Self::WarpBall,
        Self::LottaBall,
        Self::QuestionmarkBall,
    ];

    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    pub fn raw(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        PITCHER_ABILITY_NAMES[usize::from(self.raw())]
    }
}

impl fmt::Display for PitcherAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PITCHER_ABILITY_NAMES: [&str; 21] = [
    "NOTHING",
    "FIRE_BALL",
    "STOPPER_BALL",
    "PHANTOM_BALL",
    "SNAKE_BALL",
    "NINJA_BALL",
    "SPARK_BALL",
    "IRON_BALL",
    "SPEEDER_BALL",
    "PHOTON_BALL",
    "ZIG_ZAG_BALL",
    "SPIRAL_BALL",
    "JUMPER_BALL",
    "TREMOR_BALL",
    "CHANGE_UP_BALL",
    "FLOATER_BALL",
    "MULTI_BALL",
    "FADEOUT",
    "WARP_BALL",
    "LOTTA_BALL",
    "QUESTIONMARK_BALL",
];

/// High nibble of a field assignment byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldPosition {
    PinchHitter,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
}

impl FieldPosition {
    pub const PINCH_HITTER_RAW: u8 = 0x00;
    pub const CATCHER_RAW: u8 = 0x20;
    pub const FIRST_BASE_RAW: u8 = 0x30;
    pub const SECOND_BASE_RAW: u8 = 0x40;
    pub const THIRD_BASE_RAW: u8 = 0x50;
    pub const SHORT_STOP_RAW: u8 = 0x60;
    pub const LEFT_FIELD_RAW: u8 = 0x70;
    pub const CENTER_FIELD_RAW: u8 = 0x80;
    pub const RIGHT_FIELD_RAW: u8 = 0x90;

    /// `raw` is the masked high nibble, e.g. `0x20` for catcher.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            Self::PINCH_HITTER_RAW => Some(Self::PinchHitter),
            Self::CATCHER_RAW => Some(Self::Catcher),
            Self::FIRST_BASE_RAW => Some(Self::FirstBase),
            Self::SECOND_BASE_RAW => Some(Self::SecondBase),
            Self::THIRD_BASE_RAW => Some(Self::ThirdBase),
            Self::SHORT_STOP_RAW => Some(Self::ShortStop),
            Self::LEFT_FIELD_RAW => Some(Self::LeftField),
            Self::CENTER_FIELD_RAW => Some(Self::CenterField),
            Self::RIGHT_FIELD_RAW => Some(Self::RightField),
            _ => None,
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::PinchHitter => Self::PINCH_HITTER_RAW,
            Self::Catcher => Self::CATCHER_RAW,
            Self::FirstBase => Self::FIRST_BASE_RAW,
            Self::SecondBase => Self::SECOND_BASE_RAW,
            Self::ThirdBase => Self::THIRD_BASE_RAW,
            Self::ShortStop => Self::SHORT_STOP_RAW,
            Self::LeftField => Self::LEFT_FIELD_RAW,
            Self::CenterField => Self::CENTER_FIELD_RAW,
            Self::RightField => Self::RIGHT_FIELD_RAW,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::PinchHitter => "PINCH_HITTER",
            Self::Catcher => "CATCHER",
            Self::FirstBase => "FIRST_BASE",
            Self::SecondBase => "SECOND_BASE",
            Self::ThirdBase => "THIRD_BASE",
            Self::ShortStop => "SHORT_STOP",
            Self::LeftField => "LEFT_FIELD",
            Self::CenterField => "CENTER_FIELD",
            Self::RightField => "RIGHT_FIELD",
        }
    }

    /// Scorebook abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        match *self {
            Self::PinchHitter => "PH",
            Self::Catcher => "C",
            Self::FirstBase => "1B",
            Self::SecondBase => "2B",
            Self::ThirdBase => "3B",
            Self::ShortStop => "SS",
            Self::LeftField => "LF",
            Self::CenterField => "CF",
            Self::RightField => "RF",
        }
    }
}

impl fmt::Display for FieldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
