// Typed atoms of the play notation: fielding positions, bases, advances.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fielding positions, numbered the way scorers number them (1 = pitcher
/// through 9 = right field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldPosition {
    Pitcher,
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
    /// All nine positions in scorer order. This is also the order of the
    /// defensive slots in a roster layout.
    pub const ALL: [FieldPosition; 9] = [
        FieldPosition::Pitcher,
        FieldPosition::Catcher,
        FieldPosition::FirstBase,
        FieldPosition::SecondBase,
        FieldPosition::ThirdBase,
        FieldPosition::ShortStop,
        FieldPosition::LeftField,
        FieldPosition::CenterField,
        FieldPosition::RightField,
    ];

    /// Parse a scorer digit (`'1'..='9'`). Anything else is not a fielder.
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            '1' => Some(FieldPosition::Pitcher),
            '2' => Some(FieldPosition::Catcher),
            '3' => Some(FieldPosition::FirstBase),
            '4' => Some(FieldPosition::SecondBase),
            '5' => Some(FieldPosition::ThirdBase),
            '6' => Some(FieldPosition::ShortStop),
            '7' => Some(FieldPosition::LeftField),
            '8' => Some(FieldPosition::CenterField),
            '9' => Some(FieldPosition::RightField),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            FieldPosition::Pitcher => '1',
            FieldPosition::Catcher => '2',
            FieldPosition::FirstBase => '3',
            FieldPosition::SecondBase => '4',
            FieldPosition::ThirdBase => '5',
            FieldPosition::ShortStop => '6',
            FieldPosition::LeftField => '7',
            FieldPosition::CenterField => '8',
            FieldPosition::RightField => '9',
        }
    }

    /// Zero-based index into a nine-slot defense.
    pub fn index(&self) -> usize {
        match self {
            FieldPosition::Pitcher => 0,
            FieldPosition::Catcher => 1,
            FieldPosition::FirstBase => 2,
            FieldPosition::SecondBase => 3,
            FieldPosition::ThirdBase => 4,
            FieldPosition::ShortStop => 5,
            FieldPosition::LeftField => 6,
            FieldPosition::CenterField => 7,
            FieldPosition::RightField => 8,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            FieldPosition::Pitcher => "P",
            FieldPosition::Catcher => "C",
            FieldPosition::FirstBase => "1B",
            FieldPosition::SecondBase => "2B",
            FieldPosition::ThirdBase => "3B",
            FieldPosition::ShortStop => "SS",
            FieldPosition::LeftField => "LF",
            FieldPosition::CenterField => "CF",
            FieldPosition::RightField => "RF",
        }
    }
}

impl fmt::Display for FieldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A base, with the batter's box as the starting point. Home is written `H`
/// or `4` in the notation and the batter `B` or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    Batter,
    First,
    Second,
    Third,
    Home,
}

impl Base {
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'B' | '0' => Some(Base::Batter),
            '1' => Some(Base::First),
            '2' => Some(Base::Second),
            '3' => Some(Base::Third),
            'H' | '4' => Some(Base::Home),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Base::Batter => 'B',
            Base::First => '1',
            Base::Second => '2',
            Base::Third => '3',
            Base::Home => 'H',
        }
    }

    /// The base a runner must have started from to reach this one on a
    /// steal or caught-stealing attempt.
    pub fn previous(&self) -> Option<Base> {
        match self {
            Base::Batter => None,
            Base::First => Some(Base::Batter),
            Base::Second => Some(Base::First),
            Base::Third => Some(Base::Second),
            Base::Home => Some(Base::Third),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A plain base-to-base advance such as `1-3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Advance {
    pub from: Base,
    pub to: Base,
}

impl Advance {
    pub const fn new(from: Base, to: Base) -> Self {
        Advance { from, to }
    }
}

impl fmt::Display for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
