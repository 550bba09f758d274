//! Colors, teams, and match outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four pawn colors.
///
/// Turns cycle through the colors in declaration order: A → B → C → D → A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    A,
    B,
    C,
    D,
}

impl Color {
    /// The fixed cyclic turn order.
    pub const TURN_ORDER: [Color; 4] = [Color::A, Color::B, Color::C, Color::D];

    /// Returns the color that moves at `turn_index` (taken modulo 4).
    pub fn from_turn_index(turn_index: usize) -> Self {
        Self::TURN_ORDER[turn_index % Self::TURN_ORDER.len()]
    }

    /// Returns the team that controls this color.
    pub fn team(self) -> Team {
        match self {
            Self::A | Self::C => Team::AC,
            Self::B | Self::D => Team::BD,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(s)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(format!("unknown color {other:?}")),
        }
    }
}

/// A pair of colors controlled by one player slot.
///
/// Slot 0 (the room creator) plays [`Team::AC`], slot 1 plays [`Team::BD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    AC,
    BD,
}

impl Team {
    /// Index of the player slot that controls this team.
    pub fn slot(self) -> usize {
        match self {
            Self::AC => 0,
            Self::BD => 1,
        }
    }

    /// The team controlled by player slot `slot`, if the slot exists.
    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Self::AC),
            1 => Some(Self::BD),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AC => f.write_str("AC"),
            Self::BD => f.write_str("BD"),
        }
    }
}

/// The decided outcome of a match.
///
/// Serialized as a bare string: `"A"`..`"D"` for a winning color, or
/// `"Draw"` when the color to move had no legal placement left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Winner {
    Color(Color),
    Draw,
}

impl Winner {
    /// The winning color, or `None` for a draw.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(color),
            Self::Draw => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => write!(f, "{color}"),
            Self::Draw => f.write_str("Draw"),
        }
    }
}

impl FromStr for Winner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Draw" {
            return Ok(Self::Draw);
        }
        s.parse().map(Self::Color)
    }
}

impl From<Winner> for String {
    fn from(winner: Winner) -> Self {
        winner.to_string()
    }
}

impl TryFrom<String> for Winner {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
