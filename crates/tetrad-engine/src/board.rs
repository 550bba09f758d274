//! The grid, its coordinates, and the zone classification of each cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Color;

/// The eight neighbor offsets, in the fixed order used by every scan
/// (capture walks and the win search).
pub(crate) const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// A cell coordinate: `r` is the row (0 = top), `c` the column (0 = left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub r: usize,
    pub c: usize,
}

impl Pos {
    pub const fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    /// King-move distance: the larger of the row and column gaps.
    pub fn chebyshev(self, other: Pos) -> usize {
        self.r.abs_diff(other.r).max(self.c.abs_diff(other.c))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

// ---------------------------------------------------------------------------
// BoardSize
// ---------------------------------------------------------------------------

/// A validated board side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "usize", try_from = "usize")]
pub struct BoardSize(usize);

impl BoardSize {
    /// Side lengths a room may be created with.
    pub const ALLOWED: [usize; 4] = [9, 11, 13, 15];

    /// Side length used when a request names no allowed size.
    pub const DEFAULT: BoardSize = BoardSize(13);

    /// Returns `Some` if `side` is one of [`Self::ALLOWED`].
    pub fn new(side: usize) -> Option<Self> {
        Self::ALLOWED.contains(&side).then_some(Self(side))
    }

    /// Resolves a client-requested size, falling back to
    /// [`Self::DEFAULT`] for anything missing or not allowed.
    pub fn from_requested(requested: Option<i64>) -> Self {
        requested
            .and_then(|side| usize::try_from(side).ok())
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = String;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        Self::new(side).ok_or_else(|| format!("unsupported board size {side}"))
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// Structural class of a cell, derived only from its position.
///
/// ```text
///   K B B B B B K      K = Corner
///   B P P P P P B      B = Border
///   B P I I I P B      P = Pre-border
///   B P I I I P B      I = Interior
///   B P P P P P B
///   K B B B B B K
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Interior,
    PreBorder,
    Border,
    Corner,
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

/// Capture eligibility of a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    /// Just placed; cannot be converted until its own color moves again.
    New,
    /// Eligible for conversion.
    Old,
}

/// The contents of an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pawn {
    pub color: Color,
    pub posture: Posture,
    /// The color this pawn had before its most recent conversion.
    pub prev_color: Option<Color>,
}

impl Pawn {
    /// A freshly placed, capture-immune pawn.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            posture: Posture::New,
            prev_color: None,
        }
    }

    /// A pawn that can already be captured.
    pub fn old(color: Color) -> Self {
        Self {
            posture: Posture::Old,
            ..Self::new(color)
        }
    }

    /// Overwrites the color, remembering the previous one. Posture is kept.
    pub(crate) fn convert_to(&mut self, color: Color) {
        self.prev_color = Some(self.color);
        self.color = color;
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A square grid of optional pawns.
///
/// Cells are addressed by [`Pos`]; a position outside the grid is never
/// occupied and never placeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    grid: Vec<Vec<Option<Pawn>>>,
}

impl Board {
    /// An empty board.
    pub fn new(size: BoardSize) -> Self {
        let side = size.get();
        Self {
            size,
            grid: vec![vec![None; side]; side],
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    pub fn board_size(&self) -> BoardSize {
        self.size
    }

    /// Converts signed (wire) coordinates to a position on this board.
    pub fn pos(&self, r: i64, c: i64) -> Option<Pos> {
        let r = usize::try_from(r).ok()?;
        let c = usize::try_from(c).ok()?;
        let pos = Pos::new(r, c);
        self.contains(pos).then_some(pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.r < self.size() && pos.c < self.size()
    }

    pub fn get(&self, pos: Pos) -> Option<&Pawn> {
        self.grid.get(pos.r)?.get(pos.c)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, pos: Pos) -> Option<&mut Pawn> {
        self.grid.get_mut(pos.r)?.get_mut(pos.c)?.as_mut()
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.get(pos).is_some()
    }

    /// Puts `pawn` at `pos` (or clears the cell with `None`).
    ///
    /// This bypasses every rule; it exists for setting up positions.
    /// Out-of-board positions are ignored.
    pub fn set(&mut self, pos: Pos, pawn: Option<Pawn>) {
        if let Some(cell) = self.grid.get_mut(pos.r).and_then(|row| row.get_mut(pos.c)) {
            *cell = pawn;
        }
    }

    /// Builder form of [`Self::set`] for an occupied cell.
    pub fn with(mut self, pos: Pos, pawn: Pawn) -> Self {
        self.set(pos, Some(pawn));
        self
    }

    /// Classifies a cell. Out-of-board positions have no meaningful zone;
    /// callers check [`Self::contains`] first.
    pub fn zone(&self, pos: Pos) -> Zone {
        let last = self.size() - 1;
        let edge_row = pos.r == 0 || pos.r == last;
        let edge_col = pos.c == 0 || pos.c == last;

        if edge_row && edge_col {
            Zone::Corner
        } else if edge_row || edge_col {
            Zone::Border
        } else if pos.r == 1 || pos.r == last - 1 || pos.c == 1 || pos.c == last - 1 {
            Zone::PreBorder
        } else {
            Zone::Interior
        }
    }

    /// The single diagonal neighbor of a corner, one step toward the center.
    pub fn corner_anchor(&self, corner: Pos) -> Pos {
        let last = self.size() - 1;
        let step = |x: usize| if x == 0 { 1 } else { last - 1 };
        Pos::new(step(corner.r), step(corner.c))
    }

    /// One step from `pos` along `dir`, if that stays on the board.
    pub(crate) fn step(&self, pos: Pos, (dr, dc): (isize, isize)) -> Option<Pos> {
        let r = pos.r.checked_add_signed(dr)?;
        let c = pos.c.checked_add_signed(dc)?;
        let next = Pos::new(r, c);
        self.contains(next).then_some(next)
    }

    /// The on-board 8-neighborhood of `pos`.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        DIRECTIONS.iter().filter_map(move |&dir| self.step(pos, dir))
    }

    /// Returns `true` if some occupied neighbor of `pos` lies in `zone`.
    pub fn has_occupied_neighbor_in(&self, pos: Pos, zone: Zone) -> bool {
        self.neighbors(pos)
            .any(|n| self.is_occupied(n) && self.zone(n) == zone)
    }

    /// Every position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let side = self.size();
        (0..side).flat_map(move |r| (0..side).map(move |c| Pos::new(r, c)))
    }

    /// Number of pawns currently showing `color`.
    pub fn count(&self, color: Color) -> usize {
        self.grid
            .iter()
            .flatten()
            .flatten()
            .filter(|pawn| pawn.color == color)
            .count()
    }

    /// Turns every NEW pawn of `color` OLD. Other colors are untouched.
    pub(crate) fn age_pawns_of(&mut self, color: Color) {
        for pawn in self.grid.iter_mut().flatten().flatten() {
            if pawn.color == color {
                pawn.posture = Posture::Old;
            }
        }
    }
}
