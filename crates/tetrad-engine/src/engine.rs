//! One match: turn sequencing, placement legality, pincer capture, and
//! edge-to-edge win detection.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::DIRECTIONS;
use crate::{Board, BoardSize, Color, EngineError, Pawn, Pos, Posture, Winner, Zone};

/// Placements granted to every turn after the first.
const PLACEMENTS_PER_TURN: u8 = 2;

/// The opening turn of a match places a single pawn.
const OPENING_PLACEMENTS: u8 = 1;

/// Minimum Chebyshev distance between the two pawns of one turn.
const MIN_PAIR_DISTANCE: usize = 3;

/// The outcome of an accepted placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Where the pawn went.
    pub pos: Pos,
    /// The color that placed it.
    pub color: Color,
    /// Cells converted to `color` by this placement.
    pub converted: Vec<Pos>,
    /// `true` if this placement handed the turn to the next color.
    pub turn_ended: bool,
    /// Set when this placement decided the match (a win, or a draw
    /// because the next color had nowhere to play).
    pub decided: Option<Winner>,
}

/// A single match of Tetrad.
///
/// All turn state (`turn_index`, `placements_left`, `first_pawn_loc`) is
/// private and only moves through [`GameEngine::place_pawn`]. Once
/// `winner` is set the engine is frozen: every further placement is
/// rejected.
///
/// The serialized form is the full snapshot sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEngine {
    #[serde(flatten)]
    board: Board,
    turn_index: usize,
    placements_left: u8,
    first_pawn_loc: Option<Pos>,
    winner: Option<Winner>,
    /// Present exactly when `winner` is a color.
    winning_path: Option<Vec<Pos>>,
    /// Cells converted by the most recent accepted placement.
    last_converted: Vec<Pos>,
}

impl GameEngine {
    /// A fresh match: empty board, color A to move with one placement.
    pub fn new(size: BoardSize) -> Self {
        Self {
            board: Board::new(size),
            turn_index: 0,
            placements_left: OPENING_PLACEMENTS,
            first_pawn_loc: None,
            winner: None,
            winning_path: None,
            last_converted: Vec::new(),
        }
    }

    /// Resumes play from an arbitrary position with `to_move` starting a
    /// full two-placement turn.
    pub fn from_position(board: Board, to_move: Color) -> Self {
        let turn_index = Color::TURN_ORDER
            .iter()
            .position(|&c| c == to_move)
            .unwrap_or_default();
        Self {
            board,
            turn_index,
            placements_left: PLACEMENTS_PER_TURN,
            first_pawn_loc: None,
            winner: None,
            winning_path: None,
            last_converted: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> BoardSize {
        self.board.board_size()
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// The color whose turn it is.
    pub fn current_color(&self) -> Color {
        Color::from_turn_index(self.turn_index)
    }

    pub fn placements_left(&self) -> u8 {
        self.placements_left
    }

    /// The first pawn placed this turn, while a second one is pending.
    pub fn first_pawn_loc(&self) -> Option<Pos> {
        self.first_pawn_loc
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// The chain that won the match, from its starting edge to the
    /// opposite edge.
    pub fn winning_path(&self) -> Option<&[Pos]> {
        self.winning_path.as_deref()
    }

    pub fn last_converted(&self) -> &[Pos] {
        &self.last_converted
    }

    // -----------------------------------------------------------------------
    // Legality
    // -----------------------------------------------------------------------

    /// Returns `true` if the color to move may place a pawn at `pos` now.
    pub fn is_valid_placement(&self, pos: Pos) -> bool {
        if self.winner.is_some() || !self.board.contains(pos) || self.board.is_occupied(pos) {
            return false;
        }
        if let Some(first) = self.first_pawn_loc {
            if first.chebyshev(pos) < MIN_PAIR_DISTANCE {
                return false;
            }
        }

        match self.board.zone(pos) {
            Zone::Interior => true,
            Zone::PreBorder => self.board.has_occupied_neighbor_in(pos, Zone::Interior),
            Zone::Border => self.board.has_occupied_neighbor_in(pos, Zone::PreBorder),
            Zone::Corner => self.board.is_occupied(self.board.corner_anchor(pos)),
        }
    }

    /// Returns `true` if any cell is currently placeable.
    pub fn has_legal_placement(&self) -> bool {
        self.board.positions().any(|pos| self.is_valid_placement(pos))
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Places a pawn for the color to move, using signed coordinates as
    /// they arrive from clients.
    pub fn place_at(&mut self, r: i64, c: i64) -> Result<Placement, EngineError> {
        let pos = self
            .board
            .pos(r, c)
            .ok_or(EngineError::OutOfBounds { r, c })?;
        self.place_pawn(pos)
    }

    /// Places a NEW pawn of the color to move at `pos`.
    ///
    /// On success the pawn converts any pincered lines, the win condition
    /// is checked, and the turn advances when its placements are used up
    /// (or when the second placement has nowhere legal to go).
    ///
    /// # Errors
    /// [`EngineError::InvalidMove`] if [`Self::is_valid_placement`] is
    /// false; nothing changes in that case.
    pub fn place_pawn(&mut self, pos: Pos) -> Result<Placement, EngineError> {
        if !self.is_valid_placement(pos) {
            return Err(EngineError::InvalidMove(pos));
        }

        self.last_converted.clear();
        let color = self.current_color();
        self.board.set(pos, Some(Pawn::new(color)));
        let converted = self.convert_from(pos, color);
        self.last_converted.clone_from(&converted);

        let mut placement = Placement {
            pos,
            color,
            converted,
            turn_ended: false,
            decided: None,
        };

        if let Some(path) = self.winning_path_for(color) {
            self.winner = Some(Winner::Color(color));
            self.winning_path = Some(path);
            placement.decided = self.winner;
            return Ok(placement);
        }

        self.placements_left = self.placements_left.saturating_sub(1);
        if self.placements_left == 0 {
            self.end_turn();
            placement.turn_ended = true;
        } else {
            self.first_pawn_loc = Some(pos);
            if !self.has_legal_placement() {
                self.end_turn();
                placement.turn_ended = true;
            }
        }

        placement.decided = self.winner;
        Ok(placement)
    }

    /// Walks every direction from `origin` and converts lines of a single
    /// OLD enemy color that end on a pawn of `color`.
    fn convert_from(&mut self, origin: Pos, color: Color) -> Vec<Pos> {
        let mut converted = Vec::new();

        for dir in DIRECTIONS {
            let mut line = Vec::new();
            let mut line_color = None;
            let mut pincered = false;
            let mut cursor = self.board.step(origin, dir);

            while let Some(pos) = cursor {
                let Some(pawn) = self.board.get(pos) else {
                    break;
                };
                if pawn.color == color {
                    pincered = true;
                    break;
                }
                if pawn.posture == Posture::New {
                    break;
                }
                match line_color {
                    None => line_color = Some(pawn.color),
                    Some(first) if first != pawn.color => break,
                    Some(_) => {}
                }
                line.push(pos);
                cursor = self.board.step(pos, dir);
            }

            if pincered && !line.is_empty() {
                for pos in line {
                    if let Some(pawn) = self.board.get_mut(pos) {
                        pawn.convert_to(color);
                    }
                    converted.push(pos);
                }
            }
        }

        converted
    }

    /// Hands the turn to the next color and ages that color's pawns.
    /// A color with no legal placement at the start of its turn ends the
    /// match in a draw.
    fn end_turn(&mut self) {
        self.turn_index = (self.turn_index + 1) % Color::TURN_ORDER.len();
        let next = self.current_color();
        self.board.age_pawns_of(next);
        self.placements_left = PLACEMENTS_PER_TURN;
        self.first_pawn_loc = None;

        if !self.has_legal_placement() {
            self.winner = Some(Winner::Draw);
        }
    }

    // -----------------------------------------------------------------------
    // Win detection
    // -----------------------------------------------------------------------

    /// Returns `true` if `color` links top to bottom or left to right.
    pub fn check_win(&self, color: Color) -> bool {
        self.winning_path_for(color).is_some()
    }

    /// Finds a corner-free chain of `color` between opposite edges.
    ///
    /// Top→bottom is tried before left→right. Within one axis the search
    /// is breadth-first from every qualifying edge cell at once, so the
    /// returned chain is a shortest one; which shortest chain depends on
    /// the neighbor scan order. The chain runs from the far edge back to
    /// the starting edge.
    pub fn winning_path_for(&self, color: Color) -> Option<Vec<Pos>> {
        let side = self.board.size();
        let last = side - 1;
        let owned = |pos: &Pos| self.board.get(*pos).is_some_and(|p| p.color == color);

        let top: Vec<Pos> = (1..last).map(|c| Pos::new(0, c)).filter(owned).collect();
        if let Some(path) = self.trace_chain(&top, color, |pos| pos.r == last) {
            return Some(path);
        }

        let left: Vec<Pos> = (1..last).map(|r| Pos::new(r, 0)).filter(owned).collect();
        self.trace_chain(&left, color, |pos| pos.c == last)
    }

    fn trace_chain(
        &self,
        starts: &[Pos],
        color: Color,
        reached: impl Fn(Pos) -> bool,
    ) -> Option<Vec<Pos>> {
        let side = self.board.size();
        let index = move |pos: Pos| pos.r * side + pos.c;

        let mut visited = vec![false; side * side];
        let mut parent: Vec<Option<Pos>> = vec![None; side * side];
        let mut queue = VecDeque::with_capacity(starts.len());

        for &start in starts {
            visited[index(start)] = true;
            queue.push_back(start);
        }

        while let Some(current) = queue.pop_front() {
            if reached(current) {
                let mut path = vec![current];
                let mut at = current;
                while let Some(prev) = parent[index(at)] {
                    path.push(prev);
                    at = prev;
                }
                return Some(path);
            }

            for dir in DIRECTIONS {
                let Some(next) = self.board.step(current, dir) else {
                    continue;
                };
                if visited[index(next)] || self.board.zone(next) == Zone::Corner {
                    continue;
                }
                if self.board.get(next).is_some_and(|p| p.color == color) {
                    visited[index(next)] = true;
                    parent[index(next)] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}
