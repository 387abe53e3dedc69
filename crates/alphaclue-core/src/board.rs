//! Tile storage addressed by `(clue, letter)`, with reading-order navigation.

use crate::Position;
use serde::{Deserialize, Serialize};

/// State of one letter cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    pub value: Option<char>,
    /// Locked by autocheck (or by completion)
    pub disabled: bool,
    /// Value arrived through propagation
    pub revealed: bool,
    pub correct: bool,
    pub incorrect: bool,
    pub highlighted: bool,
}

impl TileState {
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Reset to an empty, unflagged tile
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Two-level tile store: one row per clue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Vec<TileState>>,
}

impl Board {
    /// Empty tiles shaped after the answer lengths
    pub fn new(lengths: &[usize]) -> Self {
        Self {
            rows: lengths.iter().map(|&len| vec![TileState::default(); len]).collect(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<TileState>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<TileState>] {
        &self.rows
    }

    pub fn row_len(&self, clue: usize) -> usize {
        self.rows.get(clue).map_or(0, Vec::len)
    }

    pub fn clue_count(&self) -> usize {
        self.rows.len()
    }

    pub fn tile_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn get(&self, pos: Position) -> Option<&TileState> {
        self.rows.get(pos.clue)?.get(pos.letter)
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut TileState> {
        self.rows.get_mut(pos.clue)?.get_mut(pos.letter)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    pub fn value(&self, pos: Position) -> Option<char> {
        self.get(pos).and_then(|t| t.value)
    }

    /// All positions in reading order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(c, row)| (0..row.len()).map(move |l| Position::new(c, l)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &TileState)> {
        self.rows.iter().enumerate().flat_map(|(c, row)| {
            row.iter()
                .enumerate()
                .map(move |(l, tile)| (Position::new(c, l), tile))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Position, &mut TileState)> {
        self.rows.iter_mut().enumerate().flat_map(|(c, row)| {
            row.iter_mut()
                .enumerate()
                .map(move |(l, tile)| (Position::new(c, l), tile))
        })
    }

    /// Next tile in reading order; the last tile wraps to the first
    pub fn next_position(&self, pos: Position) -> Option<Position> {
        if !self.contains(pos) {
            return None;
        }
        if pos.letter + 1 < self.row_len(pos.clue) {
            return Some(Position::new(pos.clue, pos.letter + 1));
        }
        let mut clue = pos.clue;
        for _ in 0..self.rows.len() {
            clue = (clue + 1) % self.rows.len();
            if self.row_len(clue) > 0 {
                return Some(Position::new(clue, 0));
            }
        }
        None
    }

    /// Previous tile in reading order; the first tile wraps to the last
    pub fn previous_position(&self, pos: Position) -> Option<Position> {
        if !self.contains(pos) {
            return None;
        }
        if pos.letter > 0 {
            return Some(Position::new(pos.clue, pos.letter - 1));
        }
        let mut clue = pos.clue;
        for _ in 0..self.rows.len() {
            clue = (clue + self.rows.len() - 1) % self.rows.len();
            let len = self.row_len(clue);
            if len > 0 {
                return Some(Position::new(clue, len - 1));
            }
        }
        None
    }

    /// Same offset in the previous clue, clamped to its length
    pub fn position_above(&self, pos: Position) -> Option<Position> {
        if !self.contains(pos) {
            return None;
        }
        let count = self.rows.len();
        self.clamped_in((pos.clue + count - 1) % count, pos.letter)
    }

    /// Same offset in the next clue, clamped to its length
    pub fn position_below(&self, pos: Position) -> Option<Position> {
        if !self.contains(pos) {
            return None;
        }
        self.clamped_in((pos.clue + 1) % self.rows.len(), pos.letter)
    }

    fn clamped_in(&self, clue: usize, letter: usize) -> Option<Position> {
        let len = self.row_len(clue);
        if len == 0 {
            return None;
        }
        Some(Position::new(clue, letter.min(len - 1)))
    }

    pub fn clear_highlights(&mut self) {
        for row in &mut self.rows {
            for tile in row {
                tile.highlighted = false;
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|t| t.value.is_some())
    }
}
