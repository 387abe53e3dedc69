//! Tile engine: input, deletion, navigation and propagation along reveal links.
//!
//! Every operation takes the [`GameSession`] it acts on. Positions outside the
//! board are ignored; navigation at the edges wraps.

use crate::{letters_match, normalize_letter, GameSession, Position};

/// Non-letter keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
}

/// Stateless rules over a [`GameSession`]
pub struct TileEngine;

impl TileEngine {
    /// Reduce an input buffer to one uppercase letter.
    ///
    /// Whitespace is dropped. When the buffer still holds more than one
    /// character, the tile's previous letter is removed first and the most
    /// recent character wins.
    pub fn normalize_input(raw: &str, previous: Option<char>) -> Option<char> {
        let mut chars: Vec<char> = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(normalize_letter)
            .collect();
        if chars.len() > 1 {
            if let Some(prev) = previous.map(normalize_letter) {
                if let Some(i) = chars.iter().position(|&c| c == prev) {
                    chars.remove(i);
                }
            }
        }
        chars.last().copied()
    }

    /// Handle an input event at `pos`. Returns the tile that should take focus.
    pub fn input(session: &mut GameSession, pos: Position, raw: &str) -> Option<Position> {
        if session.is_completed() {
            return None;
        }
        let tile = session.board().get(pos)?;
        if tile.disabled {
            return None;
        }

        match Self::normalize_input(raw, tile.value) {
            None => {
                Self::clear_tile(session, pos);
                None
            }
            Some(letter) => {
                Self::write(session, pos, letter, false);
                Self::propagate(session, pos, letter);
                Some(Self::focus_next(session, pos))
            }
        }
    }

    /// Copy `value` into the target linked from `pos`, marking it revealed.
    ///
    /// The target is checked against its own answer. A locked target is left alone.
    pub fn propagate(session: &mut GameSession, pos: Position, value: char) -> Option<Position> {
        let target = session.mapping().target_of(pos)?;
        if target == pos || Self::is_locked(session, target) {
            return None;
        }
        Self::write(session, target, value, true).then_some(target)
    }

    /// Clear `pos` and, unless either end is locked, its linked target.
    ///
    /// Returns false for an empty or unknown tile, which is left untouched.
    pub fn clear_tile(session: &mut GameSession, pos: Position) -> bool {
        let source_locked = match session.board().get(pos) {
            Some(tile) if !tile.is_empty() => tile.disabled,
            _ => return false,
        };
        Self::reset(session, pos);

        if !source_locked {
            if let Some(target) = session.mapping().target_of(pos) {
                if target != pos && !Self::is_locked(session, target) {
                    Self::reset(session, target);
                }
            }
        }
        true
    }

    /// Handle a navigation or deletion key. Returns the tile that should take focus.
    pub fn key(session: &mut GameSession, pos: Position, key: Key) -> Option<Position> {
        if !session.board().contains(pos) {
            return None;
        }
        match key {
            Key::Backspace => Self::backspace(session, pos),
            Key::Delete => Self::delete(session, pos),
            Key::Left => Some(Self::step(session, pos, false)),
            Key::Right => Some(Self::step(session, pos, true)),
            Key::Up => session.board().position_above(pos),
            Key::Down => session.board().position_below(pos),
        }
    }

    /// Highlight `pos` and its linked target, clearing any other highlight
    pub fn focus(session: &mut GameSession, pos: Position) {
        if !session.board().contains(pos) {
            return;
        }
        let target = session.mapping().target_of(pos);
        let board = session.board_mut();
        board.clear_highlights();
        for p in std::iter::once(pos).chain(target) {
            if let Some(tile) = board.get_mut(p) {
                tile.highlighted = true;
            }
        }
    }

    pub fn blur(session: &mut GameSession, pos: Position) {
        let target = session.mapping().target_of(pos);
        let board = session.board_mut();
        for p in std::iter::once(pos).chain(target) {
            if let Some(tile) = board.get_mut(p) {
                tile.highlighted = false;
            }
        }
    }

    /// Turn live checking on or off.
    ///
    /// On: highlights are cleared and every filled tile is re-checked.
    /// Off: every tile is unlocked and unflagged; values are kept.
    pub fn set_autocheck(session: &mut GameSession, on: bool) {
        if session.autocheck() == on {
            return;
        }
        session.set_autocheck_flag(on);
        if session.is_completed() {
            return;
        }
        if on {
            session.board_mut().clear_highlights();
            Self::check_all(session);
        } else {
            for (_, tile) in session.board_mut().iter_mut() {
                tile.disabled = false;
                tile.incorrect = false;
                tile.correct = false;
            }
        }
    }

    /// Re-check every filled tile in reading order, re-propagating its letter
    pub fn check_all(session: &mut GameSession) {
        let positions: Vec<Position> = session.board().positions().collect();
        for pos in positions {
            if let Some(value) = session.board().value(pos) {
                Self::refresh_flags(session, pos);
                Self::propagate(session, pos, value);
            }
        }
    }

    /// Next tile to fill after typing at `pos`.
    ///
    /// Looks ahead within the clue (wrapping to its start) unless `pos` is the
    /// clue's last tile, then through the following clues. Stays put when
    /// nothing is left to fill.
    pub fn focus_next(session: &GameSession, pos: Position) -> Position {
        let board = session.board();
        let wants_focus = |p: Position| {
            board
                .get(p)
                .is_some_and(|t| t.is_empty() || (session.autocheck() && t.incorrect))
        };

        let len = board.row_len(pos.clue);
        if pos.letter + 1 < len {
            let within = (pos.letter + 1..len).chain(0..pos.letter);
            if let Some(p) = within
                .map(|l| Position::new(pos.clue, l))
                .find(|&p| wants_focus(p))
            {
                return p;
            }
        }

        let count = board.clue_count();
        for offset in 1..=count {
            let clue = (pos.clue + offset) % count;
            if let Some(p) = (0..board.row_len(clue))
                .map(|l| Position::new(clue, l))
                .find(|&p| wants_focus(p))
            {
                return p;
            }
        }
        pos
    }

    fn backspace(session: &mut GameSession, pos: Position) -> Option<Position> {
        if session.is_completed() {
            return None;
        }
        let tile = session.board().get(pos)?;
        if !tile.is_empty() && !tile.disabled {
            Self::clear_tile(session, pos);
            return Some(pos);
        }

        if !session.autocheck() {
            let previous = session.board().previous_position(pos)?;
            Self::clear_tile(session, previous);
            return Some(previous);
        }

        // Walk back over confirmed letters to the first clearable tile
        let mut current = pos;
        for _ in 0..session.board().tile_count() {
            current = session.board().previous_position(current)?;
            if current == pos {
                break;
            }
            let locked = Self::is_locked(session, current);
            if locked || session.is_correct(current) {
                continue;
            }
            Self::clear_tile(session, current);
            return Some(current);
        }
        Some(pos)
    }

    /// Explicit clear. This is the only way to empty a locked tile while autocheck is on.
    fn delete(session: &mut GameSession, pos: Position) -> Option<Position> {
        if session.is_completed() {
            return None;
        }
        let board = session.board();
        if board.get(pos).is_some_and(|t| !t.is_empty()) {
            let next = board.next_position(pos);
            Self::clear_tile(session, pos);
            return next;
        }

        let previous = board.previous_position(pos)?;
        Self::clear_tile(session, previous);
        Some(previous)
    }

    /// Left/Right in reading order. Under autocheck correct tiles are skipped.
    fn step(session: &GameSession, pos: Position, forward: bool) -> Position {
        let board = session.board();
        let mut current = pos;
        for _ in 0..board.tile_count() {
            let next = if forward {
                board.next_position(current)
            } else {
                board.previous_position(current)
            };
            current = match next {
                Some(p) if p != pos => p,
                _ => return pos,
            };
            if !(session.autocheck() && session.is_correct(current)) {
                return current;
            }
        }
        pos
    }

    fn is_locked(session: &GameSession, pos: Position) -> bool {
        session.board().get(pos).is_some_and(|t| t.disabled)
    }

    /// Store `letter` at `pos` and recompute its flags
    fn write(session: &mut GameSession, pos: Position, letter: char, revealed: bool) -> bool {
        match session.board_mut().get_mut(pos) {
            Some(tile) => {
                tile.value = Some(normalize_letter(letter));
                tile.revealed = revealed;
            }
            None => return false,
        }
        Self::refresh_flags(session, pos);
        true
    }

    fn refresh_flags(session: &mut GameSession, pos: Position) {
        let autocheck = session.autocheck();
        let answer = session.answer_letter(pos);
        let Some(tile) = session.board_mut().get_mut(pos) else {
            return;
        };
        let matches = match (tile.value, answer) {
            (Some(value), Some(answer)) => Some(letters_match(value, answer)),
            _ => None,
        };
        match matches {
            Some(ok) if autocheck => {
                tile.correct = ok;
                tile.incorrect = !ok;
                tile.disabled = ok;
            }
            _ => {
                tile.correct = false;
                tile.incorrect = false;
            }
        }
    }

    /// Empty a tile, keeping only its highlight
    fn reset(session: &mut GameSession, pos: Position) {
        if let Some(tile) = session.board_mut().get_mut(pos) {
            let highlighted = tile.highlighted;
            tile.clear();
            tile.highlighted = highlighted;
        }
    }
}
