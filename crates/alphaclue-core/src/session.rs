//! One day's play: the puzzle, the active level and every tile's state.

use crate::completion::{evaluate, CompletionStatus, Evaluation};
use crate::{
    letters_match, Board, Clue, ClueKind, DayKey, Difficulty, Position, Puzzle, RevealMapping,
    Stopwatch,
};
use serde::Serialize;

/// Options used when a day has no saved progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub difficulty: Difficulty,
    pub autocheck: bool,
}

/// Render tuple for one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub clue_index: usize,
    pub letter_index: usize,
    pub value: Option<char>,
    pub disabled: bool,
    pub correct: bool,
    pub incorrect: bool,
    pub revealed: bool,
    pub highlighted: bool,
    /// Badge shared by the tile's linkage group at the active level
    pub group_index: Option<u32>,
}

impl TileView {
    pub fn position(&self) -> Position {
        Position::new(self.clue_index, self.letter_index)
    }
}

/// Render data for one clue row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueView {
    pub index: usize,
    pub kind: ClueKind,
    pub letter: char,
    pub heading: String,
    pub clue: String,
    pub tiles: Vec<TileView>,
}

/// Explicit game state, passed to every engine operation
#[derive(Debug, Clone)]
pub struct GameSession {
    day: DayKey,
    difficulty: Difficulty,
    autocheck: bool,
    puzzle: Puzzle,
    board: Board,
    stopwatch: Stopwatch,
    completed: bool,
    completion_time_ms: Option<u64>,
}

impl GameSession {
    /// Fresh session with empty tiles and a stopped clock
    pub fn new(day: DayKey, puzzle: Puzzle, options: SessionOptions) -> Self {
        let board = Board::new(&puzzle.clue_lengths());
        Self {
            day,
            difficulty: options.difficulty,
            autocheck: options.autocheck,
            puzzle,
            board,
            stopwatch: Stopwatch::default(),
            completed: false,
            completion_time_ms: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        day: DayKey,
        difficulty: Difficulty,
        autocheck: bool,
        puzzle: Puzzle,
        board: Board,
        elapsed_ms: u64,
        completed: bool,
        completion_time_ms: Option<u64>,
    ) -> Self {
        Self {
            day,
            difficulty,
            autocheck,
            puzzle,
            board,
            stopwatch: Stopwatch::with_elapsed(elapsed_ms),
            completed,
            completion_time_ms,
        }
    }

    pub fn day(&self) -> DayKey {
        self.day
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn autocheck(&self) -> bool {
        self.autocheck
    }

    pub(crate) fn set_autocheck_flag(&mut self, on: bool) {
        self.autocheck = on;
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn clues(&self) -> &[Clue] {
        self.puzzle.clues()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn stopwatch_mut(&mut self) -> &mut Stopwatch {
        &mut self.stopwatch
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completion_time_ms(&self) -> Option<u64> {
        self.completion_time_ms
    }

    /// Mapping for the active level
    pub fn mapping(&self) -> &RevealMapping {
        self.puzzle.mapping(self.difficulty)
    }

    pub fn answer_letter(&self, pos: Position) -> Option<char> {
        self.puzzle.answer_letter(pos)
    }

    /// Tile holds its answer letter
    pub fn is_correct(&self, pos: Position) -> bool {
        match (self.board.value(pos), self.answer_letter(pos)) {
            (Some(value), Some(answer)) => letters_match(value, answer),
            _ => false,
        }
    }

    /// Switch level: new mapping, empty tiles, completion cleared. Elapsed time is kept.
    ///
    /// Returns false when `difficulty` is already active.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.reset_tiles();
        true
    }

    /// Empty every tile and clear completion
    pub fn reset_tiles(&mut self) {
        self.board = Board::new(&self.puzzle.clue_lengths());
        self.completed = false;
        self.completion_time_ms = None;
    }

    pub fn evaluate(&self) -> Evaluation {
        evaluate(self.puzzle.clues(), &self.board)
    }

    /// Evaluate and, on a solve, stop the clock, lock every tile and record the time
    pub fn check_completion(&mut self, now_ms: u64) -> CompletionStatus {
        if self.completed {
            return CompletionStatus::Solved;
        }
        let status = self.evaluate().status();
        if status.is_solved() {
            self.stopwatch.stop(now_ms);
            let time = self.stopwatch.elapsed_ms(now_ms);
            for (_, tile) in self.board.iter_mut() {
                tile.disabled = true;
                tile.highlighted = false;
            }
            self.completed = true;
            self.completion_time_ms = Some(time);
            log::info!("puzzle {} solved in {} ms", self.day, time);
        }
        status
    }

    pub fn tile_view(&self, pos: Position) -> Option<TileView> {
        let tile = self.board.get(pos)?;
        Some(TileView {
            clue_index: pos.clue,
            letter_index: pos.letter,
            value: tile.value,
            disabled: tile.disabled,
            correct: tile.correct,
            incorrect: tile.incorrect,
            revealed: tile.revealed,
            highlighted: tile.highlighted,
            group_index: self.mapping().group_index(pos),
        })
    }

    pub fn views(&self) -> Vec<ClueView> {
        self.puzzle
            .clues()
            .iter()
            .enumerate()
            .map(|(index, clue)| ClueView {
                index,
                kind: clue.kind,
                letter: clue.letter,
                heading: clue.heading(),
                clue: clue.clue.clone(),
                tiles: (0..self.board.row_len(index))
                    .filter_map(|l| self.tile_view(Position::new(index, l)))
                    .collect(),
            })
            .collect()
    }
}
