//! Alphabet-clue puzzle core
//!
//! Generates reveal mappings that link identical letters across the day's
//! answers, runs the tile engine that propagates typed letters along those
//! links, evaluates completion and persists progress per calendar day.

mod board;
mod completion;
mod day;
mod difficulty;
mod document;
mod engine;
mod error;
mod game;
mod generator;
mod mapping;
mod progress;
mod puzzle;
pub mod rng;
mod session;
mod timer;

pub use board::{Board, TileState};
pub use completion::{completion_message, evaluate, format_elapsed, CompletionStatus, Evaluation};
pub use day::DayKey;
pub use difficulty::{level_change_message, Difficulty};
pub use document::{author_document, parse_puzzle_document, PuzzleDocument};
pub use engine::{Key, TileEngine};
pub use error::{Error, Result};
pub use game::{Game, InputReport};
pub use generator::{GeneratorConfig, MappingGenerator, MAX_MAPPING_INDEX};
pub use mapping::{MappingEntry, RevealMapping, RevealMappings};
pub use progress::{
    elapsed_key, state_key, MemoryStorage, ProgressStore, SavedSession, SavedTile, Storage,
    SAVE_VERSION,
};
pub use puzzle::{letters_match, normalize_letter, validate_clues, Clue, ClueKind, Position, Puzzle};
pub use rng::SimpleRng;
pub use session::{ClueView, GameSession, SessionOptions, TileView};
pub use timer::{Clock, ManualClock, Stopwatch, SystemClock};
