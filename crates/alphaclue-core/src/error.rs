use crate::{DayKey, Difficulty};

/// Result type for puzzle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the puzzle core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No puzzle document exists for the date
    PuzzleNotFound(DayKey),
    /// The puzzle document could not be understood
    MalformedPuzzle(String),
    /// No covering reveal mapping was found within the retry budget
    UnsolvableConfiguration {
        difficulty: Difficulty,
        attempts: usize,
    },
    /// Persisted session state is unusable
    MalformedState(String),
    /// The backing store rejected a write
    Storage(String),
    /// A dated puzzle already exists and overwriting was not requested
    AlreadyExists(String),
    /// File access failed
    Io(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PuzzleNotFound(day) => write!(f, "No puzzle for {}", day),
            Self::MalformedPuzzle(e) => write!(f, "Malformed puzzle: {}", e),
            Self::UnsolvableConfiguration {
                difficulty,
                attempts,
            } => write!(
                f,
                "Unsolvable puzzle configuration: no covering {} mapping after {} attempts",
                difficulty, attempts
            ),
            Self::MalformedState(e) => write!(f, "Malformed saved state: {}", e),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::AlreadyExists(e) => write!(f, "Puzzle already exists: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
