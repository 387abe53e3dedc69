use crate::{letters_match, Board, Clue, Position};
use serde::{Deserialize, Serialize};

/// Result of scanning every tile against the answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub all_filled: bool,
    pub all_correct: bool,
}

impl Evaluation {
    pub fn status(&self) -> CompletionStatus {
        match (self.all_filled, self.all_correct) {
            (true, true) => CompletionStatus::Solved,
            (true, false) => CompletionStatus::FilledIncorrect,
            _ => CompletionStatus::Incomplete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionStatus {
    Incomplete,
    FilledIncorrect,
    Solved,
}

impl CompletionStatus {
    pub fn is_solved(&self) -> bool {
        matches!(self, CompletionStatus::Solved)
    }
}

/// Check every position of every clue.
///
/// A tile missing from `board` counts as empty.
pub fn evaluate(clues: &[Clue], board: &Board) -> Evaluation {
    let mut all_filled = true;
    let mut all_correct = true;

    for (c, clue) in clues.iter().enumerate() {
        for (l, answer) in clue.letters().into_iter().enumerate() {
            match board.value(Position::new(c, l)) {
                Some(value) => {
                    if !letters_match(value, answer) {
                        all_correct = false;
                    }
                }
                None => {
                    all_filled = false;
                    all_correct = false;
                }
            }
        }
    }

    Evaluation {
        all_filled,
        all_correct,
    }
}

/// Format milliseconds as MM:SS
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Text shown to the player once every tile is filled
pub fn completion_message(status: CompletionStatus, elapsed_ms: u64) -> Option<String> {
    match status {
        CompletionStatus::Solved => Some(format!(
            "Congratulations! You've solved today's puzzle in {}",
            format_elapsed(elapsed_ms)
        )),
        CompletionStatus::FilledIncorrect => {
            Some("Keep trying! Some of your answers are incorrect.".to_string())
        }
        CompletionStatus::Incomplete => None,
    }
}
