//! Puzzle model: clues, letter positions and the per-difficulty mapping tables.

use crate::{Difficulty, Error, MappingGenerator, Result, RevealMapping, RevealMappings};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How a clue relates to its alphabet letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClueKind {
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts_with", alias = "starts")]
    StartsWith,
}

/// One alphabet entry: hint text plus the hidden answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    #[serde(rename = "type")]
    pub kind: ClueKind,
    pub letter: char,
    pub clue: String,
    pub answer: String,
}

impl Clue {
    pub fn new(kind: ClueKind, letter: char, clue: &str, answer: &str) -> Self {
        Self {
            kind,
            letter,
            clue: clue.to_string(),
            answer: answer.to_string(),
        }
    }

    /// Number of letter cells in the answer
    pub fn len(&self) -> usize {
        self.answer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_empty()
    }

    /// Answer letters, uppercased
    pub fn letters(&self) -> Vec<char> {
        self.answer.chars().map(normalize_letter).collect()
    }

    /// Uppercased answer letter at `index`
    pub fn letter_at(&self, index: usize) -> Option<char> {
        self.answer.chars().nth(index).map(normalize_letter)
    }

    /// Heading line shown above the clue text, e.g. "Starts with K"
    pub fn heading(&self) -> String {
        let letter = normalize_letter(self.letter);
        match self.kind {
            ClueKind::Contains => format!("Contains {}", letter),
            ClueKind::StartsWith => format!("Starts with {}", letter),
        }
    }
}

/// Uppercase a single letter, keeping it a single char
pub fn normalize_letter(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Case-insensitive letter comparison
pub fn letters_match(a: char, b: char) -> bool {
    normalize_letter(a) == normalize_letter(b)
}

/// One letter cell: `(clue index, letter index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub clue: usize,
    pub letter: usize,
}

impl Position {
    pub fn new(clue: usize, letter: usize) -> Self {
        Self { clue, letter }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.clue, self.letter)
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (clue, letter) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid position key '{}'", s))?;
        let clue = clue
            .parse()
            .map_err(|_| format!("invalid clue index in '{}'", s))?;
        let letter = letter
            .parse()
            .map_err(|_| format!("invalid letter index in '{}'", s))?;
        Ok(Self { clue, letter })
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// The day's clues together with one reveal mapping per difficulty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    clues: Vec<Clue>,
    reveal_mappings: RevealMappings,
}

impl Puzzle {
    /// Build a puzzle and generate mappings for every difficulty
    pub fn generate(clues: Vec<Clue>, generator: &mut MappingGenerator) -> Result<Self> {
        validate_clues(&clues)?;
        let reveal_mappings = generator.generate_all(&clues)?;
        Ok(Self {
            clues,
            reveal_mappings,
        })
    }

    /// Build a puzzle from clues and already-known mappings.
    ///
    /// Mapping coverage is not checked here; callers that accept mappings from
    /// untrusted documents go through [`Puzzle::from_document`](crate::Puzzle::from_document).
    pub fn new(clues: Vec<Clue>, reveal_mappings: RevealMappings) -> Result<Self> {
        validate_clues(&clues)?;
        Ok(Self {
            clues,
            reveal_mappings,
        })
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub fn clue(&self, index: usize) -> Option<&Clue> {
        self.clues.get(index)
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    pub fn reveal_mappings(&self) -> &RevealMappings {
        &self.reveal_mappings
    }

    pub fn mapping(&self, difficulty: Difficulty) -> &RevealMapping {
        self.reveal_mappings.get(difficulty)
    }

    /// Correct letter for a position, if the position is valid
    pub fn answer_letter(&self, pos: Position) -> Option<char> {
        self.clues.get(pos.clue)?.letter_at(pos.letter)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.clues
            .get(pos.clue)
            .is_some_and(|clue| pos.letter < clue.len())
    }

    pub fn clue_lengths(&self) -> Vec<usize> {
        self.clues.iter().map(Clue::len).collect()
    }

    pub fn total_letters(&self) -> usize {
        self.clues.iter().map(Clue::len).sum()
    }

    /// All positions in reading order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.clues
            .iter()
            .enumerate()
            .flat_map(|(c, clue)| (0..clue.len()).map(move |l| Position::new(c, l)))
    }
}

/// Reject clue lists the engine cannot play
pub fn validate_clues(clues: &[Clue]) -> Result<()> {
    if clues.is_empty() {
        return Err(Error::MalformedPuzzle("puzzle has no clues".to_string()));
    }
    if let Some((index, clue)) = clues
        .iter()
        .enumerate()
        .find(|(_, clue)| clue.answer.trim().is_empty())
    {
        return Err(Error::MalformedPuzzle(format!(
            "clue {} ({}) has an empty answer",
            index,
            clue.heading()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Clue> {
        vec![
            Clue::new(ClueKind::StartsWith, 'a', "Flight-related prefix", "aero"),
            Clue::new(ClueKind::Contains, 'b', "One way to be taken", "aback"),
        ]
    }

    #[test]
    fn test_clue_letters_uppercase() {
        let clue = &sample()[0];
        assert_eq!(clue.letters(), vec!['A', 'E', 'R', 'O']);
        assert_eq!(clue.letter_at(2), Some('R'));
        assert_eq!(clue.letter_at(4), None);
        assert_eq!(clue.heading(), "Starts with A");
        assert_eq!(sample()[1].heading(), "Contains B");
    }

    #[test]
    fn test_clue_kind_aliases() {
        let json = r#"{"type":"starts","letter":"D","clue":"Giving sort","answer":"donor"}"#;
        let clue: Clue = serde_json::from_str(json).unwrap();
        assert_eq!(clue.kind, ClueKind::StartsWith);

        let out = serde_json::to_string(&clue).unwrap();
        assert!(out.contains("\"type\":\"starts_with\""));
    }

    #[test]
    fn test_position_key_round_trip() {
        let pos = Position::new(12, 3);
        assert_eq!(pos.to_string(), "12-3");
        assert_eq!("12-3".parse::<Position>(), Ok(pos));
        assert!("12".parse::<Position>().is_err());
        assert!("a-1".parse::<Position>().is_err());
    }

    #[test]
    fn test_puzzle_positions_and_lookup() {
        let puzzle = Puzzle::new(sample(), RevealMappings::default()).unwrap();
        assert_eq!(puzzle.total_letters(), 9);
        assert_eq!(puzzle.positions().count(), 9);
        assert_eq!(puzzle.answer_letter(Position::new(1, 4)), Some('K'));
        assert!(!puzzle.contains(Position::new(1, 5)));
        assert!(!puzzle.contains(Position::new(2, 0)));
    }

    #[test]
    fn test_rejects_empty_answer() {
        let mut clues = sample();
        clues[1].answer.clear();
        assert!(matches!(
            Puzzle::new(clues, RevealMappings::default()),
            Err(Error::MalformedPuzzle(_))
        ));
        assert!(validate_clues(&[]).is_err());
    }
}
