//! Reveal mappings: directed links between tiles that hold the same letter.

use crate::{Clue, Difficulty, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Where a linked tile propagates to, and the badge shared by its group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry", into = "RawEntry")]
pub struct MappingEntry {
    pub target: Position,
    pub index: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    target_clue_index: usize,
    target_letter_index: usize,
    index: u32,
}

impl From<RawEntry> for MappingEntry {
    fn from(raw: RawEntry) -> Self {
        Self {
            target: Position::new(raw.target_clue_index, raw.target_letter_index),
            index: raw.index,
        }
    }
}

impl From<MappingEntry> for RawEntry {
    fn from(entry: MappingEntry) -> Self {
        Self {
            target_clue_index: entry.target.clue,
            target_letter_index: entry.target.letter,
            index: entry.index,
        }
    }
}

/// Mapping for one difficulty, keyed by `"clue-letter"` in documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevealMapping {
    entries: BTreeMap<Position, MappingEntry>,
}

impl RevealMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<&MappingEntry> {
        self.entries.get(&pos)
    }

    /// Tile that receives letters typed at `pos`
    pub fn target_of(&self, pos: Position) -> Option<Position> {
        self.entries.get(&pos).map(|e| e.target)
    }

    /// Shared badge number of the group `pos` belongs to
    pub fn group_index(&self, pos: Position) -> Option<u32> {
        self.entries.get(&pos).map(|e| e.index)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.entries.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &MappingEntry)> {
        self.entries.iter()
    }

    pub fn insert(&mut self, pos: Position, entry: MappingEntry) {
        self.entries.insert(pos, entry);
    }

    /// Link `members` into one cycle sharing `index`: each member targets the next,
    /// the last wraps to the first. Fewer than two members is a no-op.
    pub fn link_group(&mut self, members: &[Position], index: u32) {
        if members.len() < 2 {
            return;
        }
        for (i, &pos) in members.iter().enumerate() {
            let target = members[(i + 1) % members.len()];
            self.entries.insert(pos, MappingEntry { target, index });
        }
    }

    /// Members of the group containing `pos`, starting at `pos` and following links.
    /// Stops at a missing link or when a position repeats.
    pub fn group_of(&self, pos: Position) -> Vec<Position> {
        let mut group = Vec::new();
        let mut current = pos;
        while let Some(entry) = self.entries.get(&current) {
            if group.contains(&current) {
                break;
            }
            group.push(current);
            current = entry.target;
        }
        group
    }

    /// Every linkage group, each listed once
    pub fn groups(&self) -> Vec<Vec<Position>> {
        let mut seen = BTreeSet::new();
        let mut groups = Vec::new();
        for &pos in self.entries.keys() {
            if seen.contains(&pos) {
                continue;
            }
            let group = self.group_of(pos);
            seen.extend(group.iter().copied());
            groups.push(group);
        }
        groups
    }

    /// Distinct badge numbers in use
    pub fn used_indices(&self) -> BTreeSet<u32> {
        self.entries.values().map(|e| e.index).collect()
    }

    /// Whether clue `clue` has at least one mapped letter
    pub fn covers_clue(&self, clue: usize, len: usize) -> bool {
        (0..len).any(|letter| self.entries.contains_key(&Position::new(clue, letter)))
    }

    /// Every clue has at least one mapped letter
    pub fn covers_all(&self, clues: &[Clue]) -> bool {
        clues
            .iter()
            .enumerate()
            .all(|(i, clue)| self.covers_clue(i, clue.len()))
    }
}

/// One independently generated mapping per difficulty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMappings {
    #[serde(default)]
    pub easy: RevealMapping,
    #[serde(default)]
    pub medium: RevealMapping,
    #[serde(default)]
    pub advanced: RevealMapping,
}

impl RevealMappings {
    pub fn get(&self, difficulty: Difficulty) -> &RevealMapping {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Advanced => &self.advanced,
        }
    }

    pub fn set(&mut self, difficulty: Difficulty, mapping: RevealMapping) {
        match difficulty {
            Difficulty::Easy => self.easy = mapping,
            Difficulty::Medium => self.medium = mapping,
            Difficulty::Advanced => self.advanced = mapping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClueKind;

    #[test]
    fn test_link_group_cycles() {
        let a = Position::new(0, 1);
        let b = Position::new(1, 0);
        let c = Position::new(2, 2);
        let mut mapping = RevealMapping::new();
        mapping.link_group(&[a, b, c], 17);

        assert_eq!(mapping.target_of(a), Some(b));
        assert_eq!(mapping.target_of(b), Some(c));
        assert_eq!(mapping.target_of(c), Some(a));
        assert_eq!(mapping.group_of(b), vec![b, c, a]);
        assert!(mapping.iter().all(|(_, e)| e.index == 17));
        assert_eq!(mapping.groups().len(), 1);
    }

    #[test]
    fn test_single_member_not_linked() {
        let mut mapping = RevealMapping::new();
        mapping.link_group(&[Position::new(0, 0)], 3);
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_document_format() {
        let mut mapping = RevealMapping::new();
        mapping.link_group(&[Position::new(0, 1), Position::new(1, 0)], 42);
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["0-1"]["targetClueIndex"], 1);
        assert_eq!(json["0-1"]["targetLetterIndex"], 0);
        assert_eq!(json["1-0"]["index"], 42);

        let back: RevealMapping = serde_json::from_value(json).unwrap();
        assert_eq!(back, mapping);
    }

    #[test]
    fn test_coverage() {
        let clues = vec![
            Clue::new(ClueKind::Contains, 'C', "", "CAT"),
            Clue::new(ClueKind::Contains, 'D', "", "DOG"),
        ];
        let mut mapping = RevealMapping::new();
        assert!(!mapping.covers_all(&clues));
        mapping.link_group(&[Position::new(0, 1), Position::new(1, 1)], 5);
        assert!(mapping.covers_all(&clues));
    }

    #[test]
    fn test_missing_difficulties_default_empty() {
        let mappings: RevealMappings = serde_json::from_str(r#"{"easy":{}}"#).unwrap();
        assert!(mappings.get(Difficulty::Advanced).is_empty());
    }
}
