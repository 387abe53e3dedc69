//! Puzzle documents: parsing published files and authoring new ones.

use crate::{
    validate_clues, Clue, Difficulty, Error, MappingGenerator, Position, Puzzle, Result,
    RevealMappings, MAX_MAPPING_INDEX,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const PUZZLE_DATA_MARKER: &str = "window.puzzleData";
const REVEAL_MAPPINGS_MARKER: &str = "window.revealMappings";

/// A published puzzle: clues plus optional precomputed mappings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleDocument {
    pub clues: Vec<Clue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_mappings: Option<RevealMappings>,
}

impl PuzzleDocument {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::MalformedPuzzle(e.to_string()))
    }

    /// Script block assigning the document to `window.puzzleData` / `window.revealMappings`
    pub fn to_script(&self) -> Result<String> {
        let data = serde_json::json!({ "clues": self.clues });
        let mut script = format!("<script>\n{} = {};\n", PUZZLE_DATA_MARKER, data);
        if let Some(mappings) = &self.reveal_mappings {
            let mappings =
                serde_json::to_string(mappings).map_err(|e| Error::MalformedPuzzle(e.to_string()))?;
            script.push_str(&format!("{} = {};\n", REVEAL_MAPPINGS_MARKER, mappings));
        }
        script.push_str("</script>\n");
        Ok(script)
    }
}

/// Parse a JSON document or an HTML/script page that assigns `window.puzzleData`
pub fn parse_puzzle_document(text: &str) -> Result<PuzzleDocument> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        return serde_json::from_str(trimmed).map_err(|e| Error::MalformedPuzzle(e.to_string()));
    }

    let data = assigned_value(text, PUZZLE_DATA_MARKER)?.ok_or_else(|| {
        Error::MalformedPuzzle(format!("no JSON object and no {} assignment", PUZZLE_DATA_MARKER))
    })?;
    let mut doc: PuzzleDocument =
        serde_json::from_value(data).map_err(|e| Error::MalformedPuzzle(e.to_string()))?;

    if doc.reveal_mappings.is_none() {
        if let Some(mappings) = assigned_value(text, REVEAL_MAPPINGS_MARKER)? {
            let mappings = serde_json::from_value(mappings)
                .map_err(|e| Error::MalformedPuzzle(e.to_string()))?;
            doc.reveal_mappings = Some(mappings);
        }
    }
    Ok(doc)
}

/// JSON value on the right of `marker = ...`, if the marker is assigned
fn assigned_value(text: &str, marker: &str) -> Result<Option<Value>> {
    let Some(start) = text.find(marker) else {
        return Ok(None);
    };
    let rest = text[start + marker.len()..].trim_start();
    let Some(rest) = rest.strip_prefix('=') else {
        return Ok(None);
    };
    let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    match values.next() {
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(e)) => Err(Error::MalformedPuzzle(format!("{}: {}", marker, e))),
        None => Err(Error::MalformedPuzzle(format!("{} has no value", marker))),
    }
}

impl Puzzle {
    /// Build a playable puzzle from a document.
    ///
    /// Precomputed mappings are used when they cover every clue and stay in
    /// range; any missing or unusable level is generated instead.
    pub fn from_document(doc: PuzzleDocument, generator: &mut MappingGenerator) -> Result<Puzzle> {
        validate_clues(&doc.clues)?;
        let mut mappings = doc.reveal_mappings.unwrap_or_default();

        for &difficulty in Difficulty::all_levels() {
            if let Err(reason) = check_mapping(&doc.clues, &mappings, difficulty) {
                log::warn!("regenerating {} mapping: {}", difficulty, reason);
                mappings.set(difficulty, generator.generate(&doc.clues, difficulty)?);
            }
        }
        Puzzle::new(doc.clues, mappings)
    }
}

fn check_mapping(
    clues: &[Clue],
    mappings: &RevealMappings,
    difficulty: Difficulty,
) -> std::result::Result<(), String> {
    let mapping = mappings.get(difficulty);
    if mapping.is_empty() {
        return Err("missing".to_string());
    }
    let letter = |p: Position| clues.get(p.clue).and_then(|c| c.letter_at(p.letter));
    if let Some((pos, entry)) = mapping
        .iter()
        .find(|(pos, entry)| letter(**pos).is_none() || letter(entry.target).is_none())
    {
        return Err(format!("link {} -> {} is out of range", pos, entry.target));
    }
    for (&pos, entry) in mapping.iter() {
        if letter(pos) != letter(entry.target) {
            return Err(format!("link {} -> {} joins different letters", pos, entry.target));
        }
        if mapping.group_index(entry.target) != Some(entry.index) {
            return Err(format!("link {} -> {} changes group index", pos, entry.target));
        }
        let closes = mapping
            .group_of(pos)
            .last()
            .and_then(|&last| mapping.target_of(last))
            == Some(pos);
        if !closes {
            return Err(format!("group at {} does not cycle back", pos));
        }
    }
    if let Some(index) = mapping
        .used_indices()
        .into_iter()
        .find(|i| !(1..=MAX_MAPPING_INDEX).contains(i))
    {
        return Err(format!("group index {} is out of range", index));
    }
    if !mapping.covers_all(clues) {
        return Err("not every clue is covered".to_string());
    }
    Ok(())
}

/// Author a document with all three levels precomputed
pub fn author_document(
    clues: Vec<Clue>,
    generator: &mut MappingGenerator,
) -> Result<PuzzleDocument> {
    validate_clues(&clues)?;
    let mappings = generator.generate_all(&clues)?;
    Ok(PuzzleDocument {
        clues,
        reveal_mappings: Some(mappings),
    })
}
