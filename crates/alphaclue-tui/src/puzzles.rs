//! Dated puzzle files: loading for play and writing for authoring.

use alphaclue_core::{
    parse_puzzle_document, Clue, DayKey, Error, MappingGenerator, Puzzle, PuzzleDocument, Result,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `<root>/puzzles/DD-MM-YY.json`
pub fn puzzle_path(root: &Path, day: DayKey) -> PathBuf {
    root.join(day.puzzle_file_name())
}

/// Load the day's puzzle from its JSON file, falling back to the HTML page
pub fn load_puzzle(root: &Path, day: DayKey, generator: &mut MappingGenerator) -> Result<Puzzle> {
    let json_path = puzzle_path(root, day);
    let html_path = json_path.with_extension("html");

    let text = match read_optional(&json_path)? {
        Some(text) => text,
        None => read_optional(&html_path)?.ok_or(Error::PuzzleNotFound(day))?,
    };
    log::info!("loaded puzzle for {} from {}", day, root.display());
    Puzzle::from_document(parse_puzzle_document(&text)?, generator)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Clues for authoring: a bare JSON array of clues or a full puzzle document
pub fn read_clues(path: &Path) -> Result<Vec<Clue>> {
    let text = fs::read_to_string(path)?;
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(&text).map_err(|e| Error::MalformedPuzzle(e.to_string()));
    }
    Ok(parse_puzzle_document(&text)?.clues)
}

/// Write the JSON document and its HTML page. Existing files are kept unless `force`.
pub fn write_puzzle(
    root: &Path,
    day: DayKey,
    doc: &PuzzleDocument,
    force: bool,
) -> Result<PathBuf> {
    let json_path = puzzle_path(root, day);
    if json_path.exists() && !force {
        return Err(Error::AlreadyExists(json_path.display().to_string()));
    }
    if let Some(parent) = json_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&json_path, doc.to_json()?)?;
    fs::write(json_path.with_extension("html"), render_page(day, doc)?)?;
    log::info!("wrote puzzle #{} to {}", day.puzzle_number(), json_path.display());
    Ok(json_path)
}

fn render_page(day: DayKey, doc: &PuzzleDocument) -> Result<String> {
    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Puzzle for {}</title>\n</head>\n<body>\n{}<script src=\"../game.js\"></script>\n\
         </body>\n</html>\n",
        day,
        doc.to_script()?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphaclue_core::{author_document, ClueKind, Difficulty};

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("alphaclue-puzzles-{}-{}", name, std::process::id()))
    }

    fn clues() -> Vec<Clue> {
        vec![
            Clue::new(ClueKind::StartsWith, 'B', "Yellow fruit", "banana"),
            Clue::new(ClueKind::Contains, 'A', "Swedish pop group", "abba"),
            Clue::new(ClueKind::StartsWith, 'N', "Arrest", "nab"),
        ]
    }

    #[test]
    fn test_write_then_load() {
        let root = temp_root("roundtrip");
        let day = DayKey::new(2024, 8, 5).unwrap();
        let mut generator = MappingGenerator::with_seed(1);
        let doc = author_document(clues(), &mut generator).unwrap();

        let path = write_puzzle(&root, day, &doc, false).unwrap();
        assert!(path.ends_with("puzzles/05-08-24.json"));
        assert!(path.with_extension("html").exists());

        let puzzle = load_puzzle(&root, day, &mut generator).unwrap();
        assert_eq!(puzzle.clues(), doc.clues.as_slice());
        assert_eq!(
            puzzle.mapping(Difficulty::Medium),
            doc.reveal_mappings.as_ref().unwrap().get(Difficulty::Medium)
        );
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let root = temp_root("exists");
        let day = DayKey::new(2024, 8, 6).unwrap();
        let mut generator = MappingGenerator::with_seed(2);
        let doc = author_document(clues(), &mut generator).unwrap();

        write_puzzle(&root, day, &doc, false).unwrap();
        assert!(matches!(
            write_puzzle(&root, day, &doc, false),
            Err(Error::AlreadyExists(_))
        ));
        assert!(write_puzzle(&root, day, &doc, true).is_ok());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_day() {
        let root = temp_root("missing");
        let day = DayKey::new(2024, 8, 7).unwrap();
        let mut generator = MappingGenerator::with_seed(3);
        assert_eq!(
            load_puzzle(&root, day, &mut generator).unwrap_err(),
            Error::PuzzleNotFound(day)
        );
    }

    #[test]
    fn test_html_page_fallback() {
        let root = temp_root("html");
        let day = DayKey::new(2024, 8, 8).unwrap();
        let mut generator = MappingGenerator::with_seed(4);
        let doc = author_document(clues(), &mut generator).unwrap();
        let path = write_puzzle(&root, day, &doc, false).unwrap();
        fs::remove_file(&path).unwrap();

        let puzzle = load_puzzle(&root, day, &mut generator).unwrap();
        assert_eq!(puzzle.len(), 3);
        let _ = fs::remove_dir_all(&root);
    }
}
