//! Basic example of using the alphabet-clue engine

use alphaclue_core::{
    author_document, format_elapsed, Clue, ClueKind, DayKey, Difficulty, Game, ManualClock,
    MappingGenerator, MemoryStorage, Position, Puzzle, SessionOptions,
};

fn main() {
    let clues = vec![
        Clue::new(ClueKind::StartsWith, 'A', "Flight-related prefix", "aero"),
        Clue::new(ClueKind::Contains, 'B', "Taken ___ (surprised)", "aback"),
        Clue::new(ClueKind::StartsWith, 'D', "Blood giver", "donor"),
        Clue::new(ClueKind::Contains, 'E', "Fit to eat", "edible"),
        Clue::new(ClueKind::StartsWith, 'R', "Ancient citizen", "roman"),
    ];

    // Generate mappings for every level
    println!("Generating reveal mappings...\n");
    let mut generator = MappingGenerator::new();
    let doc = match author_document(clues, &mut generator) {
        Ok(doc) => doc,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    let puzzle = match Puzzle::from_document(doc, &mut generator) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    for &difficulty in Difficulty::all_levels() {
        let mapping = puzzle.mapping(difficulty);
        println!("{} ({} letters linked):", difficulty.label(), mapping.len());
        for group in mapping.groups() {
            let index = mapping.group_index(group[0]).unwrap_or_default();
            let members: Vec<String> = group
                .iter()
                .map(|p| format!("{}{}", puzzle.answer_letter(*p).unwrap_or('?'), p))
                .collect();
            println!("  [{:>3}] {}", index, members.join(" -> "));
        }
    }

    // Play through the first clue
    println!("\n--- Playing ---\n");
    let day = DayKey::today();
    println!("Puzzle #{} ({})", day.puzzle_number(), day.puzzle_file_name());
    let clock = ManualClock::new(0);
    let mut game = Game::start(
        puzzle,
        day,
        SessionOptions::default(),
        MemoryStorage::new(),
        clock.clone(),
    );

    for (i, ch) in "aero".chars().enumerate() {
        clock.advance(1_500);
        let report = game.input(Position::new(0, i), &ch.to_string());
        println!("typed {} -> focus {:?}, {:?}", ch, report.focus, report.status);
    }

    for clue in game.views() {
        let tiles: String = clue
            .tiles
            .iter()
            .map(|t| match (t.value, t.group_index) {
                (Some(v), _) => format!("[{}]", v),
                (None, Some(n)) => format!("[{}]", n % 10),
                (None, None) => "[ ]".to_string(),
            })
            .collect();
        println!("{:<14} {}", clue.heading, tiles);
    }
    println!("\nElapsed: {}", format_elapsed(game.elapsed_ms()));
}
