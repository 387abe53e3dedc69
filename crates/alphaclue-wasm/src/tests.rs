//! Browser tests for the wasm bindings

use crate::{AlphaClueGame, BrowserStorage};
use alphaclue_core::{state_key, DayKey, Storage};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const DOCUMENT: &str = r#"{
    "clues": [
        { "type": "starts_with", "letter": "B", "clue": "Flying mammal", "answer": "bat" },
        { "type": "contains", "letter": "T", "clue": "Feline", "answer": "cat" }
    ],
    "revealMappings": {
        "easy": {
            "0-1": { "targetClueIndex": 1, "targetLetterIndex": 1, "index": 4 },
            "1-1": { "targetClueIndex": 0, "targetLetterIndex": 1, "index": 4 },
            "0-2": { "targetClueIndex": 1, "targetLetterIndex": 2, "index": 17 },
            "1-2": { "targetClueIndex": 0, "targetLetterIndex": 2, "index": 17 }
        },
        "medium": {
            "0-1": { "targetClueIndex": 1, "targetLetterIndex": 1, "index": 9 },
            "1-1": { "targetClueIndex": 0, "targetLetterIndex": 1, "index": 9 }
        },
        "advanced": {
            "0-2": { "targetClueIndex": 1, "targetLetterIndex": 2, "index": 23 },
            "1-2": { "targetClueIndex": 0, "targetLetterIndex": 2, "index": 23 }
        }
    }
}"#;

fn clear_day(day: &str) {
    let mut storage = BrowserStorage::local();
    if let Ok(day) = day.parse::<DayKey>() {
        storage.remove_item(&state_key(day));
    }
}

fn new_game(day: &str) -> AlphaClueGame {
    clear_day(day);
    AlphaClueGame::new(DOCUMENT, Some(day.to_string()), None, false).unwrap()
}

#[wasm_bindgen_test]
fn test_new_game_starts_incomplete() {
    let game = new_game("2024-09-01");
    assert_eq!(game.status(), "incomplete");
    assert_eq!(game.difficulty(), "easy");
    assert!(!game.is_completed());
    assert!(game.is_persistent());
}

#[wasm_bindgen_test]
fn test_bad_document_is_rejected() {
    let day = Some("2024-09-02".to_string());
    assert!(AlphaClueGame::new("not a puzzle", day, None, false).is_err());
    assert!(AlphaClueGame::new(DOCUMENT, Some("yesterday".to_string()), None, false).is_err());
}

#[wasm_bindgen_test]
fn test_input_is_saved() {
    let mut game = new_game("2024-09-03");
    game.input(0, 0, "b");
    let day: DayKey = "2024-09-03".parse().unwrap();
    let saved = BrowserStorage::local().get_item(&state_key(day)).unwrap();
    assert!(saved.contains("\"B\""));
}

#[wasm_bindgen_test]
fn test_unknown_key_returns_null() {
    let mut game = new_game("2024-09-04");
    assert!(game.key(0, 0, "Enter").is_null());
    assert!(!game.key(0, 1, "ArrowLeft").is_null());
}

#[wasm_bindgen_test]
fn test_level_change_notice() {
    let mut game = new_game("2024-09-05");
    assert!(game.level_change_message("advanced").is_some());
    assert!(game.level_change_message("medium").is_none());
    assert!(game.set_difficulty("medium").unwrap());
    assert_eq!(game.difficulty(), "medium");
    assert!(game.set_difficulty("impossible").is_err());
}

#[wasm_bindgen_test]
fn test_new_game_defaults_to_local_today() {
    let now = js_sys::Date::new_0();
    let today = DayKey::new(
        now.get_full_year() as i32,
        (now.get_month() + 1) as u8,
        now.get_date() as u8,
    )
    .unwrap();
    clear_day(&today.to_string());

    let game = AlphaClueGame::new(DOCUMENT, None, None, false).unwrap();
    assert_eq!(game.puzzle_number(), today.puzzle_number() as i32);
    assert_eq!(game.status(), "incomplete");
}
