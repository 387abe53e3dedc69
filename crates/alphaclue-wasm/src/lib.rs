//! WebAssembly bindings for the alphabet-clue puzzle
//!
//! The page owns the DOM. This crate owns the puzzle state: it receives
//! tile events, applies the tile engine, persists progress to
//! `localStorage` and hands back plain JS objects describing every tile.

use alphaclue_core::{
    completion_message, format_elapsed, level_change_message, parse_puzzle_document,
    CompletionStatus, DayKey, Difficulty, Game, Key, MappingGenerator, Position, Puzzle,
    PuzzleDocument, RevealMappings, SessionOptions, SystemClock,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod storage;

// WASM tests require wasm-pack test to run
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

pub use storage::BrowserStorage;

// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Tile the page should focus
#[derive(Serialize)]
struct FocusTarget {
    clue: usize,
    letter: usize,
}

impl From<Position> for FocusTarget {
    fn from(pos: Position) -> Self {
        Self {
            clue: pos.clue,
            letter: pos.letter,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InputOutcome {
    focus: Option<FocusTarget>,
    status: CompletionStatus,
    message: Option<String>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// Today's local date from the JS clock
fn local_today() -> Result<DayKey, JsValue> {
    let now = js_sys::Date::new_0();
    DayKey::new(
        now.get_full_year() as i32,
        (now.get_month() + 1) as u8,
        now.get_date() as u8,
    )
    .ok_or_else(|| js_error("invalid local date"))
}

fn parse_key(name: &str) -> Option<Key> {
    match name {
        "Backspace" => Some(Key::Backspace),
        "Delete" => Some(Key::Delete),
        "ArrowLeft" => Some(Key::Left),
        "ArrowRight" => Some(Key::Right),
        "ArrowUp" => Some(Key::Up),
        "ArrowDown" => Some(Key::Down),
        _ => None,
    }
}

/// The day's game, backed by localStorage
#[wasm_bindgen]
pub struct AlphaClueGame {
    game: Game<BrowserStorage, SystemClock>,
}

#[wasm_bindgen]
impl AlphaClueGame {
    /// Start from a JSON puzzle document or an HTML page assigning `window.puzzleData`.
    ///
    /// `day` is `YYYY-MM-DD`; today's local date is used when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(
        document: &str,
        day: Option<String>,
        difficulty: Option<String>,
        autocheck: bool,
    ) -> Result<AlphaClueGame, JsValue> {
        let doc = parse_puzzle_document(document).map_err(js_error)?;
        Self::start(doc, day, difficulty, autocheck)
    }

    /// Start from the page globals `window.puzzleData` and `window.revealMappings`
    #[wasm_bindgen(js_name = fromWindow)]
    pub fn from_window(
        day: Option<String>,
        difficulty: Option<String>,
        autocheck: bool,
    ) -> Result<AlphaClueGame, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let data = js_sys::Reflect::get(&window, &JsValue::from_str("puzzleData"))?;
        if data.is_undefined() || data.is_null() {
            return Err(js_error("Puzzle not found for today. Please check back later."));
        }
        let mut doc: PuzzleDocument = serde_wasm_bindgen::from_value(data)?;

        if doc.reveal_mappings.is_none() {
            let mappings = js_sys::Reflect::get(&window, &JsValue::from_str("revealMappings"))?;
            if !mappings.is_undefined() && !mappings.is_null() {
                let mappings: RevealMappings = serde_wasm_bindgen::from_value(mappings)?;
                doc.reveal_mappings = Some(mappings);
            }
        }
        Self::start(doc, day, difficulty, autocheck)
    }

    /// Handle an `input` event on a tile
    pub fn input(&mut self, clue: usize, letter: usize, value: &str) -> JsValue {
        let report = self.game.input(Position::new(clue, letter), value);
        self.outcome(report.focus, report.status)
    }

    /// Handle a `keydown` by its `KeyboardEvent.key` name. Returns the tile to focus, or null.
    pub fn key(&mut self, clue: usize, letter: usize, key: &str) -> JsValue {
        let Some(key) = parse_key(key) else {
            return JsValue::NULL;
        };
        match self.game.key(Position::new(clue, letter), key) {
            Some(pos) => to_js(&FocusTarget::from(pos)),
            None => JsValue::NULL,
        }
    }

    pub fn focus(&mut self, clue: usize, letter: usize) {
        self.game.focus(Position::new(clue, letter));
    }

    pub fn blur(&mut self, clue: usize, letter: usize) {
        self.game.blur(Position::new(clue, letter));
    }

    /// Toggle live checking. Returns `{focus, status, message}`.
    ///
    /// Turning it on re-propagates every letter, which can finish the board.
    #[wasm_bindgen(js_name = setAutocheck)]
    pub fn set_autocheck(&mut self, on: bool) -> JsValue {
        let status = self.game.set_autocheck(on);
        self.outcome(None, status)
    }

    /// Notice to confirm before switching to `level`, if any
    #[wasm_bindgen(js_name = levelChangeMessage)]
    pub fn level_change_message(&self, level: &str) -> Option<String> {
        let level = level.parse::<Difficulty>().ok()?;
        level_change_message(self.game.session().difficulty(), level).map(str::to_string)
    }

    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, level: &str) -> Result<bool, JsValue> {
        let level = level.parse::<Difficulty>().map_err(js_error)?;
        Ok(self.game.set_difficulty(level))
    }

    /// Periodic save (call from setInterval)
    pub fn tick(&mut self) {
        self.game.tick();
    }

    /// Forward `visibilitychange`
    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, visible: bool) {
        self.game.set_visible(visible);
    }

    /// Every clue with its tiles, as plain objects
    pub fn views(&self) -> JsValue {
        to_js(&self.game.views())
    }

    #[wasm_bindgen(js_name = elapsedMs)]
    pub fn elapsed_ms(&self) -> f64 {
        self.game.elapsed_ms() as f64
    }

    /// Elapsed time as MM:SS
    #[wasm_bindgen(js_name = elapsedString)]
    pub fn elapsed_string(&self) -> String {
        format_elapsed(self.game.elapsed_ms())
    }

    pub fn status(&self) -> String {
        match self.game.status() {
            CompletionStatus::Incomplete => "incomplete",
            CompletionStatus::FilledIncorrect => "filledIncorrect",
            CompletionStatus::Solved => "solved",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = isCompleted)]
    pub fn is_completed(&self) -> bool {
        self.game.is_completed()
    }

    pub fn difficulty(&self) -> String {
        self.game.session().difficulty().as_str().to_string()
    }

    pub fn autocheck(&self) -> bool {
        self.game.session().autocheck()
    }

    #[wasm_bindgen(js_name = puzzleNumber)]
    pub fn puzzle_number(&self) -> i32 {
        self.game.session().day().puzzle_number() as i32
    }

    /// Whether progress reaches localStorage
    #[wasm_bindgen(js_name = isPersistent)]
    pub fn is_persistent(&self) -> bool {
        self.game.store().storage().is_persistent()
    }
}

impl AlphaClueGame {
    fn outcome(&self, focus: Option<Position>, status: CompletionStatus) -> JsValue {
        let elapsed = self
            .game
            .session()
            .completion_time_ms()
            .unwrap_or_else(|| self.game.elapsed_ms());
        to_js(&InputOutcome {
            focus: focus.map(FocusTarget::from),
            status,
            message: completion_message(status, elapsed),
        })
    }

    fn start(
        doc: PuzzleDocument,
        day: Option<String>,
        difficulty: Option<String>,
        autocheck: bool,
    ) -> Result<AlphaClueGame, JsValue> {
        let today = match day {
            Some(day) => day.parse::<DayKey>().map_err(js_error)?,
            None => local_today()?,
        };
        let difficulty = match difficulty {
            Some(level) => level.parse::<Difficulty>().map_err(js_error)?,
            None => Difficulty::default(),
        };

        let mut generator = MappingGenerator::new();
        let puzzle = Puzzle::from_document(doc, &mut generator).map_err(js_error)?;
        let options = SessionOptions {
            difficulty,
            autocheck,
        };
        let game = Game::start(puzzle, today, options, BrowserStorage::local(), SystemClock);
        log::info!("puzzle #{} ready", today.puzzle_number());
        Ok(AlphaClueGame { game })
    }
}
