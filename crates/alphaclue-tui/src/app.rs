use crate::storage::FileStorage;
use crate::theme::Theme;
use alphaclue_core::{
    completion_message, level_change_message, CompletionStatus, Difficulty, Game, Key, Position,
    SystemClock,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Ticks between periodic saves (~1 second at 100ms)
const SAVE_EVERY_TICKS: u32 = 10;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Filling tiles
    Playing,
    /// Every answer correct; input is ignored
    Solved,
}

/// The main application state
pub struct App {
    /// Today's game
    pub game: Game<FileStorage, SystemClock>,
    /// Tile under the cursor
    pub cursor: Position,
    /// Color theme
    pub theme: Theme,
    high_contrast: bool,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Level waiting for the player to confirm a level-change notice
    pub pending_level: Option<Difficulty>,
    ticks: u32,
}

impl App {
    pub fn new(game: Game<FileStorage, SystemClock>) -> Self {
        let screen_state = if game.is_completed() {
            ScreenState::Solved
        } else {
            ScreenState::Playing
        };
        let mut app = Self {
            game,
            cursor: Position::new(0, 0),
            theme: Theme::default(),
            high_contrast: false,
            message: None,
            message_timer: 0,
            screen_state,
            pending_level: None,
            ticks: 0,
        };
        app.place_cursor();
        if app.screen_state == ScreenState::Solved {
            let elapsed = app.game.elapsed_ms();
            if let Some(msg) = completion_message(CompletionStatus::Solved, elapsed) {
                app.show_message(&msg);
            }
        }
        app
    }

    pub fn get_tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Update message timer and persist the running clock
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % SAVE_EVERY_TICKS == 0 {
            self.game.tick();
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Terminal focus gained or lost
    pub fn set_visible(&mut self, visible: bool) {
        self.game.set_visible(visible);
    }

    pub fn is_high_contrast(&self) -> bool {
        self.high_contrast
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if self.pending_level.is_some() {
            self.handle_confirm_key(key);
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Esc => return AppAction::Quit,

            KeyCode::F(1) => self.request_level(Difficulty::Easy),
            KeyCode::F(2) => self.request_level(Difficulty::Medium),
            KeyCode::F(3) => self.request_level(Difficulty::Advanced),
            KeyCode::F(4) => self.toggle_autocheck(),
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toggle_autocheck()
            }
            KeyCode::F(5) => self.toggle_theme(),

            KeyCode::Char('q') if self.screen_state == ScreenState::Solved => {
                return AppAction::Quit
            }
            _ if self.screen_state == ScreenState::Solved => {}

            KeyCode::Char(c)
                if c.is_alphabetic() && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.type_letter(c)
            }
            KeyCode::Backspace => self.press(Key::Backspace),
            KeyCode::Delete => self.press(Key::Delete),
            KeyCode::Left => self.press(Key::Left),
            KeyCode::Right | KeyCode::Tab => self.press(Key::Right),
            KeyCode::Up => self.press(Key::Up),
            KeyCode::Down => self.press(Key::Down),
            _ => {}
        }

        AppAction::Continue
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(level) = self.pending_level.take() {
                    self.apply_level(level);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_level = None;
            }
            _ => {}
        }
    }

    fn type_letter(&mut self, c: char) {
        let previous = self.game.session().board().value(self.cursor);
        let raw: String = previous.into_iter().chain(std::iter::once(c)).collect();
        let report = self.game.input(self.cursor, &raw);
        if let Some(next) = report.focus {
            self.cursor = next;
        }
        self.announce(report.status);
    }

    fn press(&mut self, key: Key) {
        if let Some(next) = self.game.key(self.cursor, key) {
            self.cursor = next;
        }
    }

    fn announce(&mut self, status: CompletionStatus) {
        let elapsed = self
            .game
            .session()
            .completion_time_ms()
            .unwrap_or_else(|| self.game.elapsed_ms());
        if let Some(msg) = completion_message(status, elapsed) {
            self.show_message(&msg);
        }
        if status.is_solved() {
            self.screen_state = ScreenState::Solved;
        }
    }

    fn toggle_autocheck(&mut self) {
        let on = !self.game.session().autocheck();
        let was_completed = self.game.is_completed();
        let status = self.game.set_autocheck(on);
        if status.is_solved() && !was_completed {
            self.announce(status);
            return;
        }
        if !self.game.is_completed() {
            self.game.focus(self.cursor);
        }
        self.show_message(if on { "Autocheck on" } else { "Autocheck off" });
    }

    fn toggle_theme(&mut self) {
        self.high_contrast = !self.high_contrast;
        self.theme = if self.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::dark()
        };
    }

    /// Ask for confirmation when the switch changes pairing noticeably
    fn request_level(&mut self, level: Difficulty) {
        let current = self.game.session().difficulty();
        if level == current {
            return;
        }
        if level_change_message(current, level).is_some() {
            self.pending_level = Some(level);
        } else {
            self.apply_level(level);
        }
    }

    fn apply_level(&mut self, level: Difficulty) {
        if self.game.set_difficulty(level) {
            self.screen_state = ScreenState::Playing;
            self.place_cursor();
            self.show_message(&format!("{} level", level.label()));
        }
    }

    /// Put the cursor on the first empty tile
    fn place_cursor(&mut self) {
        let board = self.game.session().board();
        self.cursor = board
            .positions()
            .find(|&p| board.get(p).is_some_and(|t| t.is_empty()))
            .unwrap_or(Position::new(0, 0));
        if !self.game.is_completed() {
            self.game.focus(self.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphaclue_core::{
        Clue, ClueKind, DayKey, Puzzle, RevealMapping, RevealMappings, SessionOptions,
    };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(name: &str) -> App {
        let path = std::env::temp_dir()
            .join(format!("alphaclue-app-{}-{}", name, std::process::id()))
            .join("progress.json");
        let _ = std::fs::remove_file(&path);
        let clues = vec![
            Clue::new(ClueKind::StartsWith, 'B', "Flying mammal", "bat"),
            Clue::new(ClueKind::Contains, 'T', "Feline", "cat"),
        ];
        let mut mapping = RevealMapping::new();
        mapping.link_group(&[Position::new(0, 1), Position::new(1, 1)], 4);
        mapping.link_group(&[Position::new(0, 2), Position::new(1, 2)], 17);
        let mappings = RevealMappings {
            easy: mapping.clone(),
            medium: mapping.clone(),
            advanced: mapping,
        };
        let puzzle = Puzzle::new(clues, mappings).unwrap();
        let game = Game::start(
            puzzle,
            DayKey::new(2024, 8, 1).unwrap(),
            SessionOptions::default(),
            FileStorage::open(path),
            SystemClock,
        );
        App::new(game)
    }

    #[test]
    fn test_cursor_starts_on_first_tile() {
        let app = app("cursor");
        assert_eq!(app.cursor, Position::new(0, 0));
        assert_eq!(app.screen_state, ScreenState::Playing);
    }

    #[test]
    fn test_typing_solves_and_locks_screen() {
        let mut app = app("solve");
        let positions: Vec<Position> = app.game.session().board().positions().collect();
        for pos in positions {
            let answer = app.game.session().answer_letter(pos).unwrap();
            if app.game.session().board().value(pos).is_none() {
                app.cursor = pos;
                app.handle_key(key(KeyCode::Char(answer)));
            }
        }
        assert_eq!(app.screen_state, ScreenState::Solved);
        assert!(app
            .message
            .as_deref()
            .is_some_and(|m| m.starts_with("Congratulations!")));

        let before = app.game.session().board().clone();
        app.cursor = Position::new(0, 0);
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.game.session().board(), &before);
    }

    #[test]
    fn test_level_change_waits_for_confirmation() {
        let mut app = app("level");
        app.handle_key(key(KeyCode::F(3)));
        assert_eq!(app.pending_level, Some(Difficulty::Advanced));
        assert_eq!(app.game.session().difficulty(), Difficulty::Easy);

        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.pending_level, None);
        assert_eq!(app.game.session().difficulty(), Difficulty::Easy);

        app.handle_key(key(KeyCode::F(3)));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.game.session().difficulty(), Difficulty::Advanced);
    }

    #[test]
    fn test_medium_switch_needs_no_confirmation() {
        let mut app = app("medium");
        app.handle_key(key(KeyCode::F(2)));
        assert_eq!(app.pending_level, None);
        assert_eq!(app.game.session().difficulty(), Difficulty::Medium);
    }

    #[test]
    fn test_autocheck_toggle() {
        let mut app = app("autocheck");
        app.handle_key(key(KeyCode::F(4)));
        assert!(app.game.session().autocheck());
        app.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert!(!app.game.session().autocheck());
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app("quit");
        assert!(matches!(app.handle_key(key(KeyCode::Esc)), AppAction::Quit));
    }

    #[test]
    fn test_non_letters_are_ignored() {
        let mut app = app("digits");
        app.handle_key(key(KeyCode::Char('7')));
        app.handle_key(key(KeyCode::Char('-')));
        assert_eq!(app.game.session().board().value(Position::new(0, 0)), None);
        assert_eq!(app.cursor, Position::new(0, 0));

        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.game.session().board().value(Position::new(0, 0)), Some('B'));
    }
}
