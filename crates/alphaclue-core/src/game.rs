//! Event-driven controller: one session, its store and a clock.

use crate::{
    ClueView, Clock, CompletionStatus, DayKey, Difficulty, GameSession, Key, Position,
    ProgressStore, Puzzle, SessionOptions, Storage, TileEngine,
};

/// Outcome of an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReport {
    /// Tile that should take focus next
    pub focus: Option<Position>,
    pub status: CompletionStatus,
}

/// A day's game wired to persistence and time
pub struct Game<S: Storage, C: Clock> {
    session: GameSession,
    store: ProgressStore<S>,
    clock: C,
    focus: Option<Position>,
    visible: bool,
}

impl<S: Storage, C: Clock> Game<S, C> {
    /// Resume today's saved session, or begin a fresh one, and start the clock.
    ///
    /// A saved session for a different clue set is discarded.
    pub fn start(
        puzzle: Puzzle,
        today: DayKey,
        options: SessionOptions,
        storage: S,
        clock: C,
    ) -> Self {
        let mut store = ProgressStore::new(storage);
        let session = match store.restore(today) {
            Some(saved) if saved.clues() == puzzle.clues() => {
                log::info!("resuming {} at {}", today, saved.difficulty());
                saved
            }
            Some(_) => {
                log::warn!("saved clues for {} differ from the puzzle, starting over", today);
                GameSession::new(today, puzzle, options)
            }
            None => GameSession::new(today, puzzle, options),
        };

        let mut game = Self {
            session,
            store,
            clock,
            focus: None,
            visible: true,
        };
        if !game.session.is_completed() {
            let now = game.clock.now_ms();
            game.session.stopwatch_mut().start(now);
        }
        game.save();
        game
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn focused(&self) -> Option<Position> {
        self.focus
    }

    pub fn is_completed(&self) -> bool {
        self.session.is_completed()
    }

    /// Type at `pos`, then evaluate and persist
    pub fn input(&mut self, pos: Position, raw: &str) -> InputReport {
        if self.session.is_completed() {
            return InputReport {
                focus: None,
                status: CompletionStatus::Solved,
            };
        }
        let focus = TileEngine::input(&mut self.session, pos, raw);
        let now = self.clock.now_ms();
        let status = self.session.check_completion(now);
        if let Some(next) = focus.filter(|_| !status.is_solved()) {
            self.focus(next);
        }
        self.save();
        InputReport { focus, status }
    }

    /// Backspace, Delete or an arrow key at `pos`
    pub fn key(&mut self, pos: Position, key: Key) -> Option<Position> {
        let focus = TileEngine::key(&mut self.session, pos, key);
        if let Some(next) = focus {
            self.focus(next);
        }
        if matches!(key, Key::Backspace | Key::Delete) {
            self.save();
        }
        focus
    }

    pub fn focus(&mut self, pos: Position) {
        TileEngine::focus(&mut self.session, pos);
        self.focus = Some(pos);
    }

    pub fn blur(&mut self, pos: Position) {
        TileEngine::blur(&mut self.session, pos);
        if self.focus == Some(pos) {
            self.focus = None;
        }
    }

    /// Turn live checking on or off.
    ///
    /// Turning it on re-propagates every letter, which can finish the board.
    pub fn set_autocheck(&mut self, on: bool) -> CompletionStatus {
        TileEngine::set_autocheck(&mut self.session, on);
        let status = self.session.check_completion(self.clock.now_ms());
        self.save();
        status
    }

    /// Switch level. Tiles and completion reset; the clock keeps its total.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !self.session.set_difficulty(difficulty) {
            return false;
        }
        log::info!("difficulty changed to {}", difficulty);
        self.focus = None;
        if self.visible {
            let now = self.clock.now_ms();
            self.session.stopwatch_mut().start(now);
        }
        self.save();
        true
    }

    /// Periodic save of the running clock
    pub fn tick(&mut self) {
        if self.session.stopwatch().is_running() {
            self.save();
        }
    }

    /// Page or terminal hidden/shown: pause or resume the clock and persist
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        let now = self.clock.now_ms();
        if visible {
            if !self.session.is_completed() {
                self.session.stopwatch_mut().start(now);
            }
        } else {
            self.session.stopwatch_mut().stop(now);
        }
        self.save();
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.session.stopwatch().elapsed_ms(self.clock.now_ms())
    }

    pub fn status(&self) -> CompletionStatus {
        if self.session.is_completed() {
            CompletionStatus::Solved
        } else {
            self.session.evaluate().status()
        }
    }

    pub fn views(&self) -> Vec<ClueView> {
        self.session.views()
    }

    fn save(&mut self) {
        let now = self.clock.now_ms();
        if let Err(e) = self.store.save(&mut self.session, now) {
            log::error!("failed to save progress for {}: {}", self.session.day(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clue, ClueKind, ManualClock, MemoryStorage, RevealMapping, RevealMappings};

    fn puzzle() -> Puzzle {
        Puzzle::new(
            vec![Clue::new(ClueKind::StartsWith, 'O', "Cattle", "ox")],
            RevealMappings::default(),
        )
        .unwrap()
    }

    fn today() -> DayKey {
        DayKey::new(2024, 11, 2).unwrap()
    }

    #[test]
    fn test_hidden_time_not_counted() {
        let clock = ManualClock::new(0);
        let mut game = Game::start(
            puzzle(),
            today(),
            SessionOptions::default(),
            MemoryStorage::new(),
            clock.clone(),
        );
        clock.advance(10_000);
        game.set_visible(false);
        clock.advance(60_000);
        game.set_visible(true);
        clock.advance(5_000);
        assert_eq!(game.elapsed_ms(), 15_000);
    }

    #[test]
    fn test_resume_from_storage() {
        let clock = ManualClock::new(0);
        let mut game = Game::start(
            puzzle(),
            today(),
            SessionOptions::default(),
            MemoryStorage::new(),
            clock.clone(),
        );
        game.input(Position::new(0, 0), "o");
        clock.advance(7_000);
        game.tick();

        let storage = game.store().storage().clone();
        let resumed = Game::start(
            puzzle(),
            today(),
            SessionOptions::default(),
            storage,
            clock.clone(),
        );
        assert_eq!(resumed.session().board().value(Position::new(0, 0)), Some('O'));
        assert_eq!(resumed.elapsed_ms(), 7_000);
    }

    #[test]
    fn test_completed_session_ignores_input() {
        let clock = ManualClock::new(0);
        let mut game = Game::start(
            puzzle(),
            today(),
            SessionOptions::default(),
            MemoryStorage::new(),
            clock.clone(),
        );
        game.input(Position::new(0, 0), "O");
        clock.advance(3_000);
        let report = game.input(Position::new(0, 1), "X");
        assert!(report.status.is_solved());
        assert_eq!(game.session().completion_time_ms(), Some(3_000));

        let report = game.input(Position::new(0, 1), "Q");
        assert_eq!(report.focus, None);
        assert_eq!(game.session().board().value(Position::new(0, 1)), Some('X'));
        assert_eq!(game.key(Position::new(0, 1), Key::Backspace), None);
    }

    #[test]
    fn test_autocheck_toggle_completes_filled_board() {
        let clues = vec![
            Clue::new(ClueKind::StartsWith, 'C', "Taxi", "ca"),
            Clue::new(ClueKind::StartsWith, 'B', "Sheep's call", "ba"),
            Clue::new(ClueKind::StartsWith, 'T', "Musical note", "ta"),
        ];
        let cycle = [Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)];
        let mut mapping = RevealMapping::new();
        mapping.link_group(&cycle, 12);
        let mappings = RevealMappings {
            easy: mapping.clone(),
            medium: mapping.clone(),
            advanced: mapping,
        };
        let clock = ManualClock::new(0);
        let mut game = Game::start(
            Puzzle::new(clues, mappings).unwrap(),
            today(),
            SessionOptions::default(),
            MemoryStorage::new(),
            clock.clone(),
        );

        game.input(Position::new(0, 0), "C");
        game.input(Position::new(1, 0), "B");
        game.input(Position::new(2, 0), "T");
        game.input(cycle[0], "A");
        game.key(cycle[1], Key::Backspace);
        game.input(cycle[2], "A");
        assert_eq!(game.session().board().value(cycle[1]), None);
        assert!(!game.is_completed());

        clock.advance(4_000);
        let status = game.set_autocheck(true);
        assert!(status.is_solved());
        assert!(game.is_completed());
        assert_eq!(game.session().completion_time_ms(), Some(4_000));
        assert!(!game.session().stopwatch().is_running());

        clock.advance(60_000);
        assert_eq!(game.elapsed_ms(), 4_000);
    }
}
