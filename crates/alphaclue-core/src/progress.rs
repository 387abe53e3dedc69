//! Day-keyed persistence of sessions over a key-value store.

use crate::{
    Board, Clue, DayKey, Difficulty, Error, GameSession, Position, Puzzle, Result, RevealMappings,
    TileState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Saved-state schema version
pub const SAVE_VERSION: u32 = 1;

const LAST_PLAYED_KEY: &str = "lastPlayedDate";
const STATE_PREFIX: &str = "gameState-";
const ELAPSED_PREFIX: &str = "totalElapsedTime-";

/// Durable string key-value storage (browser `localStorage`, a JSON file, memory)
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-memory storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

pub fn state_key(day: DayKey) -> String {
    format!("{}{}", STATE_PREFIX, day)
}

pub fn elapsed_key(day: DayKey) -> String {
    format!("{}{}", ELAPSED_PREFIX, day)
}

/// One persisted tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTile {
    pub clue_index: usize,
    pub tile_index: usize,
    #[serde(default)]
    pub value: Option<char>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub revealed: bool,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub incorrect: bool,
}

/// Everything needed to resume a day's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub version: u32,
    pub day: DayKey,
    pub clues: Vec<Clue>,
    pub reveal_mappings: RevealMappings,
    pub difficulty_level: Difficulty,
    pub autocheck: bool,
    pub tiles: Vec<SavedTile>,
    pub elapsed_time_ms: u64,
    pub is_completed: bool,
    #[serde(default)]
    pub completion_time_ms: Option<u64>,
}

impl SavedSession {
    /// Snapshot `session` with `elapsed_ms` as the accumulated time
    pub fn capture(session: &GameSession, elapsed_ms: u64) -> Self {
        let tiles = session
            .board()
            .iter()
            .map(|(pos, tile)| SavedTile {
                clue_index: pos.clue,
                tile_index: pos.letter,
                value: tile.value,
                disabled: tile.disabled,
                revealed: tile.revealed,
                correct: tile.correct,
                incorrect: tile.incorrect,
            })
            .collect();

        Self {
            version: SAVE_VERSION,
            day: session.day(),
            clues: session.clues().to_vec(),
            reveal_mappings: session.puzzle().reveal_mappings().clone(),
            difficulty_level: session.difficulty(),
            autocheck: session.autocheck(),
            tiles,
            elapsed_time_ms: elapsed_ms,
            is_completed: session.is_completed(),
            completion_time_ms: session.completion_time_ms(),
        }
    }

    /// Rebuild the session. The tile list must cover the clue shape exactly.
    pub fn into_session(self) -> Result<GameSession> {
        if self.version != SAVE_VERSION {
            return Err(Error::MalformedState(format!(
                "unsupported version {}",
                self.version
            )));
        }
        let puzzle = Puzzle::new(self.clues, self.reveal_mappings)
            .map_err(|e| Error::MalformedState(e.to_string()))?;

        let mut board = Board::new(&puzzle.clue_lengths());
        if self.tiles.len() != board.tile_count() {
            return Err(Error::MalformedState(format!(
                "expected {} tiles, found {}",
                board.tile_count(),
                self.tiles.len()
            )));
        }
        for saved in self.tiles {
            let pos = Position::new(saved.clue_index, saved.tile_index);
            let tile = board
                .get_mut(pos)
                .ok_or_else(|| Error::MalformedState(format!("tile {} out of range", pos)))?;
            *tile = TileState {
                value: saved.value,
                disabled: saved.disabled,
                revealed: saved.revealed,
                correct: saved.correct,
                incorrect: saved.incorrect,
                highlighted: false,
            };
        }

        Ok(GameSession::from_parts(
            self.day,
            self.difficulty_level,
            self.autocheck,
            puzzle,
            board,
            self.elapsed_time_ms,
            self.is_completed,
            self.completion_time_ms,
        ))
    }
}

/// Reads and writes sessions under `gameState-<day>` / `totalElapsedTime-<day>`
pub struct ProgressStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ProgressStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Fold running time into the session and write it out
    pub fn save(&mut self, session: &mut GameSession, now_ms: u64) -> Result<()> {
        let elapsed = session.stopwatch_mut().checkpoint(now_ms);
        let day = session.day();
        let saved = SavedSession::capture(session, elapsed);
        let json = serde_json::to_string(&saved).map_err(|e| Error::Storage(e.to_string()))?;

        self.storage.set_item(&state_key(day), &json)?;
        self.storage.set_item(&elapsed_key(day), &elapsed.to_string())?;
        self.storage.set_item(LAST_PLAYED_KEY, &day.to_string())?;
        Ok(())
    }

    /// Saved session for `today`, if one exists and is usable.
    ///
    /// Rolling over to a new day first discards every other day's keys.
    pub fn load(&mut self, today: DayKey) -> Option<SavedSession> {
        let today_str = today.to_string();
        if self.storage.get_item(LAST_PLAYED_KEY).as_deref() != Some(today_str.as_str()) {
            self.discard_other_days(today);
            if let Err(e) = self.storage.set_item(LAST_PLAYED_KEY, &today_str) {
                log::warn!("could not record last played date: {}", e);
            }
        }

        let raw = self.storage.get_item(&state_key(today))?;
        let mut saved: SavedSession = match serde_json::from_str(&raw) {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("ignoring malformed saved state for {}: {}", today, e);
                return None;
            }
        };
        if saved.day != today {
            log::warn!("saved state under {} is for {}, ignoring", today, saved.day);
            return None;
        }
        if let Some(elapsed) = self
            .storage
            .get_item(&elapsed_key(today))
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            saved.elapsed_time_ms = elapsed;
        }
        Some(saved)
    }

    /// Load and rebuild today's session; unusable state counts as absent
    pub fn restore(&mut self, today: DayKey) -> Option<GameSession> {
        match self.load(today)?.into_session() {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("discarding saved state for {}: {}", today, e);
                None
            }
        }
    }

    /// Remove the saved session for `day`
    pub fn clear(&mut self, day: DayKey) {
        self.storage.remove_item(&state_key(day));
        self.storage.remove_item(&elapsed_key(day));
    }

    fn discard_other_days(&mut self, today: DayKey) {
        let keep_state = state_key(today);
        let keep_elapsed = elapsed_key(today);
        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(STATE_PREFIX) || k.starts_with(ELAPSED_PREFIX))
            .filter(|k| *k != keep_state && *k != keep_elapsed)
            .collect();
        if !stale.is_empty() {
            log::info!("day rolled over to {}, discarding {} stale keys", today, stale.len());
        }
        for key in stale {
            self.storage.remove_item(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClueKind, SessionOptions, TileEngine};

    fn day(d: u8) -> DayKey {
        DayKey::new(2024, 10, d).unwrap()
    }

    fn session(on: DayKey) -> GameSession {
        let clues = vec![
            Clue::new(ClueKind::Contains, 'A', "", "art"),
            Clue::new(ClueKind::StartsWith, 'B', "", "bee"),
        ];
        let puzzle = Puzzle::new(clues, RevealMappings::default()).unwrap();
        GameSession::new(on, puzzle, SessionOptions::default())
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        let mut s = session(day(3));
        TileEngine::input(&mut s, Position::new(1, 2), "e");
        s.stopwatch_mut().start(1_000);
        store.save(&mut s, 4_000).unwrap();

        let restored = store.restore(day(3)).unwrap();
        assert_eq!(restored.board().value(Position::new(1, 2)), Some('E'));
        assert_eq!(restored.stopwatch().elapsed_ms(0), 3_000);
        assert_eq!(
            store.storage().get_item("totalElapsedTime-2024-10-03").as_deref(),
            Some("3000")
        );
        assert_eq!(store.storage().get_item("lastPlayedDate").as_deref(), Some("2024-10-03"));
    }

    #[test]
    fn test_elapsed_key_takes_precedence() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        let mut s = session(day(3));
        store.save(&mut s, 0).unwrap();
        store.storage.set_item(&elapsed_key(day(3)), "90000").unwrap();
        assert_eq!(store.load(day(3)).unwrap().elapsed_time_ms, 90_000);
    }

    #[test]
    fn test_rollover_discards_previous_days() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        let mut s = session(day(3));
        store.save(&mut s, 0).unwrap();
        store.storage.set_item("unrelated", "x").unwrap();

        assert!(store.load(day(4)).is_none());
        assert!(store.storage().get_item(&state_key(day(3))).is_none());
        assert!(store.storage().get_item(&elapsed_key(day(3))).is_none());
        assert_eq!(store.storage().get_item("unrelated").as_deref(), Some("x"));
        assert_eq!(store.storage().get_item("lastPlayedDate").as_deref(), Some("2024-10-04"));
    }

    #[test]
    fn test_malformed_state_is_absent() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        store.storage.set_item(LAST_PLAYED_KEY, "2024-10-03").unwrap();
        store.storage.set_item(&state_key(day(3)), "{not json").unwrap();
        assert!(store.restore(day(3)).is_none());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let s = session(day(3));
        let mut saved = SavedSession::capture(&s, 0);
        saved.tiles.pop();
        assert!(matches!(saved.into_session(), Err(Error::MalformedState(_))));

        let mut saved = SavedSession::capture(&s, 0);
        saved.version = 99;
        assert!(matches!(saved.into_session(), Err(Error::MalformedState(_))));
    }
}
