//! Session progress: current level, score, and the achieved-level high-water mark
//!
//! The achieved level only ever grows. It is read from the progress store when
//! the session is created and written through on every increase; a failed
//! write stays pending and is retried by [`GameState::flush_progress`], while
//! the in-memory value remains authoritative. When the initial read fails the
//! stored value is unknown, and nothing is written until a later read confirms
//! the store does not already hold a higher level.

use super::level::{Level, LevelFactory};
use super::state::GameEvent;
use crate::error::{LevelError, StoreError};
use crate::persistence::ProgressStore;

/// Progress store key for the achieved level
pub const ACHIEVED_LEVEL_KEY: &str = "achieved_level";

/// Level every session starts on
pub const FIRST_LEVEL: u32 = 1;

/// One play session
pub struct GameState {
    achieved_level: u32,
    current_level: Level,
    score: u64,
    levels: LevelFactory,
    store: Box<dyn ProgressStore>,
    /// Achieved level not yet confirmed by the store
    pending_flush: Option<u32>,
    /// False until the store has been read successfully
    stored_known: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a session, reading the achieved level from `store` (default 1)
    pub fn new(store: Box<dyn ProgressStore>, levels: LevelFactory) -> Self {
        let current_level = levels.create_level(FIRST_LEVEL);
        let (achieved_level, stored_known) = match read_stored(&*store) {
            Ok(level) => (level.max(current_level.number()), true),
            Err(err) => {
                log::warn!("Could not read achieved level, starting at 1: {}", err);
                (current_level.number(), false)
            }
        };
        log::info!("Session created, achieved level {}", achieved_level);

        Self {
            achieved_level,
            current_level,
            score: 0,
            levels,
            store,
            pending_flush: None,
            stored_known,
            events: Vec::new(),
        }
    }

    pub fn achieved_level(&self) -> u32 {
        self.achieved_level
    }

    pub fn current_level(&self) -> &Level {
        &self.current_level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level_factory(&self) -> &LevelFactory {
        &self.levels
    }

    /// Is `level` selectable by the player?
    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= FIRST_LEVEL && level <= self.achieved_level
    }

    /// Jump to an already achieved level
    pub fn set_current_level(&mut self, level: u32) -> Result<&Level, LevelError> {
        if level == 0 {
            return Err(LevelError::IllegalLevel(level));
        }
        if level > self.achieved_level {
            return Err(LevelError::LevelLocked {
                requested: level,
                achieved: self.achieved_level,
            });
        }
        self.current_level = self.levels.create_level(level);
        self.events.push(GameEvent::LevelChanged {
            level: self.current_level.number(),
        });
        Ok(&self.current_level)
    }

    /// Advance one level, raising (and persisting) the achieved level if needed
    pub fn next_level(&mut self) -> &Level {
        let next = self.current_level.number().saturating_add(1);
        self.current_level = self.levels.create_level(next);
        let number = self.current_level.number();
        log::info!("Moved to level {}", number);
        self.events.push(GameEvent::LevelChanged { level: number });

        if number > self.achieved_level {
            self.achieved_level = number;
            self.events.push(GameEvent::AchievedLevelRaised { level: number });
            self.pending_flush = Some(number);
            self.flush_progress();
        }
        &self.current_level
    }

    /// Retry a pending achieved-level write, re-reading the store first if
    /// its value is still unknown. Returns true when nothing is pending.
    pub fn flush_progress(&mut self) -> bool {
        if !self.stored_known && !self.reload_stored() {
            return false;
        }
        let Some(level) = self.pending_flush else {
            return true;
        };
        match self.store.put(ACHIEVED_LEVEL_KEY, level) {
            Ok(()) => {
                self.pending_flush = None;
                true
            }
            Err(err) => {
                log::warn!("Could not persist achieved level {}: {}", level, err);
                false
            }
        }
    }

    /// Adopt the stored achieved level after an earlier failed read
    fn reload_stored(&mut self) -> bool {
        let stored = match read_stored(&*self.store) {
            Ok(stored) => stored,
            Err(err) => {
                log::warn!("Achieved level still unreadable: {}", err);
                return false;
            }
        };
        self.stored_known = true;
        if stored > self.achieved_level {
            log::info!("Recovered stored achieved level {}", stored);
            self.achieved_level = stored;
            self.events.push(GameEvent::AchievedLevelRaised { level: stored });
        }
        if stored >= self.achieved_level {
            self.pending_flush = None;
        }
        true
    }

    /// True while a write is outstanding or the stored value is unknown
    pub fn has_pending_flush(&self) -> bool {
        self.pending_flush.is_some() || !self.stored_known
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(u64::from(points));
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    pub fn reset_score(&mut self) {
        self.set_score(0);
    }

    /// Used when restoring a snapshot
    pub(crate) fn set_score(&mut self, score: u64) {
        self.score = score;
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Stored achieved level, 0 when absent. Corrupt data cannot be recovered by
/// retrying, so it reads as absent and the next write replaces it.
fn read_stored(store: &dyn ProgressStore) -> Result<u32, StoreError> {
    match store.get(ACHIEVED_LEVEL_KEY) {
        Ok(stored) => Ok(stored.unwrap_or(0)),
        Err(StoreError::Json(err)) => {
            log::warn!("Stored achieved level is corrupt, ignoring it: {}", err);
            Ok(0)
        }
        Err(err) => Err(err),
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("achieved_level", &self.achieved_level)
            .field("current_level", &self.current_level.number())
            .field("score", &self.score)
            .field("pending_flush", &self.pending_flush)
            .field("stored_known", &self.stored_known)
            .finish()
    }
}
