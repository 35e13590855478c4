//! Fixed interval simulation tick
//!
//! `tick` advances the world by one step. `TickScheduler` decides when ticks are
//! due: it owns a cancellation token, so pausing drops the token and resuming
//! issues a fresh one. A host timer holding a stale token can never restart a
//! paused loop.

use super::session::GameState;
use super::state::World;
use crate::consts::*;

/// Advance the world by one tick
///
/// Bubbles that no longer overlap the playfield are marked and removed after
/// every other bubble has been stepped; a bubble that just left is culled on the
/// following tick. Without known playfield bounds nothing is culled.
pub fn tick(world: &mut World, session: &mut GameState) {
    world.time_ticks += 1;

    let playfield = world.playfield();
    let mut culled = Vec::new();
    for live in world.bubbles_mut() {
        if let Some(playfield) = playfield
            && !playfield.overlaps(&live.bubble)
        {
            culled.push(live.id);
            continue;
        }
        live.bubble.step();
    }
    // Ids wrap, so spawn order is not guaranteed to be id order
    culled.sort_unstable();
    world.cull(&culled);

    if session.has_pending_flush() && world.time_ticks.is_multiple_of(FLUSH_RETRY_TICKS) {
        session.flush_progress();
    }
}

/// Identifies one run of the tick loop (between a resume and a pause)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// The next scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTick {
    pub token: TickToken,
    /// Time (ms) at which the tick is due
    pub due_at: u64,
}

/// Self-rescheduling fixed interval scheduler
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval_ms: u64,
    pending: Option<PendingTick>,
    generation: u64,
}

impl TickScheduler {
    /// Scheduler starts paused
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            pending: None,
            generation: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<PendingTick> {
        self.pending
    }

    /// Start ticking; the first tick is due one interval after `now`.
    /// Resuming a running scheduler keeps its current schedule.
    pub fn resume(&mut self, now: u64) -> PendingTick {
        if let Some(pending) = self.pending {
            return pending;
        }
        self.generation += 1;
        let pending = PendingTick {
            token: TickToken(self.generation),
            due_at: now.saturating_add(self.interval_ms),
        };
        self.pending = Some(pending);
        pending
    }

    /// Stop scheduling ticks. Returns whether the scheduler was running.
    pub fn pause(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_current(&self, token: TickToken) -> bool {
        self.pending.is_some_and(|pending| pending.token == token)
    }

    /// Number of ticks due at `now`, rescheduling past them
    ///
    /// Catch-up is capped at `MAX_SUBSTEPS`; any remaining backlog is dropped
    /// to prevent a spiral of death after a long stall.
    pub fn due_ticks(&mut self, now: u64) -> u32 {
        let interval = self.interval_ms;
        let Some(pending) = self.pending.as_mut() else {
            return 0;
        };

        let mut due = 0;
        while pending.due_at <= now && due < MAX_SUBSTEPS {
            pending.due_at += interval;
            due += 1;
        }
        if pending.due_at <= now {
            log::debug!("Dropping tick backlog of {} ms", now - pending.due_at);
            pending.due_at = now + interval;
        }
        due
    }

    /// Consume a host timer callback. Returns the next tick to schedule, or
    /// `None` when the token is stale (the loop was paused meanwhile).
    pub fn fire(&mut self, token: TickToken, now: u64) -> Option<PendingTick> {
        let pending = self.pending.as_mut().filter(|p| p.token == token)?;
        pending.due_at = now.saturating_add(self.interval_ms);
        Some(*pending)
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL_MS)
    }
}
