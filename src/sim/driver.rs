//! Simulation driver
//!
//! Ties the session, the world, and the tick scheduler together and exposes the
//! host-facing surface: pointer input, pause/resume, level-cleared signals,
//! drawing snapshots, and suspend/resume snapshots.

use super::session::GameState;
use super::snapshot::{self, SessionSnapshot};
use super::state::{BubbleId, BubbleView, GameEvent, Playfield, World};
use super::tick::{PendingTick, TickScheduler, TickToken, tick};
use crate::error::{BubbleError, SnapshotError};
use crate::settings::EngineSettings;

/// What a pointer-down did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// An existing bubble was hit and removed
    Popped(BubbleId),
    /// Nothing was hit, so the current level spawned a bubble
    Spawned(BubbleId),
}

/// A running game: one session, its live bubbles, and the tick loop
#[derive(Debug)]
pub struct Simulation {
    session: GameState,
    world: World,
    scheduler: TickScheduler,
    pop_points: u32,
}

impl Simulation {
    /// New simulation, initially paused
    pub fn new(session: GameState, settings: &EngineSettings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Simulation initialized with seed: {}", seed);

        let mut world = World::new(seed);
        world.set_playfield(settings.playfield);
        Self {
            session,
            world,
            scheduler: TickScheduler::new(settings.tick_interval_ms),
            pop_points: settings.pop_points,
        }
    }

    pub fn session(&self) -> &GameState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameState {
        &mut self.session
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn is_paused(&self) -> bool {
        !self.scheduler.is_running()
    }

    /// Stop ticking immediately. In-flight state is kept as is.
    pub fn pause(&mut self) {
        if self.scheduler.pause() {
            log::debug!("Simulation paused at tick {}", self.world.time_ticks);
        }
    }

    /// Restart the tick loop; returns the first scheduled tick
    pub fn resume(&mut self, now: u64) -> PendingTick {
        let pending = self.scheduler.resume(now);
        log::debug!("Simulation resumed, next tick at {}", pending.due_at);
        pending
    }

    /// Run every tick due at `now`. Does nothing while paused.
    pub fn advance(&mut self, now: u64) -> u32 {
        let due = self.scheduler.due_ticks(now);
        for _ in 0..due {
            tick(&mut self.world, &mut self.session);
        }
        due
    }

    /// Host timer callback: run one tick if `token` is still current and
    /// return the next tick to schedule
    pub fn fire(&mut self, token: TickToken, now: u64) -> Option<PendingTick> {
        let next = self.scheduler.fire(token, now)?;
        tick(&mut self.world, &mut self.session);
        Some(next)
    }

    /// Run exactly one tick, bypassing the scheduler (debug stepping)
    pub fn step(&mut self) {
        tick(&mut self.world, &mut self.session);
    }

    /// Pointer pressed at (x, y): pop the topmost bubble there, or spawn one
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<PointerOutcome, BubbleError> {
        if let Some(id) = self.world.hit_test(x, y) {
            self.world.pop(id);
            self.session.add_score(self.pop_points);
            return Ok(PointerOutcome::Popped(id));
        }

        let bubble = self
            .session
            .current_level()
            .spawn(x, y, self.world.rng())?;
        Ok(PointerOutcome::Spawned(self.world.insert(bubble)))
    }

    /// The player cleared the current level
    pub fn level_cleared(&mut self) -> u32 {
        self.session.next_level().number()
    }

    /// Layout measured: enable culling against (0, 0, width, height)
    pub fn set_playfield(&mut self, width: f32, height: f32) {
        self.world.set_playfield(Some(Playfield::new(width, height)));
    }

    /// Layout invalidated: stop culling until it is measured again
    pub fn clear_playfield(&mut self) {
        self.world.set_playfield(None);
    }

    /// Drawing data for every live bubble, bottom to top
    pub fn view(&self) -> Vec<BubbleView> {
        self.world.view()
    }

    /// Session events followed by world events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = self.session.drain_events();
        events.extend(self.world.drain_events());
        events
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        snapshot::capture(&self.world, &self.session)
    }

    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError> {
        snapshot::restore(&mut self.world, &mut self.session, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::LevelFactory;

    fn simulation() -> Simulation {
        let session = GameState::new(Box::new(MemoryStore::new()), LevelFactory::with_defaults());
        let settings = EngineSettings {
            seed: Some(7),
            ..EngineSettings::default()
        };
        Simulation::new(session, &settings)
    }

    #[test]
    fn test_starts_paused() {
        let mut sim = simulation();
        assert!(sim.is_paused());
        sim.pointer_down(50.0, 50.0).unwrap();
        assert_eq!(sim.advance(10_000), 0);
        assert_eq!(sim.view()[0].y, 50.0);
    }

    #[test]
    fn test_pointer_down_spawns_then_pops() {
        let mut sim = simulation();
        let spawned = sim.pointer_down(100.0, 100.0).unwrap();
        let PointerOutcome::Spawned(id) = spawned else {
            panic!("expected a spawn, got {:?}", spawned);
        };
        assert_eq!(sim.view()[0].radius, 32.0);

        assert_eq!(sim.pointer_down(110.0, 90.0).unwrap(), PointerOutcome::Popped(id));
        assert!(sim.view().is_empty());
        assert_eq!(sim.session().score(), 1);
    }

    #[test]
    fn test_advance_runs_due_ticks() {
        let mut sim = simulation();
        sim.pointer_down(100.0, 100.0).unwrap();
        sim.resume(0);
        assert_eq!(sim.advance(35), 3);
        assert_eq!(sim.view()[0].y, 97.0);
    }

    #[test]
    fn test_pause_preserves_state() {
        let mut sim = simulation();
        sim.pointer_down(100.0, 100.0).unwrap();
        let first = sim.resume(0);
        sim.advance(20);
        sim.pause();
        assert_eq!(sim.advance(1_000), 0);
        assert_eq!(sim.fire(first.token, 1_000), None);
        assert_eq!(sim.view()[0].y, 98.0);

        let second = sim.resume(1_000);
        assert!(sim.fire(second.token, 1_010).is_some());
        assert_eq!(sim.view()[0].y, 97.0);
    }

    #[test]
    fn test_level_cleared_advances_session() {
        let mut sim = simulation();
        assert_eq!(sim.level_cleared(), 2);
        assert_eq!(sim.session().achieved_level(), 2);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::AchievedLevelRaised { level: 2 }));
    }

    #[test]
    fn test_snapshot_restore_through_driver() {
        let mut sim = simulation();
        sim.pointer_down(10.0, 10.0).unwrap();
        sim.pointer_down(300.0, 300.0).unwrap();
        let snapshot = sim.snapshot();

        let mut resumed = simulation();
        resumed.restore(&snapshot).unwrap();
        assert_eq!(resumed.snapshot(), snapshot);
        assert_eq!(resumed.view().len(), 2);
    }
}
