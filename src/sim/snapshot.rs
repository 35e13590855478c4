//! Session snapshots for suspend/resume
//!
//! Bubbles and session progress are flattened into plain serde records. The
//! achieved level is not part of a snapshot: it already lives in the progress
//! store.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble::Bubble;
use super::session::GameState;
use super::state::World;
use crate::error::{BubbleError, SnapshotError};

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Flat bubble record. The squared radius is derived and not stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleRecord {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_step: f32,
    pub step_x: f32,
    pub step_y: f32,
}

impl From<&Bubble> for BubbleRecord {
    fn from(bubble: &Bubble) -> Self {
        let center = bubble.center();
        let step = bubble.center_step();
        Self {
            center_x: center.x,
            center_y: center.y,
            radius: bubble.radius(),
            rotation: bubble.rotation(),
            rotation_step: bubble.rotation_step(),
            step_x: step.x,
            step_y: step.y,
        }
    }
}

impl TryFrom<BubbleRecord> for Bubble {
    type Error = BubbleError;

    fn try_from(record: BubbleRecord) -> Result<Self, Self::Error> {
        Bubble::from_parts(
            Vec2::new(record.center_x, record.center_y),
            record.radius,
            record.rotation,
            Vec2::new(record.step_x, record.step_y),
            record.rotation_step,
        )
    }
}

/// Everything needed to rebuild a running session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub current_level: u32,
    pub score: u64,
    /// Live bubbles in draw order
    pub bubbles: Vec<BubbleRecord>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version(snapshot.version));
        }
        Ok(snapshot)
    }
}

/// Capture the live bubbles and session progress
pub fn capture(world: &World, session: &GameState) -> SessionSnapshot {
    SessionSnapshot {
        version: SNAPSHOT_VERSION,
        current_level: session.current_level().number(),
        score: session.score(),
        bubbles: world
            .bubbles()
            .iter()
            .map(|live| BubbleRecord::from(&live.bubble))
            .collect(),
    }
}

/// Replace the world's bubbles and the session's level/score with `snapshot`
///
/// Everything is validated before anything is changed, so a failed restore
/// leaves both untouched.
pub fn restore(
    world: &mut World,
    session: &mut GameState,
    snapshot: &SessionSnapshot,
) -> Result<(), SnapshotError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Version(snapshot.version));
    }
    let bubbles = snapshot
        .bubbles
        .iter()
        .map(|&record| Bubble::try_from(record))
        .collect::<Result<Vec<_>, _>>()?;
    session.set_current_level(snapshot.current_level)?;
    session.set_score(snapshot.score);

    world.clear();
    for bubble in bubbles {
        world.insert(bubble);
    }
    log::info!(
        "Restored {} bubbles at level {}",
        world.len(),
        session.current_level().number()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LevelError;
    use crate::persistence::MemoryStore;
    use crate::sim::LevelFactory;
    use crate::sim::session::ACHIEVED_LEVEL_KEY;
    use proptest::prelude::*;

    fn session(achieved: u32) -> GameState {
        GameState::new(
            Box::new(MemoryStore::with_value(ACHIEVED_LEVEL_KEY, achieved)),
            LevelFactory::with_defaults(),
        )
    }

    fn sample_bubble() -> Bubble {
        let mut bubble = Bubble::new(12.5, 40.0, 9.0).unwrap();
        bubble
            .set_rotation(45.0)
            .unwrap()
            .set_rotation_step(2.0)
            .unwrap()
            .set_center_step(0.5, -1.0)
            .unwrap();
        bubble
    }

    #[test]
    fn test_record_round_trip_preserves_state() {
        let bubble = sample_bubble();
        let restored = Bubble::try_from(BubbleRecord::from(&bubble)).unwrap();
        assert_eq!(restored.center(), bubble.center());
        assert_eq!(restored.radius(), bubble.radius());
        assert_eq!(restored.rotation(), bubble.rotation());
        assert_eq!(restored.center_step(), bubble.center_step());
        assert_eq!(restored.rotation_step(), bubble.rotation_step());
        assert_eq!(restored.squared_radius(), 81.0);
    }

    #[test]
    fn test_invalid_record_rejected() {
        let mut record = BubbleRecord::from(&sample_bubble());
        record.radius = -3.0;
        assert_eq!(
            Bubble::try_from(record),
            Err(BubbleError::InvalidRadius(-3.0))
        );
    }

    #[test]
    fn test_capture_and_restore_session() {
        let mut world = World::new(3);
        let mut state = session(5);
        state.set_current_level(4).unwrap();
        state.add_score(120);
        world.insert(sample_bubble());
        world.insert(Bubble::new(1.0, 2.0, 3.0).unwrap());

        let json = capture(&world, &state).to_json().unwrap();

        let mut fresh_world = World::new(9);
        let mut fresh_state = session(5);
        let snapshot = SessionSnapshot::from_json(&json).unwrap();
        restore(&mut fresh_world, &mut fresh_state, &snapshot).unwrap();

        assert_eq!(fresh_state.current_level().number(), 4);
        assert_eq!(fresh_state.score(), 120);
        assert_eq!(fresh_world.len(), 2);
        assert_eq!(capture(&fresh_world, &fresh_state), snapshot);
    }

    #[test]
    fn test_restore_locked_level_changes_nothing() {
        let mut world = World::new(3);
        let mut state = session(5);
        state.set_current_level(5).unwrap();
        world.insert(sample_bubble());
        let snapshot = capture(&world, &state);

        let mut other_world = World::new(3);
        let mut other_state = session(2);
        let err = restore(&mut other_world, &mut other_state, &snapshot).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Level(LevelError::LevelLocked { requested: 5, achieved: 2 })
        ));
        assert!(other_world.is_empty());
        assert_eq!(other_state.current_level().number(), 1);
    }

    #[test]
    fn test_repeated_restore_reuses_ids() {
        let mut world = World::new(3);
        let state = session(5);
        world.insert(sample_bubble());
        world.insert(Bubble::new(1.0, 2.0, 3.0).unwrap());
        let snapshot = capture(&world, &state);

        let mut target_world = World::new(9);
        let mut target_state = session(5);
        restore(&mut target_world, &mut target_state, &snapshot).unwrap();
        let first: Vec<_> = target_world.view().iter().map(|v| v.id).collect();
        restore(&mut target_world, &mut target_state, &snapshot).unwrap();
        let second: Vec<_> = target_world.view().iter().map(|v| v.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let json = r#"{"version":9,"current_level":1,"score":0,"bubbles":[]}"#;
        assert!(matches!(
            SessionSnapshot::from_json(json),
            Err(SnapshotError::Version(9))
        ));
    }

    proptest! {
        #[test]
        fn prop_restored_bubble_answers_queries_identically(
            cx in -500.0f32..500.0,
            cy in -500.0f32..500.0,
            r in 0.5f32..100.0,
            px in -700.0f32..700.0,
            py in -700.0f32..700.0,
            w in 1.0f32..800.0,
            h in 1.0f32..800.0,
        ) {
            let bubble = Bubble::new(cx, cy, r).unwrap();
            let json = serde_json::to_string(&BubbleRecord::from(&bubble)).unwrap();
            let record: BubbleRecord = serde_json::from_str(&json).unwrap();
            let restored = Bubble::try_from(record).unwrap();
            prop_assert_eq!(restored.contains(px, py), bubble.contains(px, py));
            prop_assert_eq!(
                restored.intersects(0.0, 0.0, w, h),
                bubble.intersects(0.0, 0.0, w, h)
            );
        }
    }
}
