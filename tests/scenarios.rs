//! End-to-end scenarios for the public engine API

use bubbles::EngineSettings;
use bubbles::error::ConfigErrorKind;
use bubbles::error::LevelError;
use bubbles::persistence::{JsonFileStore, MemoryStore, ProgressStore};
use bubbles::sim::{
    ACHIEVED_LEVEL_KEY, Bubble, DEFAULT_MAX_LEVEL, DEFAULT_RADIUS, GameEvent, GameState,
    LevelFactory, Playfield, PointerOutcome, SessionSnapshot, Simulation, SizeGenerator,
    StrategyTable, World, tick,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn settings() -> EngineSettings {
    EngineSettings {
        seed: Some(2024),
        ..EngineSettings::default()
    }
}

#[test]
fn scenario_a_sizes_follow_the_strategy_table() {
    let factory =
        LevelFactory::load_or_default(["1-10 Constant 32", "10-100 RandomInFixedInterval 16 48"]);
    let mut rng = Pcg32::seed_from_u64(5);

    let small = factory.create_level(5).spawn(0.0, 0.0, &mut rng).unwrap();
    assert_eq!(small.radius(), 32.0);

    for _ in 0..100 {
        let radius = factory.create_level(50).spawn(0.0, 0.0, &mut rng).unwrap().radius();
        assert!((16.0..48.0).contains(&radius), "radius {} out of range", radius);
    }
    // 50 is beyond the default max level, so it resolves as level 40
    assert_eq!(factory.create_level(50).number(), DEFAULT_MAX_LEVEL);
}

#[test]
fn scenario_b_level_gating_and_progress() {
    let mut state = GameState::new(Box::new(MemoryStore::new()), LevelFactory::with_defaults());
    assert_eq!(state.achieved_level(), 1);
    assert_eq!(
        state.set_current_level(2).unwrap_err(),
        LevelError::LevelLocked {
            requested: 2,
            achieved: 1
        }
    );

    assert_eq!(state.next_level().number(), 2);
    assert_eq!(state.achieved_level(), 2);
    assert_eq!(state.set_current_level(2).unwrap().number(), 2);
}

#[test]
fn scenario_c_bubble_leaves_the_playfield() {
    let mut bubble = Bubble::new(100.0, 100.0, 10.0).unwrap();
    bubble.set_center_step(0.0, -1.0).unwrap();
    assert!(bubble.intersects(0.0, 0.0, 200.0, 200.0));
    for _ in 0..250 {
        bubble.step();
    }
    assert_eq!(bubble.center().y, -150.0);
    assert!(!bubble.intersects(0.0, 0.0, 200.0, 200.0));

    let mut world = World::new(1);
    world.set_playfield(Some(Playfield::new(200.0, 200.0)));
    let id = world.insert(bubble);
    let mut state = GameState::new(Box::new(MemoryStore::new()), LevelFactory::with_defaults());
    tick(&mut world, &mut state);
    assert!(world.is_empty());
    assert!(world.drain_events().contains(&GameEvent::BubbleCulled { id }));
}

#[test]
fn scenario_d_malformed_config_falls_back_to_default() {
    let err = StrategyTable::load(["abc Constant"]).unwrap_err();
    assert!(matches!(err.kind, ConfigErrorKind::MalformedInterval(_)));

    let factory = LevelFactory::load_or_default(["abc Constant"]);
    for level in 1..=DEFAULT_MAX_LEVEL {
        assert_eq!(
            factory.create_level(level).size_generator(),
            SizeGenerator::Constant {
                value: DEFAULT_RADIUS
            }
        );
    }
}

#[test]
fn achieved_level_survives_a_restart() {
    let path = std::env::temp_dir().join(format!("bubbles-progress-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        let store = JsonFileStore::new(&path);
        let mut state = GameState::new(Box::new(store), LevelFactory::with_defaults());
        state.next_level();
        state.next_level();
        assert_eq!(state.achieved_level(), 3);
    }

    let store = JsonFileStore::new(&path);
    assert_eq!(store.get(ACHIEVED_LEVEL_KEY).unwrap(), Some(3));
    let mut state = GameState::new(Box::new(store), LevelFactory::with_defaults());
    assert_eq!(state.achieved_level(), 3);
    assert!(state.set_current_level(3).is_ok());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn truncated_progress_file_is_replaced_on_next_raise() {
    let path = std::env::temp_dir().join(format!("bubbles-truncated-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"achieved_level": 7"#).unwrap();

    let mut state = GameState::new(
        Box::new(JsonFileStore::new(&path)),
        LevelFactory::with_defaults(),
    );
    assert_eq!(state.achieved_level(), 1);
    state.next_level();
    assert!(!state.has_pending_flush());

    let store = JsonFileStore::new(&path);
    assert_eq!(store.get(ACHIEVED_LEVEL_KEY).unwrap(), Some(2));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn suspend_and_resume_keeps_simulation_state() {
    let session = GameState::new(
        Box::new(MemoryStore::with_value(ACHIEVED_LEVEL_KEY, 4)),
        settings().level_factory(),
    );
    let mut sim = Simulation::new(session, &settings());
    sim.set_playfield(480.0, 800.0);
    sim.session_mut().set_current_level(3).unwrap();
    sim.pointer_down(100.0, 700.0).unwrap();
    sim.pointer_down(300.0, 600.0).unwrap();
    sim.resume(0);
    sim.advance(50);

    // Host is being torn down: pause, snapshot, serialize
    sim.pause();
    let json = sim.snapshot().to_json().unwrap();
    let before = sim.view();

    // Rebuilt host
    let session = GameState::new(
        Box::new(MemoryStore::with_value(ACHIEVED_LEVEL_KEY, 4)),
        settings().level_factory(),
    );
    let mut rebuilt = Simulation::new(session, &settings());
    rebuilt.set_playfield(480.0, 800.0);
    rebuilt.restore(&SessionSnapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(rebuilt.session().current_level().number(), 3);
    let after = rebuilt.view();
    assert_eq!(after.len(), before.len());
    for (a, b) in after.iter().zip(&before) {
        assert_eq!((a.x, a.y, a.radius, a.rotation), (b.x, b.y, b.radius, b.rotation));
    }

    // Both continue identically
    sim.resume(1_000);
    rebuilt.resume(1_000);
    sim.advance(1_030);
    rebuilt.advance(1_030);
    let moved: Vec<_> = sim.view().iter().map(|v| (v.x, v.y)).collect();
    let moved_rebuilt: Vec<_> = rebuilt.view().iter().map(|v| (v.x, v.y)).collect();
    assert_eq!(moved, moved_rebuilt);
}

#[test]
fn tapping_a_bubble_pops_it_and_scores() {
    let session = GameState::new(Box::new(MemoryStore::new()), settings().level_factory());
    let mut sim = Simulation::new(session, &settings());
    let PointerOutcome::Spawned(id) = sim.pointer_down(200.0, 200.0).unwrap() else {
        panic!("empty playfield tap should spawn");
    };
    assert_eq!(sim.pointer_down(200.0, 200.0).unwrap(), PointerOutcome::Popped(id));
    assert_eq!(sim.session().score(), 1);

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::BubbleSpawned { id }));
    assert!(events.contains(&GameEvent::BubblePopped { id }));
    assert!(events.contains(&GameEvent::ScoreChanged { score: 1 }));
}
