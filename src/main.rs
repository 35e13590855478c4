//! Bubbles headless runner
//!
//! Drives a session without a rendering surface: loads settings and the
//! strategy table, replays a short scripted burst of taps on a virtual clock,
//! and prints the resulting session snapshot as JSON.
//!
//! Usage: `bubbles [settings.json] [seconds]`

use std::path::Path;
use std::process::ExitCode;

use bubbles::persistence::JsonFileStore;
use bubbles::sim::{GameEvent, GameState, PointerOutcome, Simulation};
use bubbles::{EngineSettings, init_logging};

/// Virtual playfield used when settings do not provide one
const PLAYFIELD_WIDTH: f32 = 480.0;
const PLAYFIELD_HEIGHT: f32 = 800.0;
/// Simulated milliseconds between scripted taps
const TAP_EVERY_MS: u64 = 250;
/// Pops needed to clear a level in the script
const POPS_PER_LEVEL: u32 = 5;

fn main() -> ExitCode {
    init_logging();
    log::info!("Bubbles (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => EngineSettings::load_from(Path::new(&path)),
        None => EngineSettings::load(),
    };
    let seconds: u64 = match args.next().map(|s| s.parse()) {
        Some(Ok(seconds)) => seconds,
        Some(Err(err)) => {
            log::error!("Invalid duration: {}", err);
            return ExitCode::FAILURE;
        }
        None => 5,
    };

    match run(&settings, seconds) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Session failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Play a scripted session and return the final snapshot as JSON
fn run(settings: &EngineSettings, seconds: u64) -> bubbles::Result<String> {
    let store = JsonFileStore::new(&settings.progress_path);
    let session = GameState::new(Box::new(store), settings.level_factory());
    let mut sim = Simulation::new(session, settings);
    if settings.playfield.is_none() {
        sim.set_playfield(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    }

    run_script(&mut sim, seconds.saturating_mul(1_000))?;

    if !sim.session_mut().flush_progress() {
        log::warn!("Achieved level could not be saved before exit");
    }
    Ok(sim.snapshot().to_json()?)
}

/// Tap a fixed pattern over the playfield while the clock runs
fn run_script(sim: &mut Simulation, duration_ms: u64) -> bubbles::Result<()> {
    let mut now = 0;
    let mut pops = 0;
    let mut tap = 0u32;
    sim.resume(now);

    while now < duration_ms {
        // Step the clock one interval at a time, as a frame loop would
        let next_tap = now + TAP_EVERY_MS;
        while now < next_tap {
            now += sim.scheduler().interval_ms();
            sim.advance(now);
        }

        // Even taps spawn in the lower half; odd taps chase the bubble just
        // spawned, which has drifted up one unit per tick since
        let slot = tap / 2;
        let x = 40.0 + (slot * 97 % 400) as f32;
        let mut y = 400.0 + (slot * 53 % 360) as f32;
        if tap % 2 == 1 {
            y -= (TAP_EVERY_MS / sim.scheduler().interval_ms()) as f32;
        }
        tap += 1;

        if let PointerOutcome::Popped(_) = sim.pointer_down(x, y)? {
            pops += 1;
            if pops % POPS_PER_LEVEL == 0 {
                sim.level_cleared();
            }
        }

        for event in sim.drain_events() {
            if let GameEvent::AchievedLevelRaised { level } = event {
                log::info!("New achieved level: {}", level);
            }
        }
    }
    sim.pause();

    let session = sim.session();
    log::info!(
        "Script finished: level {}, achieved {}, score {}, {} live bubbles",
        session.current_level().number(),
        session.achieved_level(),
        session.score(),
        sim.world().len()
    );
    Ok(())
}
