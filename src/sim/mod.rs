//! Simulation module
//!
//! All gameplay logic lives here and stays independent of rendering:
//! - Fixed tick interval only
//! - Injectable / seeded RNG only
//! - Stable iteration order (by bubble ID)
//! - Host input arrives as explicit calls, output leaves as polled views and events

pub mod bubble;
pub mod driver;
pub mod generator;
pub mod level;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod strategy;
pub mod tick;

pub use bubble::{Bubble, MAX_ROTATION, normalize_rotation};
pub use driver::{PointerOutcome, Simulation};
pub use generator::{GeneratorKind, SizeGenerator, VelocityPolicy};
pub use level::{DEFAULT_MAX_LEVEL, DEFAULT_RADIUS, Level, LevelFactory};
pub use session::{ACHIEVED_LEVEL_KEY, FIRST_LEVEL, GameState};
pub use snapshot::{BubbleRecord, SNAPSHOT_VERSION, SessionSnapshot};
pub use state::{BubbleId, BubbleView, GameEvent, LiveBubble, Playfield, RngState, World};
pub use strategy::{StrategyEntry, StrategyTable};
pub use tick::{PendingTick, TickScheduler, TickToken, tick};
