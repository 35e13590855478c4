//! Bubbles - a fixed-tick bubble popping simulation engine
//!
//! Core modules:
//! - `sim`: Simulation (bubbles, levels, size strategies, session, tick loop)
//! - `persistence`: Durable storage for the achieved level
//! - `settings`: Engine configuration
//! - `error`: Error types

pub mod error;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::EngineSettings;

/// Engine configuration constants
pub mod consts {
    /// Default time between ticks (ms)
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;
    /// Maximum ticks run per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Ticks between retries of a failed progress write
    pub const FLUSH_RETRY_TICKS: u64 = 100;
    /// Score for popping one bubble
    pub const DEFAULT_POP_POINTS: u32 = 1;
}

/// Install the platform logger (env_logger natively, the console on wasm32).
/// Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
