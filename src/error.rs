//! Error types for the bubble simulation
//!
//! Every fallible operation in the crate reports one of these. Nothing in the
//! simulation retries: operations either succeed or return a definite error.

use thiserror::Error;

/// Why a strategy table line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigErrorKind {
    /// The interval token is not `<int>-<int>`
    #[error("malformed level interval `{0}`")]
    MalformedInterval(String),
    /// The interval is empty (`high <= low`)
    #[error("empty level interval [{low}, {high})")]
    EmptyInterval { low: u32, high: u32 },
    /// The line has an interval but no generator kind
    #[error("missing generator kind")]
    MissingKind,
    /// The generator kind is not in the registry
    #[error("unknown generator kind `{0}`")]
    UnknownKind(String),
    /// A parameter token did not parse as an integer
    #[error("parameter `{0}` is not an integer")]
    NotAnInteger(String),
    /// The generator received the wrong number of parameters
    #[error("{kind} takes {expected} parameter(s), got {got}")]
    WrongArity {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    /// The generator rejected its parameters (out of range, empty range, ...)
    #[error("invalid generator parameters: {0}")]
    InvalidParameters(String),
}

/// A strategy table failed to load. Carries the 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("strategy config line {line}: {kind}")]
pub struct ConfigError {
    pub line: usize,
    pub kind: ConfigErrorKind,
}

impl ConfigError {
    pub fn new(line: usize, kind: ConfigErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Level selection failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Level numbers start at 1
    #[error("illegal level number {0}")]
    IllegalLevel(u32),
    /// The player has not reached this level yet
    #[error("level {requested} is locked (achieved level is {achieved})")]
    LevelLocked { requested: u32, achieved: u32 },
}

/// Rejected bubble mutations
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BubbleError {
    #[error("bubble radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("bubble coordinates must be finite")]
    NonFiniteCoordinate,
}

/// Durable storage failures (progress store, settings file)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable")]
    Unavailable,
}

/// Session snapshot restore failures
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    #[error("snapshot holds an invalid bubble: {0}")]
    Bubble(#[from] BubbleError),
    #[error("snapshot level cannot be restored: {0}")]
    Level(#[from] LevelError),
}

/// Crate-wide error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Bubble(#[from] BubbleError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub type Result<T> = std::result::Result<T, Error>;
