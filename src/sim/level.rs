//! Difficulty levels and the factory that builds them

use rand::Rng;

use super::bubble::Bubble;
use super::generator::{SizeGenerator, VelocityPolicy};
use super::strategy::StrategyTable;
use crate::error::{BubbleError, ConfigError, LevelError};

/// Highest selectable level
pub const DEFAULT_MAX_LEVEL: u32 = 40;

/// Radius used when no strategy covers a level (half the 64px bubble sprite)
pub const DEFAULT_RADIUS: u32 = 32;

/// Immutable per-level policy
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    number: u32,
    size_generator: SizeGenerator,
    velocity: VelocityPolicy,
}

impl Level {
    pub fn new(
        number: u32,
        size_generator: SizeGenerator,
        velocity: VelocityPolicy,
    ) -> Result<Self, LevelError> {
        if number == 0 {
            return Err(LevelError::IllegalLevel(number));
        }
        Ok(Self {
            number,
            size_generator,
            velocity,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size_generator(&self) -> SizeGenerator {
        self.size_generator
    }

    /// Create a bubble centered at (x, y) sized and moving per this level
    pub fn spawn<R: Rng>(&self, x: f32, y: f32, rng: &mut R) -> Result<Bubble, BubbleError> {
        let radius = self.size_generator.generate(self.number, rng);
        let mut bubble = Bubble::new(x, y, radius as f32)?;
        bubble
            .set_center_step(self.velocity.center_step.x, self.velocity.center_step.y)?
            .set_rotation_step(self.velocity.rotation_step)?;
        Ok(bubble)
    }
}

/// Builds [`Level`]s from a strategy table
#[derive(Debug, Clone)]
pub struct LevelFactory {
    table: StrategyTable,
    max_level: u32,
    default_generator: SizeGenerator,
    velocity: VelocityPolicy,
}

impl LevelFactory {
    pub fn new(table: StrategyTable) -> Self {
        Self {
            table,
            max_level: DEFAULT_MAX_LEVEL,
            default_generator: SizeGenerator::Constant {
                value: DEFAULT_RADIUS,
            },
            velocity: VelocityPolicy::DEFAULT,
        }
    }

    /// Factory with no strategies: every level uses the default generator
    pub fn with_defaults() -> Self {
        Self::new(StrategyTable::default())
    }

    /// Parse `source`; on failure log the error and fall back to defaults
    pub fn load_or_default<I>(source: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        match StrategyTable::load(source) {
            Ok(table) => {
                log::info!("Loaded {} size strategies", table.len());
                for entry in table.entries() {
                    log::debug!(
                        "Levels {}-{}: {}",
                        entry.low,
                        entry.high,
                        entry.generator.kind().as_str()
                    );
                }
                Self::new(table)
            }
            Err(err) => {
                log::error!("Strategy config rejected, using default sizes: {}", err);
                Self::with_defaults()
            }
        }
    }

    /// Parse `source`, reporting the error alongside the fallback factory
    pub fn try_load<I>(source: I) -> Result<Self, (ConfigError, Self)>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        StrategyTable::load(source)
            .map(Self::new)
            .map_err(|err| (err, Self::with_defaults()))
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level.max(1);
        self
    }

    pub fn with_velocity_policy(mut self, velocity: VelocityPolicy) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    /// Generator for `level` after clamping, falling back to the default
    pub fn resolve(&self, level: u32) -> SizeGenerator {
        let level = self.clamp(level);
        self.table.resolve(level).unwrap_or_else(|| {
            log::debug!("No strategy for level {}, using default", level);
            self.default_generator
        })
    }

    /// Build the level descriptor for `level`, clamped to `[1, max_level]`
    pub fn create_level(&self, level: u32) -> Level {
        let number = self.clamp(level);
        Level {
            number,
            size_generator: self.resolve(number),
            velocity: self.velocity,
        }
    }

    #[inline]
    fn clamp(&self, level: u32) -> u32 {
        level.clamp(1, self.max_level)
    }
}

impl Default for LevelFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}
