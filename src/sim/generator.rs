//! Size generation strategies and spawn velocity policy
//!
//! Generators form a closed registry: the strategy table resolves a kind name
//! to a [`GeneratorKind`] and builds the matching [`SizeGenerator`] from its
//! positional integer parameters.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigErrorKind;

/// Pluggable policy producing a bubble radius for a difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeGenerator {
    /// Always the same value
    Constant { value: u32 },
    /// Uniformly sampled from `[low, high)`
    UniformRandom { low: u32, high: u32 },
}

impl SizeGenerator {
    pub fn constant(value: i64) -> Result<Self, ConfigErrorKind> {
        let value = positive(value)?;
        Ok(SizeGenerator::Constant { value })
    }

    pub fn uniform_random(low: i64, high: i64) -> Result<Self, ConfigErrorKind> {
        if high <= low {
            return Err(ConfigErrorKind::InvalidParameters(format!(
                "random interval [{low}, {high}) is empty"
            )));
        }
        Ok(SizeGenerator::UniformRandom {
            low: positive(low)?,
            high: positive(high)?,
        })
    }

    /// Produce a size for `level`. Only the random variant touches `rng`.
    pub fn generate<R: Rng>(&self, _level: u32, rng: &mut R) -> u32 {
        match *self {
            SizeGenerator::Constant { value } => value,
            SizeGenerator::UniformRandom { low, high } => rng.random_range(low..high),
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        match self {
            SizeGenerator::Constant { .. } => GeneratorKind::Constant,
            SizeGenerator::UniformRandom { .. } => GeneratorKind::UniformRandom,
        }
    }
}

fn positive(value: i64) -> Result<u32, ConfigErrorKind> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigErrorKind::InvalidParameters(format!(
            "{value} is not a positive size"
        ))),
    }
}

/// Registry of generator kinds known to the strategy table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Constant,
    UniformRandom,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::Constant, GeneratorKind::UniformRandom];

    /// Canonical config name
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Constant => "Constant",
            GeneratorKind::UniformRandom => "RandomInFixedInterval",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Constant" | "ConstantValue" => Some(GeneratorKind::Constant),
            "RandomInFixedInterval" | "UniformRandom" => Some(GeneratorKind::UniformRandom),
            _ => None,
        }
    }

    /// Number of constructor parameters
    pub fn arity(&self) -> usize {
        match self {
            GeneratorKind::Constant => 1,
            GeneratorKind::UniformRandom => 2,
        }
    }

    /// Build a generator from positional parameters
    pub fn build(&self, params: &[i64]) -> Result<SizeGenerator, ConfigErrorKind> {
        if params.len() != self.arity() {
            return Err(ConfigErrorKind::WrongArity {
                kind: self.as_str(),
                expected: self.arity(),
                got: params.len(),
            });
        }
        match self {
            GeneratorKind::Constant => SizeGenerator::constant(params[0]),
            GeneratorKind::UniformRandom => SizeGenerator::uniform_random(params[0], params[1]),
        }
    }
}

/// How freshly spawned bubbles move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityPolicy {
    /// Center delta per tick
    pub center_step: Vec2,
    /// Rotation delta per tick (degrees)
    pub rotation_step: f32,
}

impl VelocityPolicy {
    /// Straight upward drift, one unit per tick
    pub const DEFAULT: VelocityPolicy = VelocityPolicy {
        center_step: Vec2::new(0.0, -1.0),
        rotation_step: 0.0,
    };

    pub fn new(dx: f32, dy: f32, dr: f32) -> Self {
        Self {
            center_step: Vec2::new(dx, dy),
            rotation_step: dr,
        }
    }
}

impl Default for VelocityPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
