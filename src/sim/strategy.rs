//! Strategy table: which size generator applies to which levels
//!
//! Format, one binding per line:
//!
//! ```text
//! # levels 1..9 use fixed size bubbles
//! 1-10 Constant 32
//! 10-41 RandomInFixedInterval 16 48
//! ```
//!
//! The interval is half-open (`low` inclusive, `high` exclusive). Any bad line
//! aborts the whole load: a difficulty curve is either fully specified or not
//! loaded at all.

use std::str::FromStr;

use super::generator::{GeneratorKind, SizeGenerator};
use crate::error::{ConfigError, ConfigErrorKind};

/// One `[low, high) -> generator` binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyEntry {
    pub low: u32,
    pub high: u32,
    pub generator: SizeGenerator,
}

impl StrategyEntry {
    #[inline]
    pub fn covers(&self, level: u32) -> bool {
        level >= self.low && level < self.high
    }
}

/// Parsed, immutable strategy table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyTable {
    entries: Vec<StrategyEntry>,
}

impl StrategyTable {
    /// Parse configuration lines. Fails on the first malformed line.
    pub fn load<I>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut entries = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = parse_line(line).map_err(|kind| ConfigError::new(index + 1, kind))?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// First entry whose interval contains `level`
    pub fn resolve(&self, level: u32) -> Option<SizeGenerator> {
        self.entries
            .iter()
            .find(|entry| entry.covers(level))
            .map(|entry| entry.generator)
    }

    pub fn entries(&self) -> &[StrategyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for StrategyTable {
    type Err = ConfigError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::load(source.lines())
    }
}

fn parse_line(line: &str) -> Result<StrategyEntry, ConfigErrorKind> {
    let mut tokens = line.split_whitespace();

    // Non-empty after trim, so there is always a first token
    let interval = tokens.next().unwrap_or_default();
    let (low, high) = parse_interval(interval)?;

    let kind_name = tokens.next().ok_or(ConfigErrorKind::MissingKind)?;
    let kind = GeneratorKind::from_name(kind_name)
        .ok_or_else(|| ConfigErrorKind::UnknownKind(kind_name.to_string()))?;

    let params = tokens
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| ConfigErrorKind::NotAnInteger(token.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let generator = kind.build(&params)?;
    Ok(StrategyEntry {
        low,
        high,
        generator,
    })
}

fn parse_interval(token: &str) -> Result<(u32, u32), ConfigErrorKind> {
    let malformed = || ConfigErrorKind::MalformedInterval(token.to_string());
    let (low, high) = token.split_once('-').ok_or_else(malformed)?;
    let low = low.parse::<u32>().map_err(|_| malformed())?;
    let high = high.parse::<u32>().map_err(|_| malformed())?;
    if high <= low {
        return Err(ConfigErrorKind::EmptyInterval { low, high });
    }
    Ok((low, high))
}
