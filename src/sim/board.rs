//! Board geometry: peg lattice, bucket strip, configuration validation
//!
//! A `Board` is built once per configuration and never mutated. The live
//! world and every shadow search share the same instance read-only, so
//! candidate balls can never disturb the live scene through geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{Barrier, Bucket, Peg};
use crate::consts::*;

/// Fewest peg rows a board may have (a 1-row board has no pegs at all)
pub const MIN_ROWS: u32 = 1;
/// Most peg rows a board may have before spacing drops below ball size
pub const MAX_ROWS: u32 = 24;

/// Rejected board configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rows must be between {MIN_ROWS} and {MAX_ROWS}, got {0}")]
    RowsOutOfRange(u32),
    #[error("at least one multiplier is required")]
    NoMultipliers,
    #[error("multiplier {0} must be finite and non-negative")]
    BadMultiplier(f32),
}

/// Board configuration: peg rows plus the multiplier ladder to mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Peg rows in the lattice (row r holds r+1 pegs; the apex row is dropped)
    pub rows: u32,
    /// Distinct multipliers, lowest first; the board mirrors these outward
    pub multipliers: Vec<f32>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 14,
            multipliers: vec![0.5, 1.5, 3.0, 6.0],
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&self.rows) {
            return Err(ConfigError::RowsOutOfRange(self.rows));
        }
        if self.multipliers.is_empty() {
            return Err(ConfigError::NoMultipliers);
        }
        for &m in &self.multipliers {
            if !m.is_finite() || m < 0.0 {
                return Err(ConfigError::BadMultiplier(m));
            }
        }
        Ok(())
    }
}

/// Mirror a multiplier ladder into the on-board bucket strip.
///
/// Distinct values in first-seen order become `[head, tail..]`; the strip is
/// `reverse(tail) ++ [head; 3] ++ tail`, so the head value owns the three
/// center buckets and every other value appears once per side. For `k`
/// distinct values the strip holds `2 * (k - 1) + 3` buckets.
pub fn bucket_layout(multipliers: &[f32]) -> Vec<f32> {
    let mut unique: Vec<f32> = Vec::new();
    for &m in multipliers {
        if !unique.contains(&m) {
            unique.push(m);
        }
    }
    let Some((&head, tail)) = unique.split_first() else {
        return Vec::new();
    };
    let mut layout: Vec<f32> = tail.iter().rev().copied().collect();
    layout.extend([head; 3]);
    layout.extend_from_slice(tail);
    layout
}

/// Immutable board geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub width: f32,
    pub height: f32,
    pub pegs: Vec<Peg>,
    pub barriers: Vec<Barrier>,
    pub buckets: Vec<Bucket>,
}

impl Board {
    /// Validate the configuration and build the full static geometry
    pub fn build(config: &BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (buckets, barriers) = build_bucket_strip(&config.multipliers);
        Ok(Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            pegs: build_pegs(config.rows),
            barriers,
            buckets,
        })
    }

    /// Buckets whose multiplier equals `multiplier` exactly.
    ///
    /// Exact comparison is intentional: board multipliers and wager results
    /// originate from the same table, so matching values are bit-identical.
    pub fn buckets_with_multiplier(&self, multiplier: f32) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(move |b| b.multiplier == multiplier)
    }
}

/// Lay out the triangular peg lattice.
///
/// Row r (0-based) holds r+1 pegs across a span that widens linearly to the
/// full board width at the last row. Row 0 would be a single apex peg; it
/// only anchors the interpolation and is never emitted, which also keeps a
/// 1-row board from evaluating the 0/0 span.
fn build_pegs(rows: u32) -> Vec<Peg> {
    let band = BOARD_HEIGHT / (rows + 2) as f32;
    let mut pegs = Vec::new();
    let mut index = 0u32;
    for row in 1..rows {
        let cols = row + 1;
        let row_width = BOARD_WIDTH * row as f32 / (rows - 1) as f32;
        let spacing = row_width / (cols - 1) as f32;
        let x0 = (BOARD_WIDTH - row_width) / 2.0;
        let y = band * row as f32 + band / 2.0;
        for col in 0..cols {
            pegs.push(Peg {
                index,
                pos: Vec2::new(x0 + spacing * col as f32, y),
                radius: PEG_RADIUS,
            });
            index += 1;
        }
    }
    pegs
}

/// Build the bucket sensors and the barrier walls between them.
///
/// Barriers sit at every strip boundary i*w for i in 0..=count, so the two
/// outermost ones cap the board edges. Sensors fill the gaps, inset by the
/// barrier width.
fn build_bucket_strip(multipliers: &[f32]) -> (Vec<Bucket>, Vec<Barrier>) {
    let layout = bucket_layout(multipliers);
    let w = BOARD_WIDTH / layout.len() as f32;

    let barriers = (0..=layout.len())
        .map(|i| Barrier {
            index: i as u32,
            pos: Vec2::new(i as f32 * w, BOARD_HEIGHT - BARRIER_HEIGHT / 2.0),
            half: Vec2::new(BARRIER_WIDTH / 2.0, BARRIER_HEIGHT / 2.0),
        })
        .collect();

    let buckets = layout
        .iter()
        .enumerate()
        .map(|(i, &multiplier)| Bucket {
            index: i as u32,
            multiplier,
            pos: Vec2::new(i as f32 * w + w / 2.0, BOARD_HEIGHT - BUCKET_HEIGHT / 2.0),
            half: Vec2::new((w - BARRIER_WIDTH) / 2.0, BUCKET_HEIGHT / 2.0),
        })
        .collect();

    (buckets, barriers)
}
