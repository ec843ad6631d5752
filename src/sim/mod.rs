//! Deterministic simulation module
//!
//! Everything that decides where a ball ends up lives here. This module must
//! be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (and only outside this module; nothing here draws randomness)
//! - Stable iteration order (balls by spawn order, statics by index)
//! - No rendering or platform dependencies

pub mod board;
pub mod body;
pub mod collision;
pub mod replay;
pub mod shadow;
pub mod world;

pub use board::{Board, BoardConfig, ConfigError, bucket_layout};
pub use body::{Ball, BallId, BallMotion, Barrier, BodyRef, Bucket, ContactEvent, Peg, StaticKey};
pub use collision::{Overlap, circle_circle, circle_rect, reflect_velocity};
pub use replay::{ActiveReplay, ReplayPhase};
pub use shadow::{RecordedContact, SimulationResult, simulate};
pub use world::BallWorld;
