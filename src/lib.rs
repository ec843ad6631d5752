//! Plinko Engine - deterministic board physics with pre-simulated outcomes
//!
//! The authoritative multiplier for a wager is decided elsewhere; this crate
//! makes a ball visibly land in a matching bucket. A shadow simulation finds
//! a real trajectory into the desired bucket, then the live board replays
//! that trajectory frame by frame, re-firing the recorded contacts.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, collisions, ball world,
//!   shadow trajectory search, replay bookkeeping)
//! - `engine`: Public facade owning the live board, the spawn pool and the
//!   replay driver
//! - `paytable`: Multiplier table generation (binomial bucket odds, RTP
//!   scaling)

pub mod engine;
pub mod paytable;
pub mod sim;

pub use engine::{PlinkoEngine, RunError};
pub use paytable::{TARGET_RTP, Volatility};
pub use sim::board::{Board, BoardConfig, ConfigError};
pub use sim::body::{Ball, BallId, Barrier, BodyRef, Bucket, ContactEvent, Peg};
pub use sim::shadow::{RecordedContact, SimulationResult};

/// Board tuning constants
pub mod consts {
    /// Board dimensions in pixels (square, matches the render viewport)
    pub const BOARD_WIDTH: f32 = 700.0;
    pub const BOARD_HEIGHT: f32 = 700.0;

    /// Fixed simulation timestep (60 Hz; one tick = one recorded frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Downward gravity (pixels/s²)
    pub const GRAVITY: f32 = 1000.0;
    /// Per-tick velocity damping (air resistance)
    pub const AIR_DRAG: f32 = 0.005;
    /// Bounciness of ball contacts against pegs and barriers. The
    /// reflection model carries no tangential friction, so this runs hot
    /// enough that the candidate fan reaches the outermost buckets.
    pub const RESTITUTION: f32 = 0.65;

    /// Ball and peg sizes
    pub const BALL_RADIUS: f32 = 9.0;
    pub const PEG_RADIUS: f32 = 11.0;

    /// Balls drop in just above the top edge, jittered around board center
    pub const SPAWN_Y: f32 = -10.0;
    /// Full width of the horizontal jitter band (pool offsets use ±half).
    /// Spans the upper peg gaps so candidates strike the first pegs across
    /// the whole range of impact offsets.
    pub const SPAWN_OFFSET_RANGE: f32 = 30.0;

    /// Number of candidate balls per shadow search
    pub const CANDIDATE_COUNT: usize = 50;
    /// Hard cap on frames per shadow search
    pub const MAX_SIM_FRAMES: u32 = 1000;

    /// Bucket strip geometry along the bottom edge
    pub const BUCKET_HEIGHT: f32 = 60.0;
    pub const BARRIER_HEIGHT: f32 = BUCKET_HEIGHT * 1.2;
    pub const BARRIER_WIDTH: f32 = 4.0;
}
