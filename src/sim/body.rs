//! Board and ball entity types
//!
//! Entities are typed and carry their own identity; contact events copy them
//! by value so the host callback never borrows into the world.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Identity of a ball within one world
pub type BallId = u32;

/// A static peg in the triangular lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    /// Dense row-major index over the board's pegs
    pub index: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// A thin wall between two buckets (the outermost pair caps the board edges)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub index: u32,
    /// Center of the rectangle
    pub pos: Vec2,
    /// Half-extents
    pub half: Vec2,
}

/// A bucket floor sensor: overlap is reported, never resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub index: u32,
    pub multiplier: f32,
    /// Center of the sensor rectangle
    pub pos: Vec2,
    /// Half-extents
    pub half: Vec2,
}

/// Key identifying one static body on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticKey {
    Peg(u32),
    Barrier(u32),
    Bucket(u32),
}

/// How a ball's position evolves each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallMotion {
    /// Integrated by the physics step
    Dynamic,
    /// Position written from a recorded path; the step never touches it
    Replay,
}

/// A ball, live or shadow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub motion: BallMotion,
    /// Index into the spawn-offset pool this ball started from
    pub spawn_index: usize,
    /// Statics currently in contact (for contact-start edge detection)
    #[serde(skip)]
    pub touching: Vec<StaticKey>,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, spawn_index: usize) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            motion: BallMotion::Dynamic,
            spawn_index,
            touching: Vec::new(),
        }
    }
}

/// A single contact, delivered synchronously to the registered callback.
///
/// At most one entity of each kind is set. Statics never collide with each
/// other, so `peg`, `barrier` and `bucket` are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactEvent {
    pub ball: Option<BallId>,
    pub peg: Option<Peg>,
    pub bucket: Option<Bucket>,
    pub barrier: Option<Barrier>,
}

/// Read-only view of one body, for render snapshots
#[derive(Debug, Clone, Copy)]
pub enum BodyRef<'a> {
    Peg(&'a Peg),
    Barrier(&'a Barrier),
    Bucket(&'a Bucket),
    Ball(&'a Ball),
}
