//! Ball world: fixed-timestep integration against immutable board geometry
//!
//! One world drives the live scene; every shadow search spins up its own.
//! Balls never collide with each other, and the board is borrowed read-only,
//! so a step mutates nothing but this world's balls. Iteration order is
//! stable (balls in spawn order, statics by index), which is what makes the
//! whole pipeline deterministic.

use glam::Vec2;

use super::board::Board;
use super::body::{Ball, BallId, BallMotion, ContactEvent, StaticKey};
use super::collision::{circle_circle, circle_rect, reflect_velocity};
use crate::consts::*;

/// Contacts keep this much residual overlap so resting balls don't re-report
/// the same contact every other frame
const COLLISION_SLOP: f32 = 0.05;

/// A set of balls stepping against a shared board
#[derive(Debug, Clone, Default)]
pub struct BallWorld {
    balls: Vec<Ball>,
    next_id: BallId,
}

impl BallWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a physics-driven ball
    pub fn spawn(&mut self, pos: Vec2, spawn_index: usize) -> BallId {
        self.spawn_with(pos, spawn_index, BallMotion::Dynamic)
    }

    /// Spawn a ball whose position will be written from a recorded path
    pub fn spawn_replay(&mut self, pos: Vec2, spawn_index: usize) -> BallId {
        self.spawn_with(pos, spawn_index, BallMotion::Replay)
    }

    fn spawn_with(&mut self, pos: Vec2, spawn_index: usize, motion: BallMotion) -> BallId {
        let id = self.next_id;
        self.next_id += 1;
        let mut ball = Ball::new(id, pos, spawn_index);
        ball.motion = motion;
        self.balls.push(ball);
        id
    }

    /// Remove a ball; a no-op when the id is already gone
    pub fn remove(&mut self, id: BallId) {
        self.balls.retain(|b| b.id != id);
    }

    /// Remove dynamic balls that have fallen below `limit`
    pub fn cull_below(&mut self, limit: f32) {
        self.balls
            .retain(|b| b.motion != BallMotion::Dynamic || b.pos.y <= limit);
    }

    pub fn clear(&mut self) {
        self.balls.clear();
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn has_dynamic(&self) -> bool {
        self.balls.iter().any(|b| b.motion == BallMotion::Dynamic)
    }

    /// Write a ball's position directly; a no-op when the id is gone
    pub fn set_position(&mut self, id: BallId, pos: Vec2) {
        if let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) {
            ball.pos = pos;
        }
    }

    /// Advance every dynamic ball by one fixed timestep.
    ///
    /// Returns the contacts that STARTED this step, in scan order: balls in
    /// spawn order, then pegs, barriers, buckets by index. Contacts against
    /// pegs and barriers are resolved with restitution; bucket sensors only
    /// report. Replay balls are skipped entirely, their contacts come from
    /// the recording.
    pub fn step(&mut self, board: &Board, dt: f32) -> Vec<ContactEvent> {
        let mut events = Vec::new();

        for ball in &mut self.balls {
            if ball.motion != BallMotion::Dynamic {
                continue;
            }

            ball.vel.y += GRAVITY * dt;
            ball.vel *= 1.0 - AIR_DRAG;
            ball.pos += ball.vel * dt;

            let mut current: Vec<StaticKey> = Vec::new();

            for peg in &board.pegs {
                if let Some(overlap) = circle_circle(ball.pos, ball.radius, peg.pos, peg.radius) {
                    let key = StaticKey::Peg(peg.index);
                    if !ball.touching.contains(&key) {
                        events.push(ContactEvent {
                            ball: Some(ball.id),
                            peg: Some(*peg),
                            ..Default::default()
                        });
                    }
                    current.push(key);
                    ball.pos += overlap.normal * (overlap.depth - COLLISION_SLOP).max(0.0);
                    ball.vel = reflect_velocity(ball.vel, overlap.normal, RESTITUTION);
                }
            }

            for barrier in &board.barriers {
                if let Some(overlap) =
                    circle_rect(ball.pos, ball.radius, barrier.pos, barrier.half)
                {
                    let key = StaticKey::Barrier(barrier.index);
                    if !ball.touching.contains(&key) {
                        events.push(ContactEvent {
                            ball: Some(ball.id),
                            barrier: Some(*barrier),
                            ..Default::default()
                        });
                    }
                    current.push(key);
                    ball.pos += overlap.normal * (overlap.depth - COLLISION_SLOP).max(0.0);
                    ball.vel = reflect_velocity(ball.vel, overlap.normal, RESTITUTION);
                }
            }

            for bucket in &board.buckets {
                if circle_rect(ball.pos, ball.radius, bucket.pos, bucket.half).is_some() {
                    let key = StaticKey::Bucket(bucket.index);
                    if !ball.touching.contains(&key) {
                        events.push(ContactEvent {
                            ball: Some(ball.id),
                            bucket: Some(*bucket),
                            ..Default::default()
                        });
                    }
                    current.push(key);
                }
            }

            ball.touching = current;
        }

        events
    }
}
