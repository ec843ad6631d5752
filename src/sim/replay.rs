//! Replay bookkeeping: drive a live ball along a recorded trajectory
//!
//! A replayed ball is never physics-integrated. Each tick writes the next
//! recorded position into the live world, then re-fires that frame's
//! recorded contacts with the ball reference rewritten from the shadow
//! candidate to the live ball.

use serde::{Deserialize, Serialize};

use glam::Vec2;

use super::body::{BallId, ContactEvent};
use super::shadow::{RecordedContact, SimulationResult};
use super::world::BallWorld;

/// Lifecycle of one replayed ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayPhase {
    /// Queued; no frame has been applied yet
    Pending,
    /// Frames are being applied
    Animating,
    /// Path exhausted; the ball can be removed
    Done,
}

/// One ball being driven along a recorded path
#[derive(Debug, Clone)]
pub struct ActiveReplay {
    ball_id: BallId,
    path: Vec<Vec2>,
    collisions: Vec<RecordedContact>,
    cursor: u32,
    phase: ReplayPhase,
}

impl ActiveReplay {
    pub fn new(ball_id: BallId, sim: SimulationResult) -> Self {
        Self {
            ball_id,
            path: sim.path,
            collisions: sim.collisions,
            cursor: 0,
            phase: ReplayPhase::Pending,
        }
    }

    pub fn ball_id(&self) -> BallId {
        self.ball_id
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == ReplayPhase::Done
    }

    /// Frames applied so far
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Apply one frame: write the recorded position to the live ball, fire
    /// that frame's contacts with the live ball id patched in, then advance
    /// the cursor by exactly one. Past the last frame this only flips the
    /// phase to Done, so a finished ball rests one tick before removal.
    pub fn advance(&mut self, world: &mut BallWorld, on_contact: &mut dyn FnMut(&ContactEvent)) {
        if self.phase == ReplayPhase::Done {
            return;
        }
        let Some(&pos) = self.path.get(self.cursor as usize) else {
            self.phase = ReplayPhase::Done;
            return;
        };
        self.phase = ReplayPhase::Animating;
        world.set_position(self.ball_id, pos);
        for recorded in self.collisions.iter().filter(|c| c.frame == self.cursor) {
            let mut event = recorded.event;
            event.ball = Some(self.ball_id);
            on_contact(&event);
        }
        self.cursor += 1;
    }
}
