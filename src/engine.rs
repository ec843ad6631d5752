//! Engine facade: owns the live board, schedules shadow searches and drives
//! replays.
//!
//! `run` never gambles with the outcome. The trajectory is found in an
//! isolated shadow world first; the live ball only ever plays back the
//! recording. Free-run drops (`drop_one`, `drop_all`) are the exception and
//! land wherever physics takes them.

use glam::Vec2;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::{CANDIDATE_COUNT, SIM_DT, SPAWN_OFFSET_RANGE, SPAWN_Y};
use crate::sim::{
    ActiveReplay, BallId, BallWorld, Board, BoardConfig, BodyRef, ConfigError, ContactEvent,
    SimulationResult, simulate,
};

/// Balls are culled once they fall this far past the board bottom
const CULL_MARGIN: f32 = 100.0;

fn draw_pool(rng: &mut Pcg32) -> Vec<f32> {
    let half = SPAWN_OFFSET_RANGE / 2.0;
    (0..CANDIDATE_COUNT)
        .map(|_| rng.random_range(-half..half))
        .collect()
}

/// The jittered spawn pool an engine built from `seed` will search from
pub fn candidate_pool(seed: u64) -> Vec<f32> {
    draw_pool(&mut Pcg32::seed_from_u64(seed))
}

/// Why a scheduled drop could not be played
#[derive(Debug, Error)]
pub enum RunError {
    /// No bucket on the board pays the requested multiplier
    #[error("no bucket pays multiplier {multiplier}")]
    NoMatchingBucket { multiplier: f32 },
    /// Every shadow candidate missed the chosen bucket
    #[error("no trajectory found for bucket {bucket_index}")]
    NoTrajectoryFound { bucket_index: u32 },
}

/// Live board plus replay scheduler.
///
/// The candidate spawn pool is jittered once at construction, so repeated
/// searches against the same board are deterministic. Contact events from
/// both free-running balls and replayed balls arrive through the single
/// `on_contact` callback.
pub struct PlinkoEngine {
    board: Board,
    world: BallWorld,
    spawn_offsets: Vec<f32>,
    rng: Pcg32,
    on_contact: Box<dyn FnMut(&ContactEvent)>,
    replays: Vec<ActiveReplay>,
    free_run: bool,
}

impl PlinkoEngine {
    /// Build the board and pre-jitter the candidate pool from `seed`.
    pub fn new(
        config: BoardConfig,
        seed: u64,
        on_contact: impl FnMut(&ContactEvent) + 'static,
    ) -> Result<Self, ConfigError> {
        let board = Board::build(&config)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn_offsets = draw_pool(&mut rng);
        Ok(Self {
            board,
            world: BallWorld::new(),
            spawn_offsets,
            rng,
            on_contact: Box::new(on_contact),
            replays: Vec::new(),
            free_run: false,
        })
    }

    /// Schedule a drop that lands in a bucket paying `multiplier`.
    ///
    /// Picks a random bucket with that payout, searches the shadow world for
    /// a candidate trajectory into it, then spawns a live ball that will be
    /// driven along the recording by `tick`. Returns the live ball id.
    pub fn run(&mut self, multiplier: f32) -> Result<BallId, RunError> {
        let matching: Vec<u32> = self
            .board
            .buckets_with_multiplier(multiplier)
            .map(|b| b.index)
            .collect();
        if matching.is_empty() {
            warn!("no bucket pays multiplier {multiplier}");
            return Err(RunError::NoMatchingBucket { multiplier });
        }
        let target = matching[self.rng.random_range(0..matching.len())];
        let Some(sim) = simulate(&self.board, &self.spawn_offsets, target) else {
            warn!("no trajectory found for bucket {target}");
            return Err(RunError::NoTrajectoryFound { bucket_index: target });
        };
        Ok(self.launch_replay(sim))
    }

    fn launch_replay(&mut self, sim: SimulationResult) -> BallId {
        let x = self.board.width / 2.0 + self.spawn_offsets[sim.spawn_index];
        let id = self.world.spawn_replay(Vec2::new(x, SPAWN_Y), sim.spawn_index);
        debug!(
            "replaying candidate {} into bucket {} over {} frames",
            sim.spawn_index,
            sim.bucket_index,
            sim.path.len()
        );
        self.replays.push(ActiveReplay::new(id, sim));
        id
    }

    /// Advance everything by one frame.
    ///
    /// Free-running balls get a physics step, every in-flight replay gets
    /// its next recorded frame, and finished replays are removed along with
    /// their balls. Calling this while idle is a no-op.
    pub fn tick(&mut self) {
        if self.free_run {
            let events = self.world.step(&self.board, SIM_DT);
            for event in &events {
                (self.on_contact)(event);
            }
            self.world.cull_below(self.board.height + CULL_MARGIN);
            self.free_run = self.world.has_dynamic();
        }
        for replay in &mut self.replays {
            replay.advance(&mut self.world, &mut *self.on_contact);
        }
        let world = &mut self.world;
        self.replays.retain(|replay| {
            if replay.is_done() {
                world.remove(replay.ball_id());
                false
            } else {
                true
            }
        });
    }

    /// True while any ball still needs ticking
    pub fn is_animating(&self) -> bool {
        !self.replays.is_empty() || self.free_run
    }

    /// Replays still in flight
    pub fn active_replays(&self) -> usize {
        self.replays.len()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Render snapshot: every static body followed by every live ball
    pub fn bodies(&self) -> impl Iterator<Item = BodyRef<'_>> {
        self.board
            .pegs
            .iter()
            .map(BodyRef::Peg)
            .chain(self.board.barriers.iter().map(BodyRef::Barrier))
            .chain(self.board.buckets.iter().map(BodyRef::Bucket))
            .chain(self.world.balls().iter().map(BodyRef::Ball))
    }

    /// Drop one physics-simulated ball with a fresh random jitter
    pub fn drop_one(&mut self) -> BallId {
        let x = self.board.width / 2.0
            + self.rng.random_range(-SPAWN_OFFSET_RANGE..SPAWN_OFFSET_RANGE);
        let id = self.world.spawn(Vec2::new(x, SPAWN_Y), 0);
        self.free_run = true;
        id
    }

    /// Clear the board, then drop the whole candidate pool as live physics
    /// balls. Shows the spread the shadow search picks winners from.
    pub fn drop_all(&mut self) {
        self.reset();
        for (i, &offset) in self.spawn_offsets.iter().enumerate() {
            let x = self.board.width / 2.0 + offset;
            self.world.spawn(Vec2::new(x, SPAWN_Y), i);
        }
        self.free_run = true;
    }

    /// Remove every ball and abandon any in-flight replays
    pub fn reset(&mut self) {
        self.world.clear();
        self.replays.clear();
        self.free_run = false;
    }
}
