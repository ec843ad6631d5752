//! Demo driver: draws weighted outcomes, schedules the drops and logs how
//! they play out.
//!
//! Usage:
//!   plinko-demo [--balls N] [--degen] [--seed S] [--buckets COUNT]
//!   plinko-demo --free-run
//!   plinko-demo --dump-trajectory BUCKET

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use plinko_engine::engine::candidate_pool;
use plinko_engine::paytable::{self, Volatility};
use plinko_engine::sim::simulate;
use plinko_engine::{BallId, Board, BoardConfig, ContactEvent, PlinkoEngine};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plinko replay engine demo")]
struct Args {
    /// Number of scheduled drops
    #[arg(short, long, default_value = "5")]
    balls: u32,

    /// Use the higher-volatility payout table
    #[arg(long)]
    degen: bool,

    /// Seed for the spawn pool and outcome draws
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Replace the built-in table with a gaussian one of this many buckets
    #[arg(long, value_name = "COUNT")]
    buckets: Option<u32>,

    /// Drop the whole candidate pool under live physics instead of replaying
    #[arg(long)]
    free_run: bool,

    /// Print the recorded trajectory into the given bucket as JSON and exit
    #[arg(long, value_name = "BUCKET")]
    dump_trajectory: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let volatility = if args.degen {
        Volatility::Degen
    } else {
        Volatility::Normal
    };
    let (table, outcome_probs) = match args.buckets {
        Some(count) => (
            paytable::custom_table(count, volatility.rows(), volatility),
            paytable::gaussian_probabilities(count, volatility.rows()),
        ),
        None => (
            volatility.table(),
            paytable::bucket_probabilities(volatility.table_rows()),
        ),
    };
    let config = BoardConfig {
        rows: volatility.rows(),
        multipliers: paytable::board_multipliers(&table),
    };

    if let Some(bucket) = args.dump_trajectory {
        return dump_trajectory(&config, args.seed, bucket);
    }

    let events: Rc<RefCell<Vec<ContactEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    let mut engine = PlinkoEngine::new(config, args.seed, move |e| sink.borrow_mut().push(*e))?;
    debug!(
        "board: {} pegs, {} buckets, table {table:?}",
        engine.board().pegs.len(),
        engine.board().buckets.len()
    );

    if args.free_run {
        info!("dropping the whole candidate pool under live physics");
        engine.drop_all();
        drain(&mut engine);
        report_histogram(&events.borrow());
        return Ok(());
    }

    let mut outcome_rng = Pcg32::seed_from_u64(args.seed.wrapping_add(1));
    let mut launched: Vec<(BallId, f32)> = Vec::new();
    for i in 0..args.balls {
        let multiplier = table[draw_bucket(&mut outcome_rng, &outcome_probs)];
        match engine.run(multiplier) {
            Ok(id) => {
                info!("drop {i}: ball {id} scheduled for a {multiplier}x bucket");
                launched.push((id, multiplier));
            }
            Err(err) => warn!("drop {i}: {err}"),
        }
        // Stagger the drops so the replays overlap on screen
        for _ in 0..8 {
            engine.tick();
        }
    }
    drain(&mut engine);
    settle(&events.borrow(), &launched);
    Ok(())
}

/// Tick until every ball has landed and been removed
fn drain(engine: &mut PlinkoEngine) {
    for _ in 0..60_000 {
        if !engine.is_animating() {
            return;
        }
        engine.tick();
    }
    warn!("board did not settle, clearing stragglers");
    engine.reset();
}

/// Sample a bucket from the binomial landing distribution
fn draw_bucket(rng: &mut Pcg32, probs: &[f64]) -> usize {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (k, &p) in probs.iter().enumerate() {
        cumulative += p;
        if roll < cumulative {
            return k;
        }
    }
    probs.len() - 1
}

fn settle(events: &[ContactEvent], launched: &[(BallId, f32)]) {
    let mut paid = 0.0_f64;
    for &(id, scheduled) in launched {
        let landed = events
            .iter()
            .rev()
            .find_map(|e| if e.ball == Some(id) { e.bucket } else { None });
        match landed {
            Some(bucket) => {
                info!(
                    "ball {id} landed in bucket {} paying {}x",
                    bucket.index, bucket.multiplier
                );
                paid += f64::from(bucket.multiplier);
            }
            None => warn!("ball {id} never reported a bucket (scheduled {scheduled}x)"),
        }
    }
    if !launched.is_empty() {
        info!(
            "wagered {} paid {paid:.2} (observed rtp {:.3})",
            launched.len(),
            paid / launched.len() as f64
        );
    }
}

fn report_histogram(events: &[ContactEvent]) {
    let mut histogram: HashMap<u32, usize> = HashMap::new();
    for event in events {
        if let Some(bucket) = event.bucket {
            *histogram.entry(bucket.index).or_default() += 1;
        }
    }
    let mut buckets: Vec<_> = histogram.into_iter().collect();
    buckets.sort_unstable();
    for (index, hits) in buckets {
        info!("bucket {index}: {hits} contacts");
    }
}

fn dump_trajectory(config: &BoardConfig, seed: u64, bucket: u32) -> anyhow::Result<()> {
    let board = Board::build(config)?;
    let offsets = candidate_pool(seed);
    let sim = simulate(&board, &offsets, bucket)
        .with_context(|| format!("no trajectory into bucket {bucket}"))?;
    println!("{}", serde_json::to_string_pretty(&sim)?);
    Ok(())
}
