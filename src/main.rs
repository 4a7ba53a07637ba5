//! Headless No More Bubbles runner
//!
//! Plays a seeded game with random launches and prints the outcome.
//!
//! Usage:
//!   cargo run --release -- --seed 42 --launches 10
//!   RUST_LOG=debug cargo run -- --json

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use no_more_bubbles::consts::NOMINAL_FRAME_DT;
use no_more_bubbles::sim::RoundPhase;
use no_more_bubbles::{Game, HighScores, Tuning};

#[derive(Parser)]
#[command(name = "no-more-bubbles")]
#[command(about = "Play a headless No More Bubbles game with random launches")]
struct Args {
    /// Game seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of launches to play
    #[arg(long, default_value_t = 10)]
    launches: u32,

    /// Give up on a round after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// JSON file with tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("No More Bubbles (headless) starting with seed {}", args.seed);
    let mut game = Game::with_tuning(args.seed, tuning)?;
    let mut aim_rng = Pcg32::seed_from_u64(args.seed.wrapping_add(0x9E37_79B9));
    let mut snapshot = game.step(NOMINAL_FRAME_DT);

    for launch in 1..=args.launches {
        let aim = Vec2::new(
            aim_rng.random_range(-300.0..300.0),
            aim_rng.random_range(100.0..900.0),
        );
        game.on_launch(aim);
        snapshot = game.step(NOMINAL_FRAME_DT);

        let mut ticks = 1;
        while snapshot.phase != RoundPhase::Idle && ticks < args.max_ticks {
            snapshot = game.step(NOMINAL_FRAME_DT);
            ticks += 1;
        }
        if snapshot.phase != RoundPhase::Idle {
            log::warn!("Round {} did not settle within {} ticks", launch, args.max_ticks);
            break;
        }

        let score = game.score();
        println!(
            "Round {:>3}: bonus {:>4}  total {:>6}  targets {:>2}  power-ups {}",
            score.level,
            score.last_round_bonus,
            score.accumulated_score,
            snapshot.targets.len(),
            snapshot.power_ups.len()
        );
    }

    let mut board = HighScores::new();
    if let Some(rank) = board.record(game.score(), 0.0) {
        println!("Final score {} (rank {})", game.score().accumulated_score, rank);
    } else {
        println!("Final score {}", game.score().accumulated_score);
    }

    if args.json {
        println!("{}", snapshot.to_json()?);
    }
    Ok(())
}
