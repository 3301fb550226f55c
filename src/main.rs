use std::path::PathBuf;
use std::process;

use boxbrawl::app::{self, AppError};
use boxbrawl::config::Tuning;
use boxbrawl::game::Game;
use boxbrawl::physics::PhysicsWorld;
use clap::Parser;

#[derive(Parser)]
#[command(name = "boxbrawl", about = "Side-on physics platformer with crates to punch, grab and drag")]
struct Args {
    /// JSON file overriding tuning constants
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Run this many fixed ticks without a window, then exit
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    if let Some(w) = args.width {
        tuning.screen_width = w as f32;
    }
    if let Some(h) = args.height {
        tuning.screen_height = h as f32;
    }
    tuning.validate()?;

    let mut game = Game::level_one(tuning);

    if let Some(ticks) = args.headless {
        for _ in 0..ticks {
            game.tick();
        }
        log::info!(
            "Headless run: {} ticks, actor at {}, {} crates left",
            game.ticks(),
            game.world.position(game.actor.body),
            game.dynamics.len()
        );
        return Ok(());
    }

    app::run(game)
}
