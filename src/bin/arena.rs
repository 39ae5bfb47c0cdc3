//! Arena CLI: play many automated sessions and report how often the cat is caught.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 500 --player blocker --preset classic
//!   cargo run --release --bin arena -- --games 100 --player random --width 7 --height 7 --walls 4

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catch_the_cat::engine::arena::run_arena;
use catch_the_cat::engine::config::{load_config, load_default_config, GameConfig};
use catch_the_cat::engine::strategy::{BlockerPlayer, NearestExitCat, PlayerStrategy, RandomPlayer};

#[derive(Parser)]
#[command(name = "arena", about = "Run automated Catch the Cat sessions")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Base random seed; game k uses seed + k
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Player strategy: "blocker" or "random"
    #[arg(long, default_value = "blocker")]
    player: String,

    /// Stop a game after this many walls
    #[arg(long, default_value = "500")]
    max_turns: usize,

    /// Path to catch_the_cat.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    #[arg(long)]
    walls: Option<usize>,
}

fn build_player(name: &str) -> Box<dyn PlayerStrategy> {
    match name {
        "random" => Box::new(RandomPlayer),
        "blocker" => Box::new(BlockerPlayer::default()),
        other => {
            eprintln!("Warning: unknown player '{}', using blocker", other);
            Box::new(BlockerPlayer::default())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => load_default_config(),
    };

    let mut config: GameConfig = match &cli.preset {
        Some(name) => file.preset(name).unwrap_or_else(|| {
            eprintln!("Error: preset '{}' not found", name);
            eprintln!("Available presets: {:?}", file.preset_names());
            std::process::exit(1);
        }),
        None => file.game_or_default(),
    };
    if let Some(w) = cli.width { config.width = w; }
    if let Some(h) = cli.height { config.height = h; }
    if let Some(n) = cli.walls { config.initial_wall_count = n; }

    let player = build_player(&cli.player);
    eprintln!(
        "Arena: {} games, seed={}, player={}, board={}x{}, initial walls={}",
        cli.games, cli.seed, player.name(), config.width, config.height, config.initial_wall_count
    );

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        eprint!("\r  [{}/{}] games completed", done, total);
    };

    let result = run_arena(
        &config,
        player.as_ref(),
        Arc::new(NearestExitCat),
        cli.games,
        cli.seed,
        cli.max_turns,
        Some(&progress_cb),
    )
    .unwrap_or_else(|e| {
        eprintln!("\nError: {}", e);
        std::process::exit(1);
    });

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
}
