//! Terminal host for a single Catch the Cat session.
//!
//! Usage:
//!   cargo run -- --preset hard --seed 7
//!
//! Commands: `<i> <j>` walls a cell, `undo`, `reset`, `show`, `json`, `quit`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catch_the_cat::engine::config::{load_config, load_default_config, GameConfig};
use catch_the_cat::engine::controller::GameController;
use catch_the_cat::engine::models::{GameEvent, Snapshot, StatusTone};

#[derive(Parser)]
#[command(name = "catch-the-cat", about = "Wall in the cat before it reaches the edge")]
struct Cli {
    /// Path to catch_the_cat.toml (default: auto-discover)
    #[arg(long, env = "CATCH_THE_CAT_CONFIG")]
    config: Option<PathBuf>,

    /// Named preset: easy, classic, hard, tiny, or one defined in the config file
    #[arg(long)]
    preset: Option<String>,

    /// Grid width (overrides config)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height (overrides config)
    #[arg(long)]
    height: Option<i32>,

    /// Number of random walls placed at reset (overrides config)
    #[arg(long)]
    walls: Option<usize>,

    /// Seed for the initial wall layout (default: config seed, then entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for j in 0..snapshot.height {
        if j & 1 == 1 {
            out.push(' ');
        }
        for i in 0..snapshot.width {
            let glyph = if snapshot.cat == (i, j) {
                'C'
            } else if snapshot.is_wall(i, j) {
                '#'
            } else {
                '.'
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str(&format!("state: {}  moves: {}", snapshot.state, snapshot.moves));
    out
}

fn print_event(event: &GameEvent) {
    let marker = match event.tone {
        StatusTone::Normal => "",
        StatusTone::Win => "[win] ",
        StatusTone::Lose => "[lose] ",
    };
    println!("{}{}", marker, event.status);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };

    let mut config: GameConfig = match &cli.preset {
        Some(name) => file.preset(name).ok_or_else(|| {
            format!(
                "unknown preset '{}', available: {}",
                name,
                file.preset_names().join(", ")
            )
        })?,
        None => file.game_or_default(),
    };
    if let Some(w) = cli.width {
        config.width = w;
    }
    if let Some(h) = cli.height {
        config.height = h;
    }
    if let Some(n) = cli.walls {
        config.initial_wall_count = n;
    }

    let mut game = match cli.seed.or(file.seed) {
        Some(seed) => GameController::seeded(config, seed)?,
        None => GameController::from_entropy(config)?,
    };
    game.subscribe(print_event);

    println!("{}", render(&game.snapshot()));
    println!("Click a dot to block the cat.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit" | "q" | "exit"] => break,
            ["undo" | "u"] => {
                if let Err(e) = game.undo() {
                    println!("{e}");
                }
            }
            ["reset" | "r"] => game.restart()?,
            ["show" | "s"] => {}
            ["json"] => {
                println!("{}", serde_json::to_string(&game.snapshot())?);
                continue;
            }
            [i, j] => match (i.parse::<i32>(), j.parse::<i32>()) {
                (Ok(i), Ok(j)) => {
                    if let Err(e) = game.place_wall(i, j) {
                        println!("{e}");
                        continue;
                    }
                }
                _ => {
                    println!("expected two integers, e.g. `3 4`");
                    continue;
                }
            },
            _ => {
                println!("commands: <i> <j> | undo | reset | show | json | quit");
                continue;
            }
        }
        println!("{}", render(&game.snapshot()));
    }

    Ok(())
}
