//! Automated player-vs-cat runner.
//!
//! Each game gets its own controller seeded with `base_seed + game index`, so a
//! run is reproducible regardless of how rayon schedules the games.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::config::GameConfig;
use crate::engine::controller::GameController;
use crate::engine::error::GameError;
use crate::engine::models::GameState;
use crate::engine::strategy::{CatStrategy, PlayerStrategy};

/// How a single automated game ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameRecord {
    pub seed: u64,
    pub state: GameState,
    pub turns: usize,
    pub duration_ms: f64,
}

/// Aggregated results from an arena run.
#[derive(Debug, Clone, Default)]
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: usize,
    pub losses: usize,
    /// Games still `Playing` when the turn cap or the legal walls ran out.
    pub unfinished: usize,
    pub games: Vec<GameRecord>,
}

impl ArenaResult {
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.num_games.max(1) as f64
    }

    /// Mean turns over games the player won.
    pub fn avg_turns_to_win(&self) -> f64 {
        let won: Vec<usize> = self
            .games
            .iter()
            .filter(|g| g.state == GameState::Win)
            .map(|g| g.turns)
            .collect();
        if won.is_empty() {
            return 0.0;
        }
        won.iter().sum::<usize>() as f64 / won.len() as f64
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate();
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let (ci_lo, ci_hi) = self.confidence_interval_95();
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        lines.push(format!(
            "  {:>12}: {:3} ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
            "Trapped",
            self.wins,
            self.win_rate() * 100.0,
            ci_lo * 100.0,
            ci_hi * 100.0,
        ));
        lines.push(format!("  {:>12}: {:3}", "Escaped", self.losses));
        lines.push(format!("  {:>12}: {:3}", "Unfinished", self.unfinished));
        lines.push(format!("  Avg turns to win: {:.1}", self.avg_turns_to_win()));
        if !self.games.is_empty() {
            let total_ms: f64 = self.games.iter().map(|g| g.duration_ms).sum();
            lines.push(format!(
                "  Avg game: {:.2}ms  |  Total: {:.2}s",
                total_ms / self.games.len() as f64,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Play one game to completion or until `max_turns` walls have been placed.
pub fn play_one_game(
    config: &GameConfig,
    player: &dyn PlayerStrategy,
    cat: Arc<dyn CatStrategy>,
    seed: u64,
    max_turns: usize,
) -> Result<GameRecord, GameError> {
    let t0 = Instant::now();
    let mut game = GameController::seeded(config.clone(), seed)?.with_strategy(cat);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(0x9e37_79b9_7f4a_7c15));

    let mut turns = 0;
    while game.state() == GameState::Playing && turns < max_turns {
        let Some((i, j)) = player.choose_wall(game.grid(), game.cat(), &mut rng) else {
            break;
        };
        game.place_wall(i, j)?;
        turns += 1;
    }

    Ok(GameRecord {
        seed,
        state: game.state(),
        turns,
        duration_ms: t0.elapsed().as_secs_f64() * 1000.0,
    })
}

/// Run `num_games` seeded games in parallel and aggregate the results.
pub fn run_arena(
    config: &GameConfig,
    player: &dyn PlayerStrategy,
    cat: Arc<dyn CatStrategy>,
    num_games: usize,
    base_seed: u64,
    max_turns: usize,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<ArenaResult, GameError> {
    config.validate()?;
    let completed = AtomicUsize::new(0);

    let games: Vec<GameRecord> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let seed = base_seed.wrapping_add(game_idx as u64);
            let record = play_one_game(config, player, cat.clone(), seed, max_turns);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(done, num_games);
            }
            record
        })
        .collect::<Result<_, _>>()?;

    let mut result = ArenaResult {
        num_games,
        ..Default::default()
    };
    for game in &games {
        match game.state {
            GameState::Win => result.wins += 1,
            GameState::Lose => result.losses += 1,
            GameState::Playing => result.unfinished += 1,
        }
    }
    result.games = games;

    tracing::info!(
        games = num_games,
        player = player.name(),
        cat = cat.name(),
        wins = result.wins,
        losses = result.losses,
        "arena run complete"
    );
    Ok(result)
}
