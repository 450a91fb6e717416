use std::path::PathBuf;

use anyhow::Context as _;
use tabrl_stats::descriptive::DescriptiveStats;
use tabrl_training::self_play::{self, Opponent, SelfPlayConfig};

use crate::{schema::report::SelfPlayReport, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SelfPlayArg {
    /// Games to play
    #[arg(long, default_value_t = 10_000)]
    games: usize,
    /// Exploration rate of both learners
    #[arg(long, default_value_t = 0.1)]
    explore_pct: f64,
    /// Temporal-difference step size
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,
    /// Second seat: another learner (`td`) or a random mover (`random`)
    #[arg(long, default_value = "td")]
    opponent: Opponent,
    /// Games per tally window in the report
    #[arg(long, default_value_t = 500)]
    window: usize,
    /// Master seed; random if absent
    #[arg(long)]
    seed: Option<u64>,
    /// JSON self-play config replacing the flags above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl SelfPlayArg {
    fn self_play_config(&self) -> anyhow::Result<SelfPlayConfig> {
        if let Some(path) = &self.config {
            return util::load_config("self-play config", path);
        }
        Ok(SelfPlayConfig {
            games: self.games,
            explore_pct: self.explore_pct,
            alpha: self.alpha,
            opponent: self.opponent,
            window: self.window,
        })
    }
}

pub(crate) fn run(arg: &SelfPlayArg) -> anyhow::Result<()> {
    let config = arg.self_play_config()?;
    let seed = util::resolve_seed(arg.seed);

    let result = self_play::run_self_play(&config, seed).context("self-play failed")?;

    let tally = result.tally;
    eprintln!("Played {} games:", tally.games);
    eprintln!("  player 1 wins: {}", tally.player_one_wins);
    eprintln!("  player 2 wins: {}", tally.player_two_wins);
    eprintln!("  draws:         {}", tally.draws);
    eprintln!("  forfeits:      {}", tally.forfeits);
    if let Some(stats) = DescriptiveStats::new(result.windows.iter().map(|w| w.draw_rate())) {
        eprintln!(
            "  draw rate per {} games: min {:.1}%  max {:.1}%  last {:.1}%",
            config.window,
            stats.min * 100.0,
            stats.max * 100.0,
            result.windows.last().map_or(0.0, |w| w.draw_rate() * 100.0)
        );
    }
    eprintln!(
        "  states visited: {} / {}",
        result.visited_states[0], result.visited_states[1]
    );

    util::emit_report(&SelfPlayReport::new(config, result), arg.output.clone())?;
    Ok(())
}
