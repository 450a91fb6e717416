//! Series of games between two persistent players.

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tabrl_agent::{
    ExplorationPolicy, Player, PlayerRecord, RandomPlayer, TdPlayer, ValueEstimator as _,
};
use tabrl_engine::{GameStatus, PlayerNum, RngSeed};

use crate::{GameError, SelfPlayError, game::play_game};

/// Outcome counts over a series of games.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTally {
    pub games: u64,
    pub player_one_wins: u64,
    pub player_two_wins: u64,
    pub draws: u64,
    /// Games that ended because a player attempted an illegal move; also
    /// counted as a win for the opponent.
    pub forfeits: u64,
}

impl GameTally {
    /// Counts one finished game; a game still in progress is ignored.
    pub fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::InProgress => return,
            GameStatus::Draw => self.draws += 1,
            GameStatus::Won { winner, by_forfeit } => {
                match winner {
                    PlayerNum::One => self.player_one_wins += 1,
                    PlayerNum::Two => self.player_two_wins += 1,
                }
                self.forfeits += u64::from(by_forfeit);
            }
        }
        self.games += 1;
    }

    /// Fraction of games that ended in a draw.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn draw_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.draws as f64 / self.games as f64
    }
}

/// Plays `games` games between the same two players, player one first.
///
/// Learning players keep their values between games. Every `window` games a
/// snapshot of that window's tally is appended to the returned windows (the
/// last window may be shorter); `window == 0` disables snapshots.
pub fn play_series(
    players: [&mut dyn Player; 2],
    games: usize,
    window: usize,
) -> Result<SeriesTally, GameError> {
    let [one, two] = players;
    let mut series = SeriesTally::default();
    let mut current = GameTally::default();
    for game in 1..=games {
        let status = play_game([&mut *one, &mut *two])?;
        series.total.record(status);
        current.record(status);
        if window > 0 && (game % window == 0 || game == games) {
            series.windows.push(current);
            current = GameTally::default();
        }
    }
    log::debug!("series finished: {:?}", series.total);
    Ok(series)
}

/// Whole-series tally plus per-window snapshots.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTally {
    pub total: GameTally,
    pub windows: Vec<GameTally>,
}

/// Who sits in the second seat.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::FromStr,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    /// A second temporal-difference learner with the same parameters.
    #[default]
    Td,
    Random,
}

/// Parameters of a self-play series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    pub games: usize,
    pub explore_pct: f64,
    pub alpha: f64,
    pub opponent: Opponent,
    /// Games per tally snapshot.
    pub window: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            games: 10_000,
            explore_pct: 0.1,
            alpha: 0.5,
            opponent: Opponent::Td,
            window: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayResult {
    pub seed: RngSeed,
    pub tally: GameTally,
    pub windows: Vec<GameTally>,
    pub records: [PlayerRecord; 2],
    /// Number of states each learner has moved into at least once.
    pub visited_states: [usize; 2],
}

/// Builds the players described by `config` and plays the series.
pub fn run_self_play(
    config: &SelfPlayConfig,
    seed: RngSeed,
) -> Result<SelfPlayResult, SelfPlayError> {
    let policy = ExplorationPolicy::EpsilonGreedy {
        explore_pct: config.explore_pct,
    };
    policy.validate()?;
    let mut master = seed.rng();
    let mut learner = TdPlayer::new("td 1", config.alpha, policy, master.random())?;
    log::info!(
        "self-play: {} games against {} opponent (seed {seed})",
        config.games,
        config.opponent
    );

    let (series, records, visited_states) = match config.opponent {
        Opponent::Td => {
            let mut rival = TdPlayer::new("td 2", config.alpha, policy, master.random())?;
            let series = play_series([&mut learner, &mut rival], config.games, config.window)?;
            let visited = [visited(&learner), visited(&rival)];
            (series, [learner.record(), rival.record()], visited)
        }
        Opponent::Random => {
            let mut rival = RandomPlayer::new("random", master.random());
            let series = play_series([&mut learner, &mut rival], config.games, config.window)?;
            (series, [learner.record(), rival.record()], [visited(&learner), 0])
        }
    };

    Ok(SelfPlayResult {
        seed,
        tally: series.total,
        windows: series.windows,
        records,
        visited_states,
    })
}

fn visited(player: &TdPlayer) -> usize {
    player.values().table().visited().count()
}

#[cfg(test)]
mod tests {
    use tabrl_agent::ScriptedPlayer;

    use super::*;

    #[test]
    fn test_tally_counts_forfeits_as_wins() {
        let mut tally = GameTally::default();
        tally.record(GameStatus::Won {
            winner: PlayerNum::Two,
            by_forfeit: true,
        });
        tally.record(GameStatus::Won {
            winner: PlayerNum::One,
            by_forfeit: false,
        });
        tally.record(GameStatus::Draw);
        tally.record(GameStatus::InProgress);
        assert_eq!(
            tally,
            GameTally {
                games: 3,
                player_one_wins: 1,
                player_two_wins: 1,
                draws: 1,
                forfeits: 1
            }
        );
    }

    #[test]
    fn test_series_with_scripted_forfeits() {
        // player two repeats player one's cell every game
        let mut p1 = ScriptedPlayer::new("p1", [(0, 0); 3]);
        let mut p2 = ScriptedPlayer::new("p2", [(0, 0); 3]);
        let series = play_series([&mut p1, &mut p2], 3, 2).unwrap();
        assert_eq!(series.total.games, 3);
        assert_eq!(series.total.player_one_wins, 3);
        assert_eq!(series.total.forfeits, 3);
        assert_eq!(
            series.windows.iter().map(|w| w.games).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(p2.record().lost, 3);
    }

    #[test]
    fn test_td_self_play_mostly_draws_after_training() {
        let config = SelfPlayConfig {
            games: 20_000,
            window: 1000,
            ..SelfPlayConfig::default()
        };
        let result = run_self_play(&config, RngSeed::from_u64(7)).unwrap();
        assert_eq!(result.tally.games, 20_000);
        assert_eq!(result.tally.forfeits, 0);
        assert_eq!(result.windows.len(), 20);
        assert_eq!(result.records[0].games(), 20_000);
        assert_eq!(result.records[0].won, result.tally.player_one_wins);
        assert_eq!(result.records[1].won, result.tally.player_two_wins);
        let late = result.windows.last().unwrap();
        let early = result.windows.first().unwrap();
        assert!(late.draw_rate() > early.draw_rate(), "{early:?} -> {late:?}");
        assert!(result.visited_states[0] > 100);
    }

    #[test]
    fn test_learner_beats_random_opponent() {
        let config = SelfPlayConfig {
            games: 5000,
            opponent: Opponent::Random,
            window: 0,
            ..SelfPlayConfig::default()
        };
        let result = run_self_play(&config, RngSeed::from_u64(3)).unwrap();
        assert!(result.windows.is_empty());
        assert!(result.tally.player_one_wins > result.tally.player_two_wins * 3);
        assert_eq!(result.visited_states[1], 0);
    }

    #[test]
    fn test_invalid_parameters() {
        let config = SelfPlayConfig {
            alpha: 0.0,
            ..SelfPlayConfig::default()
        };
        assert!(matches!(
            run_self_play(&config, RngSeed::from_u64(0)),
            Err(SelfPlayError::InvalidStepSize(_))
        ));
        let config = SelfPlayConfig {
            explore_pct: -0.5,
            ..SelfPlayConfig::default()
        };
        assert!(matches!(
            run_self_play(&config, RngSeed::from_u64(0)),
            Err(SelfPlayError::InvalidPolicy(_))
        ));
    }
}
