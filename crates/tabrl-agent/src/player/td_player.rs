use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tabrl_engine::{Coord, Grid, Outcome, PlayerNum, RngSeed, StateIndex};

use crate::{
    estimator::{InvalidStepSizeError, TemporalDifference, ValueEstimator as _},
    history::EpisodeHistory,
    policy::{ActionScore, ExplorationPolicy, NoLegalMovesError},
};

use super::{Player, PlayerRecord};

/// One move as seen by the player that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub before: StateIndex,
    pub after: StateIndex,
    pub greedy: bool,
}

/// Self-play learner with temporal-difference state values.
///
/// Candidates are the states each legal move would produce; the exploration
/// policy picks among them by their current value. After a greedy move the
/// value of the player's previous resulting state is bootstrapped toward the
/// new one. Exploratory moves update nothing. When the game ends, the last
/// resulting state is overwritten with the final reward.
///
/// Values persist across games; per-game state (previous state, history) is
/// reset by [`Player::start_episode`].
#[derive(Debug, Clone)]
pub struct TdPlayer {
    name: String,
    values: TemporalDifference,
    policy: ExplorationPolicy,
    rng: Pcg32,
    last_state: Option<StateIndex>,
    history: EpisodeHistory<Transition>,
    moves: u64,
    record: PlayerRecord,
}

impl TdPlayer {
    pub fn new(
        name: impl Into<String>,
        alpha: f64,
        policy: ExplorationPolicy,
        seed: RngSeed,
    ) -> Result<Self, InvalidStepSizeError> {
        Ok(Self {
            name: name.into(),
            values: TemporalDifference::new(alpha)?,
            policy,
            rng: seed.rng(),
            last_state: None,
            history: EpisodeHistory::new(),
            moves: 0,
            record: PlayerRecord::default(),
        })
    }

    #[must_use]
    pub fn values(&self) -> &TemporalDifference {
        &self.values
    }

    #[must_use]
    pub fn history(&self) -> &EpisodeHistory<Transition> {
        &self.history
    }

    #[must_use]
    pub fn record(&self) -> PlayerRecord {
        self.record
    }

    fn end_episode(&mut self, outcome: Outcome) {
        if let Some(state) = self.last_state.take() {
            self.values.assign_terminal(state, outcome);
        }
        self.record.record(outcome);
        log::trace!(
            "{} finished: {outcome:?} after {} moves",
            self.name,
            self.history.len()
        );
    }
}

impl Player for TdPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_episode(&mut self) {
        self.last_state = None;
        self.history.clear();
    }

    fn choose_move(&mut self, me: PlayerNum, grid: &Grid) -> Result<Coord, NoLegalMovesError> {
        let candidates: Vec<(Coord, StateIndex)> = grid
            .empty_cells()
            .into_iter()
            .filter_map(|coord| Some((coord, StateIndex::encode(&grid.marked(coord, me)?))))
            .collect();
        let scores: Vec<ActionScore> = candidates
            .iter()
            .map(|&(_, state)| ActionScore {
                value: self.values.value(state),
                visits: self.values.visits(state.as_usize()),
            })
            .collect();

        let selection = self.policy.select(&scores, self.moves, &mut self.rng)?;
        let (coord, next) = candidates[selection.index];

        self.values.record_visit(next);
        if selection.greedy
            && let Some(prev) = self.last_state
        {
            self.values.bootstrap(prev, next);
        }
        self.history.push(Transition {
            before: StateIndex::encode(grid),
            after: next,
            greedy: selection.greedy,
        });
        self.last_state = Some(next);
        self.moves += 1;
        Ok(coord)
    }

    fn won(&mut self) {
        self.end_episode(Outcome::Won);
    }

    fn lost(&mut self) {
        self.end_episode(Outcome::Lost);
    }

    fn draw(&mut self) {
        self.end_episode(Outcome::Draw);
    }
}

#[cfg(test)]
mod tests {
    use crate::estimator::ValueEstimator as _;

    use super::*;

    fn greedy_player() -> TdPlayer {
        TdPlayer::new(
            "td",
            0.5,
            ExplorationPolicy::EpsilonGreedy { explore_pct: 0.0 },
            RngSeed::from_u64(9),
        )
        .unwrap()
    }

    fn grid(moves: &[(usize, usize, PlayerNum)]) -> Grid {
        moves.iter().fold(Grid::EMPTY, |grid, &(row, col, player)| {
            grid.marked(Coord::new(row, col), player).unwrap()
        })
    }

    #[test]
    fn test_prefers_highest_valued_successor() {
        let mut player = greedy_player();
        let winning = grid(&[
            (0, 0, PlayerNum::One),
            (0, 1, PlayerNum::One),
            (0, 2, PlayerNum::One),
        ]);
        player
            .values
            .assign_terminal(StateIndex::encode(&winning), Outcome::Won);

        let before = grid(&[(0, 0, PlayerNum::One), (0, 1, PlayerNum::One)]);
        let coord = player.choose_move(PlayerNum::One, &before).unwrap();
        assert_eq!(coord, Coord::new(0, 2));
        let visits = player.values().visits(StateIndex::encode(&winning).as_usize());
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_greedy_move_bootstraps_previous_state() {
        let mut player = greedy_player();
        player.start_episode();

        let after_first = StateIndex::encode(&grid(&[(1, 1, PlayerNum::One)]));
        player.values.update(after_first.as_usize(), 1.0);
        assert_eq!(player.values().value(after_first), 0.75);
        let target = grid(&[
            (1, 1, PlayerNum::One),
            (0, 0, PlayerNum::Two),
            (2, 2, PlayerNum::One),
        ]);
        player
            .values
            .assign_terminal(StateIndex::encode(&target), Outcome::Won);

        let first = player.choose_move(PlayerNum::One, &Grid::EMPTY).unwrap();
        assert_eq!(first, Coord::new(1, 1));
        // no previous state yet: nothing bootstrapped
        assert_eq!(player.values().value(after_first), 0.75);

        let before_second = grid(&[(1, 1, PlayerNum::One), (0, 0, PlayerNum::Two)]);
        let second = player.choose_move(PlayerNum::One, &before_second).unwrap();
        assert_eq!(second, Coord::new(2, 2));
        // 0.75 + 0.5 * (1.0 - 0.75)
        assert_eq!(player.values().value(after_first), 0.875);

        let transitions = player.history().entries();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].before, StateIndex::EMPTY);
        assert_eq!(transitions[0].after, after_first);
        assert_eq!(transitions[1].before, StateIndex::encode(&before_second));
        assert_eq!(transitions[1].after, StateIndex::encode(&target));
        assert!(transitions.iter().all(|t| t.greedy));
    }

    #[test]
    fn test_exploratory_move_skips_bootstrap() {
        let mut player = TdPlayer::new(
            "explorer",
            0.5,
            ExplorationPolicy::EpsilonGreedy { explore_pct: 1.0 },
            RngSeed::from_u64(2),
        )
        .unwrap();
        let first = player.choose_move(PlayerNum::One, &Grid::EMPTY).unwrap();
        let before_second = Grid::EMPTY.marked(first, PlayerNum::One).unwrap();
        let after_first = StateIndex::encode(&before_second);
        for coord in before_second.empty_cells() {
            let next = before_second.marked(coord, PlayerNum::One).unwrap();
            player
                .values
                .assign_terminal(StateIndex::encode(&next), Outcome::Won);
        }
        player.choose_move(PlayerNum::One, &before_second).unwrap();
        assert_eq!(player.values().value(after_first), 0.5);
        assert!(player.history().entries().iter().all(|t| !t.greedy));
    }

    #[test]
    fn test_outcome_overwrites_last_state_once() {
        let mut player = greedy_player();
        player.start_episode();
        let coord = player.choose_move(PlayerNum::Two, &Grid::EMPTY).unwrap();
        let after = StateIndex::encode(&Grid::EMPTY.marked(coord, PlayerNum::Two).unwrap());

        player.lost();
        assert_eq!(player.values().value(after), -1.0);
        assert_eq!(player.record().lost, 1);

        // a second callback without a new move touches no state
        player.won();
        assert_eq!(player.values().value(after), -1.0);
        assert_eq!(player.record().games(), 2);
    }

    #[test]
    fn test_start_episode_clears_history_but_keeps_values() {
        let mut player = greedy_player();
        let coord = player.choose_move(PlayerNum::One, &Grid::EMPTY).unwrap();
        player.won();
        let after = StateIndex::encode(&Grid::EMPTY.marked(coord, PlayerNum::One).unwrap());

        player.start_episode();
        assert!(player.history().is_empty());
        assert_eq!(player.values().value(after), 1.0);
    }

    #[test]
    fn test_full_grid_is_fatal() {
        let full = grid(&[
            (0, 0, PlayerNum::One),
            (0, 1, PlayerNum::Two),
            (0, 2, PlayerNum::One),
            (1, 0, PlayerNum::One),
            (1, 1, PlayerNum::Two),
            (1, 2, PlayerNum::Two),
            (2, 0, PlayerNum::Two),
            (2, 1, PlayerNum::One),
            (2, 2, PlayerNum::One),
        ]);
        let mut player = greedy_player();
        assert_eq!(
            player.choose_move(PlayerNum::One, &full),
            Err(NoLegalMovesError)
        );
    }
}
