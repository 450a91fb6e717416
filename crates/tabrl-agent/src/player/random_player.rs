use rand::seq::IndexedRandom as _;
use rand_pcg::Pcg32;
use tabrl_engine::{Coord, Grid, PlayerNum, RngSeed};

use crate::policy::NoLegalMovesError;

use super::{Player, PlayerRecord};

/// Plays a uniformly random empty cell. Never learns.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    name: String,
    rng: Pcg32,
    record: PlayerRecord,
}

impl RandomPlayer {
    #[must_use]
    pub fn new(name: impl Into<String>, seed: RngSeed) -> Self {
        Self {
            name: name.into(),
            rng: seed.rng(),
            record: PlayerRecord::default(),
        }
    }

    #[must_use]
    pub fn record(&self) -> PlayerRecord {
        self.record
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _me: PlayerNum, grid: &Grid) -> Result<Coord, NoLegalMovesError> {
        grid.empty_cells()
            .choose(&mut self.rng)
            .copied()
            .ok_or(NoLegalMovesError)
    }

    fn won(&mut self) {
        self.record.won += 1;
    }

    fn lost(&mut self) {
        self.record.lost += 1;
    }

    fn draw(&mut self) {
        self.record.drawn += 1;
    }
}
