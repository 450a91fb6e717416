use std::collections::VecDeque;

use tabrl_engine::{Coord, Grid, PlayerNum};

use crate::policy::NoLegalMovesError;

use super::{Player, PlayerRecord};

/// Replays a fixed list of coordinates, legal or not.
///
/// Counts every outcome callback so tests can check that each fires exactly
/// once. Running out of moves is reported as [`NoLegalMovesError`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    name: String,
    moves: VecDeque<Coord>,
    record: PlayerRecord,
}

impl ScriptedPlayer {
    #[must_use]
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self {
            name: name.into(),
            moves: moves
                .into_iter()
                .map(|(row, col)| Coord::new(row, col))
                .collect(),
            record: PlayerRecord::default(),
        }
    }

    #[must_use]
    pub fn record(&self) -> PlayerRecord {
        self.record
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Player for ScriptedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, _me: PlayerNum, _grid: &Grid) -> Result<Coord, NoLegalMovesError> {
        self.moves.pop_front().ok_or(NoLegalMovesError)
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
