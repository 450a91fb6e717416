//! Game players.
//!
//! The game driver owns the referee ([`TicTacToe`](tabrl_engine::TicTacToe))
//! and talks to each seat through the [`Player`] trait: it hands out grid
//! snapshots, submits the returned coordinate, and reports the outcome once
//! the game is over.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabrl_engine::{Coord, Grid, Outcome, PlayerNum};

use crate::policy::NoLegalMovesError;

pub use self::{random_player::*, scripted_player::*, td_player::*};

mod random_player;
mod scripted_player;
mod td_player;

/// One seat at the table.
///
/// Exactly one of [`Self::won`], [`Self::lost`] or [`Self::draw`] is called
/// per game, after the final move.
pub trait Player: fmt::Debug + Send {
    fn name(&self) -> &str;

    /// Called before the first move of every game.
    fn start_episode(&mut self) {}

    /// Picks a cell for `me` on a copy of the current grid.
    ///
    /// The returned coordinate is not checked here; an occupied or off-grid
    /// choice forfeits the game.
    fn choose_move(&mut self, me: PlayerNum, grid: &Grid) -> Result<Coord, NoLegalMovesError>;

    fn won(&mut self);
    fn lost(&mut self);
    fn draw(&mut self);

    /// Dispatches to [`Self::won`], [`Self::lost`] or [`Self::draw`].
    fn finish(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => self.won(),
            Outcome::Lost => self.lost(),
            Outcome::Draw => self.draw(),
        }
    }
}

/// Win/loss/draw counts kept by a player across games.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub won: u64,
    pub lost: u64,
    pub drawn: u64,
}

impl PlayerRecord {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => self.won += 1,
            Outcome::Lost => self.lost += 1,
            Outcome::Draw => self.drawn += 1,
        }
    }

    #[must_use]
    pub fn games(&self) -> u64 {
        self.won + self.lost + self.drawn
    }
}
