use serde::{Deserialize, Serialize};

use crate::{
    IllegalMoveError,
    core::grid::{Coord, Grid, PlayerNum},
};

use super::environment::Environment;

/// State of a game from the referee's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum GameStatus {
    InProgress,
    /// `by_forfeit` is set when the loser attempted an illegal move.
    Won {
        winner: PlayerNum,
        by_forfeit: bool,
    },
    Draw,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_in_progress()
    }

    #[must_use]
    pub fn winner(self) -> Option<PlayerNum> {
        match self {
            Self::Won { winner, .. } => Some(winner),
            Self::InProgress | Self::Draw => None,
        }
    }

    /// The result as seen by `player`, or `None` while the game is running.
    #[must_use]
    pub fn outcome_for(self, player: PlayerNum) -> Option<Outcome> {
        match self {
            Self::InProgress => None,
            Self::Draw => Some(Outcome::Draw),
            Self::Won { winner, .. } if winner == player => Some(Outcome::Won),
            Self::Won { .. } => Some(Outcome::Lost),
        }
    }
}

/// Final result of a game for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Outcome {
    Won,
    Lost,
    Draw,
}

/// A game of tic-tac-toe between two seats.
///
/// Player one moves first and turns alternate after every accepted move. The
/// grid only ever gains marks: a cell never changes owner and is never
/// cleared, so at most one winner can exist.
///
/// After each accepted move the game checks rows, then columns, then the two
/// diagonals for three identical marks. Because only the mark just placed can
/// complete a line, the order does not change the result. A full grid without
/// a line is a draw.
///
/// # Example
///
/// ```
/// use tabrl_engine::{Coord, GameStatus, PlayerNum, TicTacToe};
///
/// let mut game = TicTacToe::new();
/// game.apply(PlayerNum::One, Coord::new(1, 1)).unwrap();
/// assert_eq!(game.active_player(), PlayerNum::Two);
///
/// // occupied cells are rejected and leave the grid untouched
/// let before = *game.grid();
/// assert!(game.apply(PlayerNum::Two, Coord::new(1, 1)).is_err());
/// assert_eq!(*game.grid(), before);
/// assert_eq!(game.status(), GameStatus::InProgress);
/// ```
#[derive(Debug, Clone)]
pub struct TicTacToe {
    grid: Grid,
    active: PlayerNum,
    status: GameStatus,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            grid: Grid::EMPTY,
            active: PlayerNum::One,
            status: GameStatus::InProgress,
        }
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub const fn active_player(&self) -> PlayerNum {
        self.active
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Empty cells in row-major order; empty once the game is over.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Coord> {
        if self.status.is_terminal() {
            return vec![];
        }
        self.grid.empty_cells().to_vec()
    }

    /// Places `player`'s mark at `coord` and re-evaluates the game status.
    ///
    /// On error the game is left unchanged. The caller decides what an illegal
    /// move means; [`Self::forfeit`] records it as a loss.
    pub fn apply(
        &mut self,
        player: PlayerNum,
        coord: Coord,
    ) -> Result<GameStatus, IllegalMoveError> {
        if self.status.is_terminal() {
            return Err(IllegalMoveError::GameOver);
        }
        if player != self.active {
            return Err(IllegalMoveError::OutOfTurn { player });
        }
        if coord.cell_index().is_none() {
            return Err(IllegalMoveError::OutOfGrid { coord });
        }
        self.grid = self
            .grid
            .marked(coord, player)
            .ok_or(IllegalMoveError::Occupied { coord })?;
        self.active = player.opponent();
        self.status = self.evaluate();
        Ok(self.status)
    }

    /// Ends the game with `offender` losing, as after an illegal move.
    ///
    /// Has no effect on a game that is already over.
    pub fn forfeit(&mut self, offender: PlayerNum) -> GameStatus {
        if self.status.is_in_progress() {
            self.status = GameStatus::Won {
                winner: offender.opponent(),
                by_forfeit: true,
            };
        }
        self.status
    }

    fn evaluate(&self) -> GameStatus {
        if let Some(winner) = self.grid.winner() {
            return GameStatus::Won {
                winner,
                by_forfeit: false,
            };
        }
        if self.grid.is_full() {
            return GameStatus::Draw;
        }
        GameStatus::InProgress
    }
}

impl Environment for TicTacToe {
    type Action = Coord;

    fn legal_actions(&self) -> Vec<Coord> {
        self.legal_moves()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut TicTacToe, moves: &[(usize, usize)]) -> GameStatus {
        let mut status = game.status();
        for &(row, col) in moves {
            status = game
                .apply(game.active_player(), Coord::new(row, col))
                .unwrap();
        }
        status
    }

    #[test]
    fn test_occupied_cell_is_rejected_and_grid_unchanged() {
        let mut game = TicTacToe::new();
        play(&mut game, &[(0, 0)]);
        let before = *game.grid();

        let err = game.apply(PlayerNum::Two, Coord::new(0, 0)).unwrap_err();
        assert_eq!(
            err,
            IllegalMoveError::Occupied {
                coord: Coord::new(0, 0)
            }
        );
        assert_eq!(*game.grid(), before);
        assert_eq!(game.active_player(), PlayerNum::Two);
        assert!(game.status().is_in_progress());
    }

    #[test]
    fn test_out_of_grid_is_rejected() {
        let mut game = TicTacToe::new();
        let err = game.apply(PlayerNum::One, Coord::new(0, 3)).unwrap_err();
        assert!(matches!(err, IllegalMoveError::OutOfGrid { .. }));
        assert_eq!(*game.grid(), Grid::EMPTY);
    }

    #[test]
    fn test_out_of_turn_is_rejected() {
        let mut game = TicTacToe::new();
        let err = game.apply(PlayerNum::Two, Coord::new(0, 0)).unwrap_err();
        assert_eq!(
            err,
            IllegalMoveError::OutOfTurn {
                player: PlayerNum::Two
            }
        );
    }

    #[test]
    fn test_top_row_wins() {
        let mut game = TicTacToe::new();
        let status = play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(
            status,
            GameStatus::Won {
                winner: PlayerNum::One,
                by_forfeit: false
            }
        );
        assert!(game.legal_moves().is_empty());
        assert!(game.is_terminal());
        assert_eq!(
            game.apply(PlayerNum::Two, Coord::new(2, 2)).unwrap_err(),
            IllegalMoveError::GameOver
        );
    }

    #[test]
    fn test_column_and_diagonal_wins() {
        let mut game = TicTacToe::new();
        let status = play(&mut game, &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 1)]);
        assert_eq!(status.winner(), Some(PlayerNum::Two));

        let mut game = TicTacToe::new();
        let status = play(&mut game, &[(0, 2), (0, 0), (1, 1), (0, 1), (2, 0)]);
        assert_eq!(status.winner(), Some(PlayerNum::One));
    }

    #[test]
    fn test_full_grid_without_line_is_draw() {
        // X O X
        // X O O
        // O X X
        let mut game = TicTacToe::new();
        let status = play(
            &mut game,
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 1),
                (1, 0),
                (1, 2),
                (2, 1),
                (2, 0),
                (2, 2),
            ],
        );
        assert_eq!(status, GameStatus::Draw);
        assert!(game.grid().is_full());
    }

    #[test]
    fn test_forfeit_awards_opponent() {
        let mut game = TicTacToe::new();
        play(&mut game, &[(0, 0)]);
        let status = game.forfeit(PlayerNum::Two);
        assert_eq!(
            status,
            GameStatus::Won {
                winner: PlayerNum::One,
                by_forfeit: true
            }
        );
        assert_eq!(status.outcome_for(PlayerNum::One), Some(Outcome::Won));
        assert_eq!(status.outcome_for(PlayerNum::Two), Some(Outcome::Lost));

        // forfeiting a finished game changes nothing
        assert_eq!(game.forfeit(PlayerNum::One), status);
    }

    #[test]
    fn test_outcome_for_draw_and_running_game() {
        assert_eq!(GameStatus::InProgress.outcome_for(PlayerNum::One), None);
        assert_eq!(
            GameStatus::Draw.outcome_for(PlayerNum::Two),
            Some(Outcome::Draw)
        );
    }
}
