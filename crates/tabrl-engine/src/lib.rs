pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// An arm index that does not exist on the testbed.
///
/// Always a caller bug: agents only ever choose among `0..arm_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("arm {arm} out of range for a {arm_count}-armed testbed")]
pub struct OutOfRangeActionError {
    pub arm: usize,
    pub arm_count: usize,
}

/// A move rejected by the game.
///
/// The driver treats this as a forfeit by the player who attempted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IllegalMoveError {
    #[display("cell {coord} is already occupied")]
    Occupied { coord: Coord },
    #[display("cell {coord} is outside the grid")]
    OutOfGrid { coord: Coord },
    #[display("player {player} moved out of turn")]
    OutOfTurn { player: PlayerNum },
    #[display("game is already over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidTestbedError {
    #[display("testbed needs at least one arm")]
    NoArms,
    #[display("invalid standard deviation for {name}: {sigma}")]
    InvalidSigma { name: &'static str, sigma: f64 },
}
