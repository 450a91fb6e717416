//! Drivers that connect agents to environments.
//!
//! # Drivers
//!
//! - [`bandit_run::run_bandit`]: one run of a bandit testbed shared by several
//!   agents, reporting every step to a [`recorder::StepRecorder`]
//! - [`experiment::run_experiment`]: many bandit runs averaged into learning
//!   curves, optionally on several threads
//! - [`game::play_game`]: one game between two [`Player`](tabrl_agent::Player)s,
//!   turning illegal moves into forfeits
//! - [`self_play::run_self_play`]: a series of games between learners
//!
//! # Errors
//!
//! Agent and environment errors that end a bandit run are collected in
//! [`RunError`], and those that end a game in [`GameError`]. An illegal move
//! is not an error at this level: the game driver records it as a loss for
//! the offending player.

use tabrl_agent::{
    InvalidAgentConfigError, InvalidPolicyError, InvalidStepSizeError, NoLegalMovesError,
};
use tabrl_engine::{InvalidTestbedError, OutOfRangeActionError};

pub mod bandit_run;
pub mod experiment;
pub mod game;
pub mod recorder;
pub mod self_play;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RunError {
    #[display("invalid testbed: {_0}")]
    InvalidTestbed(InvalidTestbedError),
    #[display("invalid agent: {_0}")]
    InvalidAgent(InvalidAgentConfigError),
    #[display("agent could not act: {_0}")]
    NoLegalMoves(NoLegalMovesError),
    #[display("agent chose a missing arm: {_0}")]
    OutOfRange(OutOfRangeActionError),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum GameError {
    #[display("player could not move: {_0}")]
    NoLegalMoves(NoLegalMovesError),
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SelfPlayError {
    #[display("invalid step size: {_0}")]
    InvalidStepSize(InvalidStepSizeError),
    #[display("invalid policy: {_0}")]
    InvalidPolicy(InvalidPolicyError),
    #[display("{_0}")]
    Game(GameError),
}
