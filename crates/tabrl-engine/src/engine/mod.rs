//! Environments the agents act in.
//!
//! - [`Environment`] - Capabilities shared by every environment
//! - [`BanditTestbed`] - k-armed Gaussian bandit with optional random-walk drift
//! - [`TicTacToe`] - Two-player 3x3 game, referee side
//! - [`RngSeed`] - Seed for deterministic random draws
//!
//! # Randomness
//!
//! Environments never own a generator. Every operation that needs randomness
//! takes `&mut R where R: Rng + ?Sized`, so a whole run can be driven from one
//! seeded [`rand_pcg::Pcg32`] and replayed exactly.
//!
//! # Example
//!
//! ```
//! use tabrl_engine::{BanditTestbed, RngSeed};
//!
//! let mut rng = RngSeed::from_u64(1).rng();
//! let mut testbed = BanditTestbed::new(10, 1.0, 0.01, &mut rng).unwrap();
//!
//! for _ in 0..100 {
//!     testbed.step(&mut rng);
//!     let arm = testbed.optimal_arm();
//!     let _reward = testbed.sample(arm, &mut rng).unwrap();
//! }
//! ```

pub use self::{bandit_testbed::*, environment::*, rng_seed::*, tic_tac_toe::*};

mod bandit_testbed;
mod environment;
mod rng_seed;
mod tic_tac_toe;
