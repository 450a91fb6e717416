//! Tabular learners for the bandit testbed and the self-play game.
//!
//! # Components
//!
//! - [`estimator`]: value tables and their update rules ([`ValueEstimator`])
//! - [`policy`]: exploration policies that pick among scored candidates
//! - [`BanditAgent`]: estimator plus policy acting on a
//!   [`BanditTestbed`](tabrl_engine::BanditTestbed)
//! - [`player`]: game seats, including the temporal-difference learner
//!   [`TdPlayer`]
//!
//! Agents never touch an environment directly. A driver asks them for an
//! action, applies it, and feeds the reward or outcome back.
//!
//! # Example
//!
//! ```
//! use tabrl_agent::{BanditAgentConfig, EstimatorConfig, ExplorationPolicy};
//! use tabrl_engine::{BanditTestbed, Environment as _, RngSeed};
//!
//! let mut rng = RngSeed::from_u64(3).rng();
//! let testbed = BanditTestbed::with_means(vec![0.0, 1.0], 0.0).unwrap();
//! let mut agent = BanditAgentConfig::new(
//!     EstimatorConfig::SampleAverage,
//!     ExplorationPolicy::EpsilonGreedy { explore_pct: 0.1 },
//! )
//! .build(testbed.arm_count())
//! .unwrap();
//!
//! let arm = agent.select_arm(&testbed.legal_actions(), &mut rng).unwrap().index;
//! let reward = testbed.sample(arm, &mut rng).unwrap();
//! agent.observe(arm, reward);
//! assert_eq!(agent.estimates().visits(arm), 1);
//! ```

pub use self::{
    bandit_agent::*,
    estimator::{
        EstimateTable, EstimatorConfig, EstimatorKind, InvalidStepSizeError, StepSize,
        TemporalDifference, ValueEstimator,
    },
    history::*,
    player::{Player, PlayerRecord, RandomPlayer, ScriptedPlayer, TdPlayer, Transition},
    policy::{
        ActionScore, ExplorationPolicy, InvalidPolicyError, NoLegalMovesError, PolicyKind,
        Selection,
    },
};

mod bandit_agent;
pub mod estimator;
mod history;
pub mod player;
pub mod policy;
