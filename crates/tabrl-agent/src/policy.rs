//! Exploration policies: how an agent picks among scored candidates.
//!
//! A policy never sees the environment. Callers hand it one [`ActionScore`] per
//! candidate (an arm, or a legal move's resulting state) and get back the
//! position of the chosen candidate in that slice.

use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

/// What a policy knows about one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionScore {
    pub value: f64,
    pub visits: u64,
}

/// The candidate a policy picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Position in the scored slice.
    pub index: usize,
    /// Whether the pick came from the exploit branch.
    pub greedy: bool,
}

/// Candidates a policy will choose from uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    pub indices: Vec<usize>,
    pub greedy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no legal moves to choose from")]
pub struct NoLegalMovesError;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidPolicyError {
    #[display("exploration rate must lie in [0, 1], got {explore_pct}")]
    ExploreRate { explore_pct: f64 },
    #[display("confidence must be finite and non-negative, got {confidence}")]
    Confidence { confidence: f64 },
}

/// Policy family selector for command-line flags.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum PolicyKind {
    #[default]
    Epsilon,
    Ucb,
}

impl PolicyKind {
    /// Pairs the family with its parameter: the exploration rate for
    /// [`Self::Epsilon`], the confidence `c` for [`Self::Ucb`].
    #[must_use]
    pub fn with_param(self, param: f64) -> ExplorationPolicy {
        match self {
            Self::Epsilon => ExplorationPolicy::EpsilonGreedy { explore_pct: param },
            Self::Ucb => ExplorationPolicy::UpperConfidenceBound { confidence: param },
        }
    }
}

/// How an agent trades exploitation against exploration.
///
/// # Epsilon-greedy
///
/// Draws `u` uniformly from `[0, 1)`. If `u > explore_pct` the candidates are
/// the maximizers of the current estimate (exact equality with the maximum),
/// otherwise every candidate. The pick is uniform within that set, so the
/// exploit branch still breaks ties at random.
///
/// # Upper confidence bound
///
/// Candidates that were never visited are tried first: while any exist, the
/// set is exactly the zero-visit candidates and the pick counts as
/// exploratory. Once all are visited, each scores
/// `value + confidence * sqrt(ln(t + 1) / visits)` and the pick is uniform
/// among the best scores. No random exploration draw is made. A confidence
/// of `0` reduces to greedy selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationPolicy {
    EpsilonGreedy { explore_pct: f64 },
    UpperConfidenceBound { confidence: f64 },
}

impl Default for ExplorationPolicy {
    fn default() -> Self {
        Self::EpsilonGreedy { explore_pct: 0.1 }
    }
}

impl ExplorationPolicy {
    pub fn validate(&self) -> Result<(), InvalidPolicyError> {
        match *self {
            Self::EpsilonGreedy { explore_pct } => {
                if (0.0..=1.0).contains(&explore_pct) {
                    Ok(())
                } else {
                    Err(InvalidPolicyError::ExploreRate { explore_pct })
                }
            }
            Self::UpperConfidenceBound { confidence } => {
                if confidence.is_finite() && confidence >= 0.0 {
                    Ok(())
                } else {
                    Err(InvalidPolicyError::Confidence { confidence })
                }
            }
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::EpsilonGreedy { explore_pct } => format!("epsilon = {explore_pct}"),
            Self::UpperConfidenceBound { confidence } => format!("ucb c = {confidence}"),
        }
    }

    /// Candidates the next pick is drawn from.
    ///
    /// `t` is the number of selections made so far and only matters for UCB.
    /// Epsilon-greedy consumes one draw from `rng`; UCB consumes none.
    pub fn candidate_set<R>(
        &self,
        scores: &[ActionScore],
        t: u64,
        rng: &mut R,
    ) -> Result<CandidateSet, NoLegalMovesError>
    where
        R: Rng + ?Sized,
    {
        if scores.is_empty() {
            return Err(NoLegalMovesError);
        }
        let set = match *self {
            Self::EpsilonGreedy { explore_pct } => {
                let u: f64 = rng.random();
                epsilon_candidates(scores, explore_pct, u)
            }
            Self::UpperConfidenceBound { confidence } => ucb_candidates(scores, confidence, t),
        };
        Ok(set)
    }

    /// Picks one candidate uniformly from [`Self::candidate_set`].
    pub fn select<R>(
        &self,
        scores: &[ActionScore],
        t: u64,
        rng: &mut R,
    ) -> Result<Selection, NoLegalMovesError>
    where
        R: Rng + ?Sized,
    {
        let CandidateSet { indices, greedy } = self.candidate_set(scores, t, rng)?;
        let index = *indices.choose(rng).ok_or(NoLegalMovesError)?;
        Ok(Selection { index, greedy })
    }
}

/// Candidate set for one epsilon-greedy decision with exploration draw `u`.
#[must_use]
pub fn epsilon_candidates(scores: &[ActionScore], explore_pct: f64, u: f64) -> CandidateSet {
    if u > explore_pct {
        CandidateSet {
            indices: maximizers(scores.iter().map(|s| s.value)),
            greedy: true,
        }
    } else {
        CandidateSet {
            indices: (0..scores.len()).collect(),
            greedy: false,
        }
    }
}

/// Candidate set for one UCB decision at time `t`.
#[must_use]
pub fn ucb_candidates(scores: &[ActionScore], confidence: f64, t: u64) -> CandidateSet {
    let unvisited: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| s.visits == 0)
        .map(|(i, _)| i)
        .collect();
    if !unvisited.is_empty() {
        return CandidateSet {
            indices: unvisited,
            greedy: false,
        };
    }

    #[expect(clippy::cast_precision_loss)]
    let log_t = ((t + 1) as f64).ln();
    #[expect(clippy::cast_precision_loss)]
    let bounds = scores
        .iter()
        .map(|s| s.value + confidence * (log_t / s.visits as f64).sqrt());
    CandidateSet {
        indices: maximizers(bounds),
        greedy: true,
    }
}

/// Positions whose value equals the maximum exactly.
fn maximizers(values: impl Iterator<Item = f64> + Clone) -> Vec<usize> {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    values
        .enumerate()
        .filter(|(_, v)| *v == max)
        .map(|(i, _)| i)
        .collect()
}
