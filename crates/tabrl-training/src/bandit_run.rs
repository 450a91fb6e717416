use rand::Rng;
use tabrl_agent::BanditAgent;
use tabrl_engine::{BanditTestbed, Environment as _};

use crate::{RunError, recorder::StepRecorder};

/// Runs `steps` steps of a bandit testbed shared by `agents`.
///
/// Each step first advances the testbed's drift once, then lets every agent
/// in order pick one of the testbed's legal arms, draw its reward, update its
/// estimate and report to `recorder`. All agents in a step therefore face the
/// same true means.
pub fn run_bandit<R, S>(
    testbed: &mut BanditTestbed,
    agents: &mut [BanditAgent],
    steps: usize,
    rng: &mut R,
    recorder: &mut S,
) -> Result<(), RunError>
where
    R: Rng + ?Sized,
    S: StepRecorder + ?Sized,
{
    for agent in agents.iter_mut() {
        agent.reset_history();
    }
    let arms = testbed.legal_actions();
    for step in 0..steps {
        testbed.step(rng);
        recorder.record_true_means(step, testbed.true_means());
        for (index, agent) in agents.iter_mut().enumerate() {
            let arm = agent.select_arm(&arms, rng)?.index;
            let reward = testbed.sample(arm, rng)?;
            agent.observe(arm, reward);
            recorder.record(step, index, reward, testbed.is_optimal(arm));
            recorder.record_estimates(step, index, agent.estimates().values());
        }
    }
    Ok(())
}
