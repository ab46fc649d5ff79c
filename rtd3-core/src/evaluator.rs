//! Evaluate a trained policy.
use crate::base::{Env, RecurrentPolicy};
use anyhow::Result;
use log::info;

/// Runs inference-only episodes and reports the mean episode return.
///
/// No optimization steps are triggered; the caller is expected to put the
/// policy into evaluation mode first, so the only randomness left is what
/// the policy itself injects.
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The maximum number of environment steps per episode.
    max_steps: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    pub fn new(config: &E::Config, seed: u64, n_episodes: usize, max_steps: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            max_steps,
            env: E::build(config, seed)?,
        })
    }

    /// Evaluates a policy, returning the mean return over the episodes.
    pub fn evaluate<P: RecurrentPolicy<E>>(&mut self, policy: &mut P) -> Result<f32> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            let mut hidden = policy.initial_hidden();
            let mut last_act = policy.sample_uniform();
            let mut ret = 0f32;

            for _ in 0..self.max_steps {
                let (act, next_hidden) = policy.sample(&obs, &last_act, &hidden);
                hidden = next_hidden;

                let step = self.env.step(&act);
                ret += step.reward;

                if step.is_done {
                    break;
                }
                obs = step.obs;
                last_act = act;
            }

            info!("Episode: {} | Episode Reward: {}", ix, ret);
            r_total += ret;
        }

        Ok(r_total / self.n_episodes as f32)
    }
}
