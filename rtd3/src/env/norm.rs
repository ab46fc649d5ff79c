//! Action-rescaling environment wrapper.
use super::ActVec;
use anyhow::Result;
use rtd3_core::{Env, Step};

/// Configuration of [`NormalizedActEnv`].
#[derive(Clone, Debug)]
pub struct NormalizedActConfig<C: Clone> {
    /// Configuration of the wrapped environment.
    pub env_config: C,

    /// Lower bound of the valid action range, per dimension.
    pub low: Vec<f32>,

    /// Upper bound of the valid action range, per dimension.
    pub high: Vec<f32>,
}

/// Maps policy actions in `[-1, 1]` onto the wrapped environment's valid
/// action range.
///
/// Each component is rescaled affinely and then clipped to the bounds. The
/// clip is idempotent: the wrapped environment never sees a value outside
/// `[low, high]`, however far the input strays from `[-1, 1]`.
pub struct NormalizedActEnv<E> {
    env: E,
    low: Vec<f32>,
    high: Vec<f32>,
}

impl<E> NormalizedActEnv<E> {
    fn rescale(&self, act: &ActVec) -> ActVec {
        ActVec(
            act.0
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .map(|(a, (lo, hi))| (lo + (a + 1.0) * 0.5 * (hi - lo)).clamp(*lo, *hi))
                .collect(),
        )
    }
}

impl<E> Env for NormalizedActEnv<E>
where
    E: Env<Act = ActVec>,
{
    type Config = NormalizedActConfig<E::Config>;
    type Obs = E::Obs;
    type Act = ActVec;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        Ok(Self {
            env: E::build(&config.env_config, seed)?,
            low: config.low.clone(),
            high: config.high.clone(),
        })
    }

    fn step(&mut self, act: &ActVec) -> Step<Self> {
        let step = self.env.step(&self.rescale(act));
        Step::new(step.obs, step.reward, step.is_done, step.info)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.env.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PendulumConfig, PendulumEnv};

    fn wrapper() -> NormalizedActEnv<PendulumEnv> {
        let (low, high) = PendulumEnv::action_bounds();
        let config = NormalizedActConfig {
            env_config: PendulumConfig::default(),
            low,
            high,
        };
        NormalizedActEnv::build(&config, 0).unwrap()
    }

    #[test]
    fn rescales_the_unit_interval_onto_the_bounds() {
        let env = wrapper();
        assert_eq!(env.rescale(&ActVec(vec![-1.0])).0, vec![-2.0]);
        assert_eq!(env.rescale(&ActVec(vec![0.0])).0, vec![0.0]);
        assert_eq!(env.rescale(&ActVec(vec![1.0])).0, vec![2.0]);
    }

    #[test]
    fn out_of_range_actions_are_clipped() {
        let env = wrapper();
        assert_eq!(env.rescale(&ActVec(vec![3.0])).0, vec![2.0]);
        assert_eq!(env.rescale(&ActVec(vec![-3.0])).0, vec![-2.0]);
    }

    #[test]
    fn clipping_is_idempotent() {
        let env = wrapper();
        for a in [-5.0f32, -1.0, -0.3, 0.0, 0.7, 1.0, 5.0] {
            let once = env.rescale(&ActVec(vec![a])).0[0];
            assert_eq!(once.clamp(-2.0, 2.0), once);
        }
    }
}
