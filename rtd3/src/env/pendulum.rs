//! Torque-controlled inverted pendulum.
use super::{ActVec, ObsVec};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rtd3_core::{Env, Step};
use std::f32::consts::PI;

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const M: f32 = 1.0;
const L: f32 = 1.0;

/// Configuration of [`PendulumEnv`].
#[derive(Clone, Debug)]
pub struct PendulumConfig {
    /// Steps after which the episode terminates.
    pub max_steps: usize,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self { max_steps: 200 }
    }
}

/// Classic torque-controlled inverted pendulum.
///
/// The observation is `[cos(theta), sin(theta), theta_dot]`; representing the
/// angle by its cosine and sine avoids the discontinuity at the wrap-around.
/// The action is a single torque in `[-2, 2]`. The reward penalizes the
/// deviation from upright, the angular velocity and the applied torque:
///
/// ```text
/// r = -(theta^2 + 0.1 * theta_dot^2 + 0.001 * u^2)
/// ```
pub struct PendulumEnv {
    theta: f32,
    theta_dot: f32,
    steps: usize,
    max_steps: usize,
    rng: StdRng,
}

impl PendulumEnv {
    fn obs(&self) -> ObsVec {
        ObsVec(vec![self.theta.cos(), self.theta.sin(), self.theta_dot])
    }

    fn angle_normalize(x: f32) -> f32 {
        ((x + PI).rem_euclid(2.0 * PI)) - PI
    }

    /// Valid torque range, as `(low, high)` per action dimension.
    pub fn action_bounds() -> (Vec<f32>, Vec<f32>) {
        (vec![-MAX_TORQUE], vec![MAX_TORQUE])
    }
}

impl Env for PendulumEnv {
    type Config = PendulumConfig;
    type Obs = ObsVec;
    type Act = ActVec;
    type Info = ();

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        Ok(Self {
            theta: 0.0,
            theta_dot: 0.0,
            steps: 0,
            max_steps: config.max_steps,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn step(&mut self, act: &ActVec) -> Step<Self> {
        let torque = act.0[0].clamp(-MAX_TORQUE, MAX_TORQUE);

        // theta_acc = (3g / 2L) sin(theta) + (3 / mL^2) u
        let theta_acc = (3.0 * G / (2.0 * L)) * self.theta.sin() + (3.0 / (M * L * L)) * torque;
        self.theta_dot = (self.theta_dot + theta_acc * DT).clamp(-MAX_SPEED, MAX_SPEED);
        self.theta = Self::angle_normalize(self.theta + self.theta_dot * DT);

        let reward =
            -(self.theta.powi(2) + 0.1 * self.theta_dot.powi(2) + 0.001 * torque.powi(2));

        self.steps += 1;
        let is_done = self.steps >= self.max_steps;
        Step::new(self.obs(), reward, is_done, ())
    }

    fn reset(&mut self) -> Result<ObsVec> {
        self.theta = self.rng.gen_range(-PI..PI);
        self.theta_dot = self.rng.gen_range(-1.0..1.0);
        self.steps = 0;
        Ok(self.obs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_reproducible_per_seed() {
        let config = PendulumConfig::default();
        let mut env1 = PendulumEnv::build(&config, 42).unwrap();
        let mut env2 = PendulumEnv::build(&config, 42).unwrap();
        assert_eq!(env1.reset().unwrap().0, env2.reset().unwrap().0);
    }

    #[test]
    fn episode_terminates_at_step_cap() {
        let config = PendulumConfig { max_steps: 5 };
        let mut env = PendulumEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        let act = ActVec(vec![0.0]);
        for i in 0..5 {
            let step = env.step(&act);
            assert_eq!(step.is_done, i == 4);
        }
    }

    #[test]
    fn reward_is_maximal_at_upright_rest() {
        let config = PendulumConfig::default();
        let mut env = PendulumEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        env.theta = 0.0;
        env.theta_dot = 0.0;
        let step = env.step(&ActVec(vec![0.0]));
        // One zero-torque step from upright rest stays at zero penalty.
        assert!(step.reward.abs() < 1e-6);
    }

    #[test]
    fn speed_is_clamped() {
        let config = PendulumConfig::default();
        let mut env = PendulumEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        env.theta = PI - 0.1;
        env.theta_dot = MAX_SPEED;
        for _ in 0..100 {
            env.step(&ActVec(vec![MAX_TORQUE]));
            assert!(env.theta_dot.abs() <= MAX_SPEED);
            assert!(env.theta.abs() <= PI);
        }
    }
}
